use anyhow::Result;

use crate::context::AppContext;

/// Login surfaces its failure inline instead of through the sink: the
/// operator needs to see it next to the prompt they just used.
pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    match ctx.session.login(email, password).await {
        Ok(identity) => {
            println!("logged in as {} ({})", identity.name, identity.role);
            Ok(())
        }
        Err(err) => Err(anyhow::anyhow!("login failed: {}", err.message)),
    }
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout();
    // Cached server state belongs to the old session.
    ctx.cache.clear();
    println!("logged out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.session.identity() {
        Some(identity) => println!(
            "{} <{}> role={}",
            identity.name, identity.email, identity.role
        ),
        None => println!("not logged in"),
    }
    Ok(())
}
