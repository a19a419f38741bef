use anyhow::Result;
use clap::Subcommand;

use rewarddesk_api::{CacheKey, NewUser, User, UserUpdate};
use rewarddesk_api_client::UserMutation;
use rewarddesk_query::run_mutation;

use crate::context::AppContext;
use crate::output::{self, ConsoleSink};

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all platform members
    List,

    /// Show one member
    Get { id: String },

    /// Create a member
    Create {
        name: String,
        #[arg(long)]
        referral_code: Option<String>,
        #[arg(long, default_value_t = 0)]
        tokens: u64,
        #[arg(long, default_value_t = 0)]
        shares: u64,
        #[arg(long)]
        profile_image: Option<String>,
    },

    /// Update fields on a member
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tokens: Option<u64>,
        #[arg(long)]
        shares: Option<u64>,
        #[arg(long)]
        profile_image: Option<String>,
    },

    /// Delete a member
    Delete { id: String },
}

pub async fn run(ctx: &AppContext, command: UsersCommand) -> Result<()> {
    let client = ctx.users();
    let sink = ConsoleSink;

    match command {
        UsersCommand::List => {
            let users = output::report(
                &sink,
                ctx.cache.fetch(&CacheKey::Users, || client.list()).await,
            )?;
            output::print_users(&users);
        }
        UsersCommand::Get { id } => {
            let key = CacheKey::User(id.clone());
            let user: std::sync::Arc<User> =
                output::report(&sink, ctx.cache.fetch(&key, || client.get(&id)).await)?;
            output::print_users(std::slice::from_ref(user.as_ref()));
        }
        UsersCommand::Create {
            name,
            referral_code,
            tokens,
            shares,
            profile_image,
        } => {
            let new = NewUser {
                name,
                referral_code,
                tokens,
                shares,
                profile_image,
            };
            let created = output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &UserMutation::Create.affected_keys(),
                    "user created",
                    client.create(&new),
                )
                .await,
            )?;
            println!("id: {}", created.id);
        }
        UsersCommand::Update {
            id,
            name,
            tokens,
            shares,
            profile_image,
        } => {
            let changes = UserUpdate {
                name,
                tokens,
                shares,
                profile_image,
            };
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &UserMutation::Update(id.clone()).affected_keys(),
                    &format!("user {id} updated"),
                    client.update(&id, &changes),
                )
                .await,
            )?;
        }
        UsersCommand::Delete { id } => {
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &UserMutation::Delete(id.clone()).affected_keys(),
                    &format!("user {id} deleted"),
                    client.delete(&id),
                )
                .await,
            )?;
        }
    }
    Ok(())
}
