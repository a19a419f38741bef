use anyhow::Result;
use clap::Subcommand;

use rewarddesk_api::{CacheKey, LeaderboardEntry, NewLeaderboardEntry};
use rewarddesk_api_client::LeaderboardMutation;
use rewarddesk_query::run_mutation;

use crate::context::AppContext;
use crate::output::{self, ConsoleSink};

#[derive(Debug, Subcommand)]
pub enum LeaderboardCommand {
    /// Show the ranked leaderboard
    List,

    /// Show one entry
    Get { id: String },

    /// Create an entry for a member. The server may reject entries whose
    /// score is below the qualification threshold.
    Create {
        user_id: String,
        #[arg(long, default_value_t = 0)]
        coins: u64,
        #[arg(long, default_value_t = 0)]
        shares: u64,
    },

    /// Delete an entry
    Delete { id: String },
}

pub async fn run(ctx: &AppContext, command: LeaderboardCommand) -> Result<()> {
    let client = ctx.leaderboard();
    let sink = ConsoleSink;

    match command {
        LeaderboardCommand::List => {
            let entries = output::report(
                &sink,
                ctx.cache
                    .fetch(&CacheKey::Leaderboard, || client.list())
                    .await,
            )?;
            output::print_leaderboard(&entries);
        }
        LeaderboardCommand::Get { id } => {
            let key = CacheKey::LeaderboardEntry(id.clone());
            let entry: std::sync::Arc<LeaderboardEntry> =
                output::report(&sink, ctx.cache.fetch(&key, || client.get(&id)).await)?;
            output::print_leaderboard(std::slice::from_ref(entry.as_ref()));
        }
        LeaderboardCommand::Create {
            user_id,
            coins,
            shares,
        } => {
            let new = NewLeaderboardEntry {
                user_id,
                coins,
                shares,
            };
            let created = output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &LeaderboardMutation::Create.affected_keys(),
                    "leaderboard entry created",
                    client.create(&new),
                )
                .await,
            )?;
            println!("id: {} (position {})", created.id, created.position);
        }
        LeaderboardCommand::Delete { id } => {
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &LeaderboardMutation::Delete(id.clone()).affected_keys(),
                    &format!("leaderboard entry {id} deleted"),
                    client.delete(&id),
                )
                .await,
            )?;
        }
    }
    Ok(())
}
