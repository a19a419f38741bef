use anyhow::Result;
use clap::Subcommand;

use rewarddesk_api::{Batch, BatchStatus, BatchUpdate, CacheKey, NewBatch};
use rewarddesk_api_client::BatchMutation;
use rewarddesk_query::run_mutation;

use crate::context::AppContext;
use crate::output::{self, ConsoleSink};

fn parse_status(raw: &str) -> Result<BatchStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown status '{raw}' (active|completed|pending)"))
}

#[derive(Debug, Subcommand)]
pub enum BatchesCommand {
    /// List all token-sale batches
    List,

    /// Show one batch
    Get { id: String },

    /// Create a batch
    Create {
        #[arg(long)]
        batch_number: u32,
        #[arg(long)]
        current_price: f64,
        #[arg(long)]
        next_price: f64,
        #[arg(long, default_value_t = 0)]
        tokens_sold: u64,
        #[arg(long)]
        total_tokens: u64,
        #[arg(long, value_parser = parse_status)]
        status: Option<BatchStatus>,
    },

    /// Update fields on a batch
    Update {
        id: String,
        #[arg(long)]
        batch_number: Option<u32>,
        #[arg(long)]
        current_price: Option<f64>,
        #[arg(long)]
        next_price: Option<f64>,
        #[arg(long)]
        tokens_sold: Option<u64>,
        #[arg(long)]
        total_tokens: Option<u64>,
        #[arg(long, value_parser = parse_status)]
        status: Option<BatchStatus>,
    },

    /// Delete a batch
    Delete { id: String },
}

pub async fn run(ctx: &AppContext, command: BatchesCommand) -> Result<()> {
    let client = ctx.batches();
    let sink = ConsoleSink;

    match command {
        BatchesCommand::List => {
            let batches = output::report(
                &sink,
                ctx.cache.fetch(&CacheKey::Batches, || client.list()).await,
            )?;
            output::print_batches(&batches);
        }
        BatchesCommand::Get { id } => {
            let key = CacheKey::Batch(id.clone());
            let batch: std::sync::Arc<Batch> =
                output::report(&sink, ctx.cache.fetch(&key, || client.get(&id)).await)?;
            output::print_batches(std::slice::from_ref(batch.as_ref()));
        }
        BatchesCommand::Create {
            batch_number,
            current_price,
            next_price,
            tokens_sold,
            total_tokens,
            status,
        } => {
            let new = NewBatch {
                batch_number,
                current_price,
                next_price,
                tokens_sold,
                total_tokens,
                status,
            };
            let created = output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &BatchMutation::Create.affected_keys(),
                    "batch created",
                    client.create(&new),
                )
                .await,
            )?;
            println!("id: {}", created.id);
        }
        BatchesCommand::Update {
            id,
            batch_number,
            current_price,
            next_price,
            tokens_sold,
            total_tokens,
            status,
        } => {
            let changes = BatchUpdate {
                batch_number,
                current_price,
                next_price,
                tokens_sold,
                total_tokens,
                status,
            };
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &BatchMutation::Update(id.clone()).affected_keys(),
                    &format!("batch {id} updated"),
                    client.update(&id, &changes),
                )
                .await,
            )?;
        }
        BatchesCommand::Delete { id } => {
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &BatchMutation::Delete(id.clone()).affected_keys(),
                    &format!("batch {id} deleted"),
                    client.delete(&id),
                )
                .await,
            )?;
        }
    }
    Ok(())
}
