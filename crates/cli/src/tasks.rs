use anyhow::Result;
use clap::Subcommand;

use rewarddesk_api::{CacheKey, NewTask, Platform, Task, TaskUpdate, VerificationMethod};
use rewarddesk_api_client::TaskMutation;
use rewarddesk_query::run_mutation;

use crate::context::AppContext;
use crate::output::{self, ConsoleSink};

fn parse_platform(raw: &str) -> Result<Platform, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown platform '{raw}' (twitter|youtube|instagram|telegram|other)"))
}

fn parse_verification(raw: &str) -> Result<VerificationMethod, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown verification method '{raw}' (api|manual|screenshot|oauth)"))
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List all reward tasks
    List,

    /// Show one task
    Get { id: String },

    /// Create a task
    Create {
        /// Task label shown to members
        label: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        reward: u64,
        #[arg(long, value_parser = parse_platform)]
        platform: Platform,
        #[arg(long)]
        platform_id: Option<String>,
        #[arg(long, value_parser = parse_verification)]
        verification_method: VerificationMethod,
    },

    /// Update fields on a task
    Update {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        reward: Option<u64>,
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
        #[arg(long)]
        platform_id: Option<String>,
        #[arg(long, value_parser = parse_verification)]
        verification_method: Option<VerificationMethod>,
    },

    /// Delete a task
    Delete { id: String },
}

pub async fn run(ctx: &AppContext, command: TasksCommand) -> Result<()> {
    let client = ctx.tasks();
    let sink = ConsoleSink;

    match command {
        TasksCommand::List => {
            let tasks = output::report(
                &sink,
                ctx.cache.fetch(&CacheKey::Tasks, || client.list()).await,
            )?;
            output::print_tasks(&tasks);
        }
        TasksCommand::Get { id } => {
            let key = CacheKey::Task(id.clone());
            let task: std::sync::Arc<Task> =
                output::report(&sink, ctx.cache.fetch(&key, || client.get(&id)).await)?;
            output::print_tasks(std::slice::from_ref(task.as_ref()));
        }
        TasksCommand::Create {
            label,
            description,
            reward,
            platform,
            platform_id,
            verification_method,
        } => {
            let new = NewTask {
                label,
                description,
                reward,
                platform,
                platform_id,
                verification_method,
            };
            let created = output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &TaskMutation::Create.affected_keys(),
                    "task created",
                    client.create(&new),
                )
                .await,
            )?;
            println!("id: {}", created.id);
        }
        TasksCommand::Update {
            id,
            label,
            description,
            reward,
            platform,
            platform_id,
            verification_method,
        } => {
            let changes = TaskUpdate {
                label,
                description,
                reward,
                platform,
                platform_id,
                verification_method,
            };
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &TaskMutation::Update(id.clone()).affected_keys(),
                    &format!("task {id} updated"),
                    client.update(&id, &changes),
                )
                .await,
            )?;
        }
        TasksCommand::Delete { id } => {
            output::quiet(
                run_mutation(
                    &ctx.cache,
                    &sink,
                    &TaskMutation::Delete(id.clone()).affected_keys(),
                    &format!("task {id} deleted"),
                    client.delete(&id),
                )
                .await,
            )?;
        }
    }
    Ok(())
}
