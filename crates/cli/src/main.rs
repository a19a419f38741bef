mod auth;
mod batches;
mod config;
mod context;
mod leaderboard;
mod output;
mod tasks;
mod users;
mod watch;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rewarddesk",
    about = "rewarddesk admin console - manage users, tasks, leaderboard, and batches"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with operator credentials
    Login { email: String, password: String },

    /// Log out and clear the stored session
    Logout,

    /// Show the current operator identity
    Whoami,

    /// Manage platform members
    Users {
        #[command(subcommand)]
        command: users::UsersCommand,
    },

    /// Manage reward tasks
    Tasks {
        #[command(subcommand)]
        command: tasks::TasksCommand,
    },

    /// Manage leaderboard entries
    Leaderboard {
        #[command(subcommand)]
        command: leaderboard::LeaderboardCommand,
    },

    /// Manage token-sale batches
    Batches {
        #[command(subcommand)]
        command: batches::BatchesCommand,
    },

    /// Show or set configuration
    Config {
        /// Set the backend base URL
        #[arg(long)]
        server: Option<String>,

        /// Set the request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Use the deprecated /api/tasks routes
        #[arg(long)]
        legacy_task_routes: Option<bool>,
    },

    /// Follow live platform events
    Watch,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        // Data-layer failures were already surfaced by the notification
        // sink; everything else prints here.
        if err.downcast_ref::<output::Reported>().is_none() {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Config {
            server,
            timeout_secs,
            legacy_task_routes,
        } => {
            if server.is_none() && timeout_secs.is_none() && legacy_task_routes.is_none() {
                config::show_config()
            } else {
                config::set_config(server, timeout_secs, legacy_task_routes)
            }
        }
        command => {
            let ctx = context::AppContext::init()?;
            match command {
                Commands::Login { email, password } => auth::login(&ctx, &email, &password).await,
                Commands::Logout => auth::logout(&ctx),
                Commands::Whoami => auth::whoami(&ctx),
                Commands::Users { command } => users::run(&ctx, command).await,
                Commands::Tasks { command } => tasks::run(&ctx, command).await,
                Commands::Leaderboard { command } => leaderboard::run(&ctx, command).await,
                Commands::Batches { command } => batches::run(&ctx, command).await,
                Commands::Watch => watch::run(&ctx).await,
                Commands::Config { .. } => unreachable!("handled above"),
            }
        }
    }
}
