use rewarddesk_api::{ApiError, Batch, LeaderboardEntry, Task, User};
use rewarddesk_query::NotificationSink;

/// Console sink: one line per completed operation.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn success(&self, message: &str) {
        println!("ok: {message}");
    }

    fn failure(&self, error: &ApiError) {
        match error.status {
            Some(status) => eprintln!("error ({status}): {}", error.message),
            None => eprintln!("error: {}", error.message),
        }
    }
}

/// Marker for failures already surfaced through the sink; `main` only sets
/// the exit code for these.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("operation failed")
    }
}

impl std::error::Error for Reported {}

/// Route a read failure through the sink, then fail quietly.
pub fn report<T>(sink: &ConsoleSink, result: Result<T, ApiError>) -> anyhow::Result<T> {
    result.map_err(|err| {
        sink.failure(&err);
        Reported.into()
    })
}

/// Swallow a mutation failure that [`rewarddesk_query::run_mutation`] already
/// reported, keeping only the exit code.
pub fn quiet<T>(result: Result<T, ApiError>) -> anyhow::Result<T> {
    result.map_err(|_| Reported.into())
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("no users");
        return;
    }
    println!(
        "{:<26} {:<20} {:<12} {:>10} {:>8}",
        "ID", "NAME", "REFERRAL", "TOKENS", "SHARES"
    );
    for user in users {
        println!(
            "{:<26} {:<20} {:<12} {:>10} {:>8}",
            user.id, user.name, user.referral_code, user.tokens, user.shares
        );
    }
}

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    println!(
        "{:<26} {:<28} {:>8} {:<10} {:<12}",
        "ID", "TASK", "REWARD", "PLATFORM", "VERIFY"
    );
    for task in tasks {
        println!(
            "{:<26} {:<28} {:>8} {:<10} {:<12}",
            task.id, task.label, task.reward, task.platform, task.verification_method
        );
    }
}

pub fn print_leaderboard(entries: &[LeaderboardEntry]) {
    if entries.is_empty() {
        println!("leaderboard is empty");
        return;
    }
    println!(
        "{:>4} {:<20} {:<28} {:>10} {:>8}",
        "#", "NAME", "EMAIL", "COINS", "SHARES"
    );
    for entry in entries {
        let (name, email) = match &entry.user {
            Some(user) => (user.name.as_str(), user.email.as_str()),
            None => ("(deleted user)", "-"),
        };
        println!(
            "{:>4} {:<20} {:<28} {:>10} {:>8}",
            entry.position, name, email, entry.coins, entry.shares
        );
    }
}

pub fn print_batches(batches: &[Batch]) {
    if batches.is_empty() {
        println!("no batches");
        return;
    }
    println!(
        "{:<26} {:>6} {:>10} {:>10} {:>12} {:>12} {:<10}",
        "ID", "BATCH", "PRICE", "NEXT", "SOLD", "TOTAL", "STATUS"
    );
    for batch in batches {
        let status = batch
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26} {:>6} {:>10.4} {:>10.4} {:>12} {:>12} {:<10}",
            batch.id,
            batch.batch_number,
            batch.current_price,
            batch.next_price,
            batch.tokens_sold,
            batch.total_tokens,
            status
        );
    }
}
