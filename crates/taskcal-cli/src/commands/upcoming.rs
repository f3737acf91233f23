//! Upcoming scheduled tasks, soonest first.

use clap::Args;
use taskcal_core::upcoming_notifications;

use crate::storage::{Config, TaskStore};

#[derive(Args)]
pub struct UpcomingArgs {
    /// Maximum number of tasks (defaults to notifications.upcoming_limit)
    #[arg(long)]
    limit: Option<usize>,
    /// Print JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: UpcomingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let limit = match args.limit {
        Some(limit) => limit,
        None => Config::load()?.notifications.upcoming_limit,
    };
    let book = TaskStore::open()?.load()?;
    let notifications = upcoming_notifications(book.tasks(), limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&notifications)?);
    } else if notifications.is_empty() {
        println!("No upcoming tasks");
    } else {
        println!("Upcoming tasks ({})", notifications.len());
        for n in &notifications {
            println!("  {}  {}  (priority {})", n.time_label(), n.title, n.importance.value());
        }
    }
    Ok(())
}
