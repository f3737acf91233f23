pub mod config;
pub mod plan;
pub mod suggest;
pub mod task;
pub mod upcoming;

use chrono::{DateTime, Utc};
use taskcal_core::Task;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One-line human summary of a task.
pub fn task_line(task: &Task) -> String {
    let mut details = vec![task.category.to_string(), format!("{}m", task.estimated_minutes)];
    if let Some(due) = task.due_date {
        details.push(format!("due {}", due.format(TIME_FORMAT)));
    }
    if let Some(at) = task.scheduled_time {
        details.push(format!("at {}", at.format(TIME_FORMAT)));
    }

    format!(
        "{} [{}] {:>5}  {}  ({})",
        task.id,
        if task.completed { "x" } else { " " },
        task.importance.to_string(),
        task.title,
        details.join(", ")
    )
}

pub fn format_time(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}
