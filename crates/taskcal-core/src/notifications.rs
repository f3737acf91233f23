//! Upcoming-task selection for the notification bell.
//!
//! This is a time-ordered view ("what's next"), independent of the priority
//! ranking in [`crate::scheduler`]. Tasks are sorted by scheduled time first
//! and truncated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Importance, Task};

/// Default number of upcoming tasks shown.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Open tasks with a scheduled time, soonest first, at most `limit` of them.
///
/// Ties on scheduled time keep input order. A `limit` of 0 yields nothing.
pub fn select_upcoming(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.scheduled_time.is_some())
        .collect();
    upcoming.sort_by_key(|t| t.scheduled_time);
    upcoming.truncate(limit);
    upcoming
}

/// One entry of the notification dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub task_id: String,
    pub title: String,
    pub scheduled_time: DateTime<Utc>,
    pub importance: Importance,
}

impl Notification {
    /// `None` for tasks without a scheduled time.
    pub fn from_task(task: &Task) -> Option<Self> {
        Some(Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            scheduled_time: task.scheduled_time?,
            importance: task.importance,
        })
    }

    /// Short time label, e.g. "Mar 2, 9:30 AM".
    pub fn time_label(&self) -> String {
        self.scheduled_time.format("%b %-d, %-I:%M %p").to_string()
    }
}

/// Notification entries for [`select_upcoming`]. The badge count is the
/// length of the returned vector.
pub fn upcoming_notifications(tasks: &[Task], limit: usize) -> Vec<Notification> {
    select_upcoming(tasks, limit)
        .into_iter()
        .filter_map(Notification::from_task)
        .collect()
}
