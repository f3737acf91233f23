//! Task model: the canonical entity, its field types and validated creation.
//!
//! A [`Task`] is valid iff its title is non-empty, its importance lies in
//! `1..=10` and its estimate is a positive number of minutes. [`create_task`]
//! is the only constructor that assigns ids; it rejects invalid input with a
//! field-identified [`ValidationError`].

pub mod book;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub use book::{TaskBook, TaskPatch};

/// Default importance for a new task.
pub const DEFAULT_IMPORTANCE: u8 = 5;
/// Default estimate for a new task, in minutes.
pub const DEFAULT_ESTIMATED_MINUTES: i64 = 30;

/// Importance score in `1..=10`, 10 being the most urgent.
///
/// Deserialization goes through [`Importance::new`], so a stored task can never
/// carry an out-of-range score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Importance(u8);

impl Importance {
    pub const MIN: Importance = Importance(1);
    pub const MAX: Importance = Importance(10);

    /// Validate a raw score.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (1..=10).contains(&value) {
            Ok(Importance(value as u8))
        } else {
            Err(ValidationError::ImportanceOutOfRange { value })
        }
    }

    /// Clamp a raw score into range.
    pub fn clamped(value: i64) -> Self {
        Importance(value.clamp(1, 10) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance(DEFAULT_IMPORTANCE)
    }
}

impl TryFrom<i64> for Importance {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Importance::new(value)
    }
}

impl From<Importance> for u8 {
    fn from(importance: Importance) -> Self {
        importance.0
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// Category of task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskCategory {
    Work,
    Personal,
    School,
    Errands,
    Health,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::School,
        TaskCategory::Errands,
        TaskCategory::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::School => "School",
            TaskCategory::Errands => "Errands",
            TaskCategory::Health => "Health",
        }
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Work
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCategory { value: s.to_string() })
    }
}

/// A task in the user's list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, assigned at insertion and never reused
    pub id: String,
    /// Task title (never empty)
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Importance score (1-10)
    pub importance: Importance,
    /// Estimated duration in minutes
    pub estimated_minutes: u32,
    pub category: TaskCategory,
    /// Deadline, if any
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Calendar placement, if any
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Estimated duration as a chrono `Duration`.
    pub fn estimated_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_minutes))
    }

    /// Half-open `[start, end)` interval occupied on the calendar, if scheduled.
    pub fn scheduled_interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.scheduled_time.map(|start| {
            let end = start
                .checked_add_signed(self.estimated_duration())
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            (start, end)
        })
    }

    /// A task is overdue when it is open and its due date or scheduled time
    /// has already passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed
            && (self.due_date.is_some_and(|due| due < now)
                || self.scheduled_time.is_some_and(|at| at < now))
    }
}

/// Raw task fields as submitted by an add-task form.
///
/// Numeric fields are signed and the category is free text so that every
/// malformed submission can be represented and rejected by [`create_task`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_importance")]
    pub importance: i64,
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: i64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

fn default_importance() -> i64 {
    i64::from(DEFAULT_IMPORTANCE)
}
fn default_estimated_minutes() -> i64 {
    DEFAULT_ESTIMATED_MINUTES
}
fn default_category() -> String {
    TaskCategory::default().as_str().to_string()
}

impl TaskInput {
    /// Input with form defaults: importance 5, 30 minutes, Work.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            importance: default_importance(),
            estimated_minutes: default_estimated_minutes(),
            category: default_category(),
            due_date: None,
            scheduled_time: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: i64) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_scheduled_time(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(at);
        self
    }
}

/// Build a new open task from form input, assigning a fresh id.
pub fn create_task(input: TaskInput) -> Result<Task, ValidationError> {
    let title = validate_title(&input.title)?;
    let importance = Importance::new(input.importance)?;
    let estimated_minutes = validate_estimated_minutes(input.estimated_minutes)?;
    let category: TaskCategory = input.category.parse()?;

    let now = Utc::now();
    Ok(Task {
        id: new_task_id(now),
        title,
        description: input.description,
        importance,
        estimated_minutes,
        category,
        due_date: input.due_date,
        scheduled_time: input.scheduled_time,
        completed: false,
        created_at: now,
    })
}

fn new_task_id(now: DateTime<Utc>) -> String {
    format!("task-{}-{}", now.timestamp(), uuid::Uuid::new_v4())
}

pub(crate) fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_estimated_minutes(minutes: i64) -> Result<u32, ValidationError> {
    if minutes <= 0 {
        return Err(ValidationError::NonPositiveDuration { value: minutes });
    }
    u32::try_from(minutes).map_err(|_| ValidationError::InvalidValue {
        field: "estimated_minutes".to_string(),
        message: format!("{minutes} minutes is too large"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_task_applies_defaults() {
        let task = create_task(TaskInput::new("Write report")).unwrap();

        assert!(task.id.starts_with("task-"));
        assert_eq!(task.title, "Write report");
        assert_eq!(task.importance.value(), 5);
        assert_eq!(task.estimated_minutes, 30);
        assert_eq!(task.category, TaskCategory::Work);
        assert!(!task.completed);
        assert!(task.due_date.is_none());
        assert!(task.scheduled_time.is_none());
    }

    #[test]
    fn create_task_assigns_distinct_ids() {
        let a = create_task(TaskInput::new("a")).unwrap();
        let b = create_task(TaskInput::new("a")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_task_rejects_blank_title() {
        let err = create_task(TaskInput::new("   ")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn create_task_rejects_out_of_range_importance() {
        for value in [0, 11, -3] {
            let err = create_task(TaskInput::new("t").with_importance(value)).unwrap_err();
            assert_eq!(err, ValidationError::ImportanceOutOfRange { value });
            assert_eq!(err.field(), "importance");
        }
    }

    #[test]
    fn create_task_rejects_zero_and_negative_estimates() {
        for value in [0, -15] {
            let err = create_task(TaskInput::new("t").with_estimated_minutes(value)).unwrap_err();
            assert_eq!(err, ValidationError::NonPositiveDuration { value });
        }
    }

    #[test]
    fn create_task_rejects_unknown_category() {
        let err = create_task(TaskInput::new("t").with_category("Hobby")).unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn category_parsing_ignores_case() {
        assert_eq!("health".parse::<TaskCategory>().unwrap(), TaskCategory::Health);
        assert_eq!(" ERRANDS ".parse::<TaskCategory>().unwrap(), TaskCategory::Errands);
    }

    #[test]
    fn importance_clamps_at_boundaries() {
        assert_eq!(Importance::clamped(42), Importance::MAX);
        assert_eq!(Importance::clamped(-1), Importance::MIN);
        assert_eq!(Importance::clamped(7).value(), 7);
    }

    #[test]
    fn importance_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<Importance>("7").is_ok());
        assert!(serde_json::from_str::<Importance>("0").is_err());
        assert!(serde_json::from_str::<Importance>("11").is_err());
    }

    #[test]
    fn overdue_requires_open_task_with_past_time() {
        let now = Utc::now();
        let mut task = create_task(TaskInput::new("t").with_scheduled_time(now - Duration::hours(1))).unwrap();
        assert!(task.is_overdue(now));

        task.completed = true;
        assert!(!task.is_overdue(now));

        task.completed = false;
        task.scheduled_time = Some(now + Duration::hours(1));
        assert!(!task.is_overdue(now));

        task.due_date = Some(now - Duration::minutes(1));
        assert!(task.is_overdue(now));
    }

    #[test]
    fn task_serialization() {
        let task = create_task(
            TaskInput::new("Dentist")
                .with_category("Health")
                .with_importance(8)
                .with_due_date(Utc::now()),
        )
        .unwrap();

        let json = serde_json::to_string(&task).unwrap();
        let decoded: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, task);
    }
}
