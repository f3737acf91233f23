//! # taskcal Core Library
//!
//! Task prioritization and auto-scheduling for a personal task list. Each task
//! carries an importance score, an estimated duration, an optional due date and
//! an optional calendar slot; this crate turns those signals into an
//! actionable ordering and slot recommendations.
//!
//! ## Architecture
//!
//! - **Task Model**: validated task creation and the host-owned [`TaskBook`]
//! - **Importance Heuristic**: keyword rule table mapping text to a score
//! - **Scheduling Engine**: priority ranking, urgency, conflicts and slot search
//! - **Notifications**: soonest-first view of scheduled open tasks
//!
//! Engine functions are pure reads over a snapshot of the collection. They take
//! "now" as an argument and keep no state between calls, so the host decides
//! when to recompute and whether to apply a suggestion.

pub mod error;
pub mod importance;
pub mod notifications;
pub mod scheduler;
pub mod task;

pub use error::{CoreError, InvariantViolation, ValidationError};
pub use importance::{suggest_importance, ImportanceHeuristic, ImportanceRule};
pub use notifications::{select_upcoming, upcoming_notifications, Notification, DEFAULT_UPCOMING_LIMIT};
pub use scheduler::{
    classify_urgency, find_conflicts, rank_by_priority, suggest_slot, Conflict, NoSlotReason,
    RankedTask, ScheduleReport, SchedulerConfig, SchedulingEngine, SlotSuggestion, Urgency,
};
pub use task::{create_task, Importance, Task, TaskBook, TaskCategory, TaskInput, TaskPatch};
