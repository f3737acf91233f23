//! Scheduling engine: priority ranking, urgency classification, conflict
//! detection and slot suggestion over a snapshot of the task collection.
//!
//! Every operation is a pure read. Results are fresh values and the input
//! slice is never modified; the host decides whether to apply a suggestion
//! (see [`crate::task::TaskBook::apply_slot`]).
//!
//! Ranking order:
//! 1. importance, highest first
//! 2. due date, nearest first; tasks without one sort after all that have one
//! 3. estimated time, shortest first (quick wins)
//! 4. position in the input slice

mod slot;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{InvariantViolation, ValidationError};
use crate::task::Task;

pub use slot::{find_conflicts, Conflict, NoSlotReason, SlotSuggestion};

/// Default window for [`Urgency::DueSoon`], in hours.
pub const DEFAULT_DUE_SOON_HOURS: u32 = 24;

/// Largest accepted slot step: one day.
pub const MAX_SLOT_GRANULARITY_MINUTES: u32 = 24 * 60;
/// Largest accepted slot search horizon: one leap year.
pub const MAX_SEARCH_HORIZON_DAYS: u32 = 366;
/// Largest accepted "due soon" window: one leap year.
pub const MAX_DUE_SOON_HOURS: u32 = 366 * 24;

/// Urgency of a single task relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Due date or scheduled time has passed and the task is still open
    Overdue,
    /// Due date or scheduled time falls inside the horizon
    DueSoon,
    /// Placed on the calendar beyond the horizon
    Scheduled,
    /// None of the above
    Unscheduled,
}

/// Scheduler configuration. Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Step between candidate slot starts (minutes)
    pub slot_granularity_minutes: u32,
    /// How far ahead slot search looks (days)
    pub search_horizon_days: u32,
    /// Window for "due soon" classification (hours)
    pub due_soon_hours: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: 15,
            search_horizon_days: 14,
            due_soon_hours: DEFAULT_DUE_SOON_HOURS,
        }
    }
}

impl SchedulerConfig {
    /// Every field must lie in `1..=MAX_*`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            (
                "slot_granularity_minutes",
                self.slot_granularity_minutes,
                MAX_SLOT_GRANULARITY_MINUTES,
            ),
            (
                "search_horizon_days",
                self.search_horizon_days,
                MAX_SEARCH_HORIZON_DAYS,
            ),
            ("due_soon_hours", self.due_soon_hours, MAX_DUE_SOON_HOURS),
        ];
        for (field, value, max) in fields {
            if value == 0 || value > max {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be between 1 and {max}, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn slot_granularity(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_granularity_minutes))
    }

    pub fn search_horizon(&self) -> Duration {
        Duration::days(i64::from(self.search_horizon_days))
    }

    pub fn due_soon_horizon(&self) -> Duration {
        Duration::hours(i64::from(self.due_soon_hours))
    }
}

/// A ranked task together with its urgency.
#[derive(Debug, Clone, Serialize)]
pub struct RankedTask<'a> {
    /// 1-based position in the ranking
    pub rank: usize,
    pub urgency: Urgency,
    pub task: &'a Task,
}

/// Combined view of the collection at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub ranking: Vec<RankedTask<'a>>,
    pub conflicts: Vec<Conflict>,
}

impl ScheduleReport<'_> {
    pub fn overdue_count(&self) -> usize {
        self.ranking
            .iter()
            .filter(|r| r.urgency == Urgency::Overdue)
            .count()
    }
}

/// Stateless scheduling engine parameterized by [`SchedulerConfig`].
#[derive(Debug, Clone, Default)]
pub struct SchedulingEngine {
    config: SchedulerConfig,
}

impl SchedulingEngine {
    /// Create a new engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Open tasks in priority order.
    pub fn rank_by_priority<'a>(&self, tasks: &'a [Task]) -> Result<Vec<&'a Task>, InvariantViolation> {
        rank_by_priority(tasks)
    }

    /// Urgency using the configured "due soon" window.
    pub fn classify_urgency(&self, task: &Task, now: DateTime<Utc>) -> Urgency {
        classify_urgency(task, now, self.config.due_soon_horizon())
    }

    /// Earliest free slot for `task` at or after `now`.
    ///
    /// # Errors
    /// Returns an [`InvariantViolation`] if the collection has duplicate ids or
    /// if `task` or any task in the collection has a zero estimate.
    pub fn suggest_slot(
        &self,
        task: &Task,
        tasks: &[Task],
        now: DateTime<Utc>,
    ) -> Result<SlotSuggestion, InvariantViolation> {
        check_collection(tasks)?;
        check_task(task)?;
        let suggestion = slot::search(
            task,
            tasks,
            now,
            self.config.slot_granularity(),
            self.config.search_horizon(),
        );
        tracing::debug!(id = %task.id, ?suggestion, "slot search finished");
        Ok(suggestion)
    }

    pub fn find_conflicts(&self, tasks: &[Task]) -> Result<Vec<Conflict>, InvariantViolation> {
        find_conflicts(tasks)
    }

    /// Ranking annotated with urgency, plus calendar conflicts.
    pub fn analyze<'a>(
        &self,
        tasks: &'a [Task],
        now: DateTime<Utc>,
    ) -> Result<ScheduleReport<'a>, InvariantViolation> {
        let ranking = rank_by_priority(tasks)?
            .into_iter()
            .enumerate()
            .map(|(i, task)| RankedTask {
                rank: i + 1,
                urgency: self.classify_urgency(task, now),
                task,
            })
            .collect();
        let conflicts = find_conflicts(tasks)?;

        Ok(ScheduleReport {
            generated_at: now,
            ranking,
            conflicts,
        })
    }
}

/// Open tasks ordered by importance, due date, estimate, then input position.
///
/// # Errors
/// Returns an [`InvariantViolation`] for duplicate ids or zero estimates.
pub fn rank_by_priority(tasks: &[Task]) -> Result<Vec<&Task>, InvariantViolation> {
    check_collection(tasks)?;
    let mut open: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    // sort_by is stable, so input position is the final tie-break
    open.sort_by(|a, b| priority_order(a, b));
    tracing::debug!(total = tasks.len(), ranked = open.len(), "ranked tasks");
    Ok(open)
}

fn priority_order(a: &Task, b: &Task) -> Ordering {
    b.importance
        .cmp(&a.importance)
        .then_with(|| due_date_order(a.due_date, b.due_date))
        .then_with(|| a.estimated_minutes.cmp(&b.estimated_minutes))
}

/// Absent due dates sort last.
fn due_date_order(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Classify a task relative to `now`, using `horizon` as the "due soon" window.
///
/// Completed tasks are never overdue and fall through to the remaining rules.
/// A horizon past the representable range has no upper bound.
pub fn classify_urgency(task: &Task, now: DateTime<Utc>, horizon: Duration) -> Urgency {
    if task.is_overdue(now) {
        return Urgency::Overdue;
    }

    let soon = now.checked_add_signed(horizon);
    let within = |at: Option<DateTime<Utc>>| match (at, soon) {
        (Some(at), _) if at < now => false,
        (Some(at), Some(soon)) => at <= soon,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if within(task.due_date) || within(task.scheduled_time) {
        return Urgency::DueSoon;
    }

    if task.scheduled_time.is_some_and(|at| at >= now) {
        Urgency::Scheduled
    } else {
        Urgency::Unscheduled
    }
}

/// Slot suggestion with the default [`SchedulerConfig`].
pub fn suggest_slot(
    task: &Task,
    tasks: &[Task],
    now: DateTime<Utc>,
) -> Result<SlotSuggestion, InvariantViolation> {
    SchedulingEngine::new().suggest_slot(task, tasks, now)
}

/// Check the collection-level preconditions every engine operation relies on.
pub(crate) fn check_collection(tasks: &[Task]) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id.as_str()) {
            tracing::warn!(id = %task.id, "duplicate task id");
            return Err(InvariantViolation::DuplicateId { id: task.id.clone() });
        }
        check_task(task)?;
    }
    Ok(())
}

fn check_task(task: &Task) -> Result<(), InvariantViolation> {
    if task.estimated_minutes == 0 {
        return Err(InvariantViolation::NonPositiveDuration { id: task.id.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{create_task, TaskInput};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn make_test_task(title: &str, importance: i64) -> Task {
        create_task(TaskInput::new(title).with_importance(importance)).unwrap()
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_rank_by_importance() {
        let tasks = vec![
            make_test_task("low", 2),
            make_test_task("high", 9),
            make_test_task("medium", 5),
        ];

        let ranked = rank_by_priority(&tasks).unwrap();
        assert_eq!(titles(&ranked), ["high", "medium", "low"]);
    }

    #[test]
    fn test_due_date_breaks_importance_ties() {
        let mut a = make_test_task("A", 9);
        a.due_date = Some(now() + Duration::days(1));
        let b = make_test_task("B", 9);
        let mut c = make_test_task("C", 5);
        c.due_date = Some(now() + Duration::hours(3));
        let tasks = vec![c, b, a];

        let ranked = rank_by_priority(&tasks).unwrap();
        assert_eq!(titles(&ranked), ["A", "B", "C"]);
    }

    #[test]
    fn test_shorter_estimate_breaks_remaining_ties() {
        let mut long = make_test_task("long", 6);
        long.estimated_minutes = 90;
        let mut short = make_test_task("short", 6);
        short.estimated_minutes = 15;
        let tasks = vec![long, short];

        let ranked = rank_by_priority(&tasks).unwrap();
        assert_eq!(titles(&ranked), ["short", "long"]);
    }

    #[test]
    fn test_input_order_is_final_tie_break() {
        let tasks = vec![
            make_test_task("first", 5),
            make_test_task("second", 5),
            make_test_task("third", 5),
        ];

        let ranked = rank_by_priority(&tasks).unwrap();
        assert_eq!(titles(&ranked), ["first", "second", "third"]);
    }

    #[test]
    fn test_completed_tasks_are_not_ranked() {
        let mut done = make_test_task("done", 10);
        done.completed = true;
        let tasks = vec![done, make_test_task("open", 1)];

        let ranked = rank_by_priority(&tasks).unwrap();
        assert_eq!(titles(&ranked), ["open"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let task = make_test_task("a", 5);
        let tasks = vec![task.clone(), task];

        assert!(matches!(
            rank_by_priority(&tasks),
            Err(InvariantViolation::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_zero_estimate_is_rejected() {
        let mut task = make_test_task("a", 5);
        task.estimated_minutes = 0;

        assert!(matches!(
            rank_by_priority(&[task]),
            Err(InvariantViolation::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn test_urgency_due_soon_vs_far() {
        let mut task = make_test_task("report", 5);
        task.due_date = Some(now() + Duration::hours(2));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::DueSoon);

        task.due_date = Some(now() + Duration::days(30));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Unscheduled);

        task.scheduled_time = Some(now() + Duration::days(3));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Scheduled);
    }

    #[test]
    fn test_urgency_overdue_and_completed() {
        let mut task = make_test_task("call", 5);
        task.scheduled_time = Some(now() - Duration::minutes(5));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Overdue);

        task.completed = true;
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Unscheduled);

        task.scheduled_time = Some(now() + Duration::days(3));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Scheduled);

        task.due_date = Some(now() + Duration::hours(2));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::DueSoon);
    }

    #[test]
    fn test_urgency_horizon_past_representable_range() {
        let mut task = make_test_task("someday", 5);
        task.scheduled_time = Some(now() + Duration::days(3650));
        let horizon = Duration::hours(i64::from(u32::MAX));

        let far_now = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(classify_urgency(&task, far_now, horizon), Urgency::Overdue);

        task.scheduled_time = Some(DateTime::<Utc>::MAX_UTC);
        assert_eq!(classify_urgency(&task, far_now, horizon), Urgency::DueSoon);
    }

    #[test]
    fn test_urgency_horizon_is_inclusive() {
        let mut task = make_test_task("edge", 5);
        task.scheduled_time = Some(now() + Duration::hours(24));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::DueSoon);

        task.scheduled_time = Some(now() + Duration::hours(24) + Duration::minutes(1));
        assert_eq!(classify_urgency(&task, now(), Duration::hours(24)), Urgency::Scheduled);
    }

    #[test]
    fn test_config_rejects_zero_values() {
        let config = SchedulerConfig {
            slot_granularity_minutes: 0,
            ..SchedulerConfig::default()
        };
        let err = SchedulingEngine::with_config(config).unwrap_err();
        assert_eq!(err.field(), "slot_granularity_minutes");
    }

    #[test]
    fn test_config_rejects_oversized_values() {
        let config = SchedulerConfig {
            search_horizon_days: u32::MAX,
            ..SchedulerConfig::default()
        };
        let err = SchedulingEngine::with_config(config).unwrap_err();
        assert_eq!(err.field(), "search_horizon_days");

        let config = SchedulerConfig {
            due_soon_hours: u32::MAX,
            ..SchedulerConfig::default()
        };
        let err = SchedulingEngine::with_config(config).unwrap_err();
        assert_eq!(err.field(), "due_soon_hours");

        let config = SchedulerConfig {
            slot_granularity_minutes: MAX_SLOT_GRANULARITY_MINUTES + 1,
            ..SchedulerConfig::default()
        };
        assert!(SchedulingEngine::with_config(config).is_err());

        let largest = SchedulerConfig {
            slot_granularity_minutes: MAX_SLOT_GRANULARITY_MINUTES,
            search_horizon_days: MAX_SEARCH_HORIZON_DAYS,
            due_soon_hours: MAX_DUE_SOON_HOURS,
        };
        assert!(SchedulingEngine::with_config(largest).is_ok());
    }

    #[test]
    fn test_analyze_reports_urgency_in_rank_order() {
        let mut overdue = make_test_task("overdue", 3);
        overdue.due_date = Some(now() - Duration::hours(1));
        let idle = make_test_task("idle", 8);
        let tasks = vec![overdue, idle];

        let report = SchedulingEngine::new().analyze(&tasks, now()).unwrap();

        assert_eq!(report.ranking.len(), 2);
        assert_eq!(report.ranking[0].rank, 1);
        assert_eq!(report.ranking[0].task.title, "idle");
        assert_eq!(report.ranking[0].urgency, Urgency::Unscheduled);
        assert_eq!(report.ranking[1].urgency, Urgency::Overdue);
        assert_eq!(report.overdue_count(), 1);
        assert!(report.conflicts.is_empty());
    }
}
