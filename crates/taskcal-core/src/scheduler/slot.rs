//! Slot search and calendar conflict detection.
//!
//! A scheduled task occupies the half-open interval
//! `[scheduled_time, scheduled_time + estimated_minutes)`, so back-to-back
//! tasks (09:00-09:30, 09:30-10:00) do not conflict.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::check_collection;
use crate::error::InvariantViolation;
use crate::task::Task;

/// Why slot search came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSlotReason {
    /// Every candidate inside the search horizon overlaps another task
    HorizonExhausted,
    /// No free slot ends on or before the task's due date
    PastDueDate,
}

/// Outcome of a slot search. Not finding a slot is a normal answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotSuggestion {
    Available {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    NoSlotAvailable { reason: NoSlotReason },
}

impl SlotSuggestion {
    /// Proposed start time, if a slot was found.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            SlotSuggestion::Available { start, .. } => Some(*start),
            SlotSuggestion::NoSlotAvailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotSuggestion::Available { .. })
    }
}

/// Two open scheduled tasks whose calendar intervals overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub first_id: String,
    pub second_id: String,
    pub overlap_start: DateTime<Utc>,
    pub overlap_end: DateTime<Utc>,
}

impl Conflict {
    pub fn overlap_minutes(&self) -> i64 {
        (self.overlap_end - self.overlap_start).num_minutes()
    }
}

fn overlaps(a: (DateTime<Utc>, DateTime<Utc>), b: (DateTime<Utc>, DateTime<Utc>)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Walk candidate starts from `now` in `step` increments up to
/// `now + horizon` and return the first one whose interval is free. A horizon
/// past the representable range ends the search at the last candidate that
/// still fits. Preconditions are checked by the caller.
pub(super) fn search(
    task: &Task,
    tasks: &[Task],
    now: DateTime<Utc>,
    step: Duration,
    horizon: Duration,
) -> SlotSuggestion {
    let occupied: Vec<_> = tasks
        .iter()
        .filter(|other| other.id != task.id)
        .filter_map(Task::scheduled_interval)
        .collect();
    let duration = task.estimated_duration();
    let limit = now.checked_add_signed(horizon).unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut next = Some(now);
    while let Some(start) = next.filter(|start| *start <= limit) {
        let Some(end) = start.checked_add_signed(duration) else {
            break;
        };
        if task.due_date.is_some_and(|due| end > due) {
            return SlotSuggestion::NoSlotAvailable {
                reason: NoSlotReason::PastDueDate,
            };
        }
        if !occupied.iter().any(|&busy| overlaps((start, end), busy)) {
            return SlotSuggestion::Available { start, end };
        }
        next = start.checked_add_signed(step);
    }

    SlotSuggestion::NoSlotAvailable {
        reason: NoSlotReason::HorizonExhausted,
    }
}

/// Pairs of open scheduled tasks whose intervals overlap, in input order.
///
/// # Errors
/// Returns an [`InvariantViolation`] for duplicate ids or zero estimates.
pub fn find_conflicts(tasks: &[Task]) -> Result<Vec<Conflict>, InvariantViolation> {
    check_collection(tasks)?;

    let scheduled: Vec<_> = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|t| t.scheduled_interval().map(|interval| (t, interval)))
        .collect();

    let mut conflicts = Vec::new();
    for (i, (first, a)) in scheduled.iter().enumerate() {
        for (second, b) in &scheduled[i + 1..] {
            if overlaps(*a, *b) {
                conflicts.push(Conflict {
                    first_id: first.id.clone(),
                    second_id: second.id.clone(),
                    overlap_start: a.0.max(b.0),
                    overlap_end: a.1.min(b.1),
                });
            }
        }
    }

    if !conflicts.is_empty() {
        tracing::debug!(count = conflicts.len(), "calendar conflicts found");
    }
    Ok(conflicts)
}
