//! Planning commands: priority ranking, urgency, conflicts and slot suggestion.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use taskcal_core::{NoSlotReason, SlotSuggestion, Urgency};

use super::{format_time, task_line};
use crate::storage::{Config, TaskStore};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Open tasks in priority order
    Rank {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Urgency of every task
    Urgency {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Open scheduled tasks whose time slots overlap
    Conflicts {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest the earliest free slot for a task
    Slot {
        /// Task ID
        id: String,
        /// Write the suggested slot to the task
        #[arg(long)]
        apply: bool,
    },
    /// Ranking with urgency plus conflicts, as JSON
    Report,
}

fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue => "overdue",
        Urgency::DueSoon => "due soon",
        Urgency::Scheduled => "scheduled",
        Urgency::Unscheduled => "unscheduled",
    }
}

pub fn run(action: PlanAction, now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = config.engine()?;
    let store = TaskStore::open()?;
    let mut book = store.load()?;

    match action {
        PlanAction::Rank { json } => {
            let ranked = engine.rank_by_priority(book.tasks())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else if ranked.is_empty() {
                println!("No open tasks");
            } else {
                for (i, task) in ranked.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, task_line(task));
                }
            }
        }
        PlanAction::Urgency { json } => {
            let rows: Vec<_> = book
                .tasks()
                .iter()
                .map(|task| (task, engine.classify_urgency(task, now)))
                .collect();
            if json {
                let value: Vec<_> = rows
                    .iter()
                    .map(|(task, urgency)| serde_json::json!({ "id": task.id, "urgency": urgency }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for (task, urgency) in rows {
                    println!("{:<12} {}", urgency_label(urgency), task_line(task));
                }
            }
        }
        PlanAction::Conflicts { json } => {
            let conflicts = engine.find_conflicts(book.tasks())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("No conflicts");
            } else {
                for c in &conflicts {
                    println!(
                        "{} overlaps {} from {} for {}m",
                        c.first_id,
                        c.second_id,
                        format_time(c.overlap_start),
                        c.overlap_minutes()
                    );
                }
            }
        }
        PlanAction::Slot { id, apply } => {
            let task = book.get(&id).ok_or(format!("Task not found: {id}"))?;
            match engine.suggest_slot(task, book.tasks(), now)? {
                SlotSuggestion::Available { start, end } => {
                    println!("Suggested slot: {} - {}", format_time(start), format_time(end));
                    if apply {
                        book.apply_slot(&id, start)?;
                        store.save(&book)?;
                        println!("Task scheduled: {id}");
                    }
                }
                SlotSuggestion::NoSlotAvailable { reason } => {
                    let why = match reason {
                        NoSlotReason::HorizonExhausted => format!(
                            "no free slot in the next {} days",
                            engine.config().search_horizon_days
                        ),
                        NoSlotReason::PastDueDate => "no free slot before the due date".to_string(),
                    };
                    println!("No slot available: {why}; pick a time manually with `task edit --at`");
                }
            }
        }
        PlanAction::Report => {
            let report = engine.analyze(book.tasks(), now)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
