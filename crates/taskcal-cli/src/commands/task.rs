//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use taskcal_core::{suggest_importance, TaskInput, TaskPatch};

use super::task_line;
use crate::storage::TaskStore;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Importance from 1 to 10
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        importance: i64,
        /// Use the keyword heuristic on the description instead of --importance
        #[arg(long, conflicts_with = "importance")]
        suggest: bool,
        /// Estimated time in minutes
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        estimate: i64,
        /// Category: Work, Personal, School, Errands or Health
        #[arg(long, default_value = "Work")]
        category: String,
        /// Due date (RFC 3339)
        #[arg(long)]
        due: Option<DateTime<Utc>>,
        /// Scheduled start (RFC 3339)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List tasks in insertion order
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show task details as JSON
    Get {
        /// Task ID
        id: String,
    },
    /// Edit a task
    Edit {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New importance
        #[arg(long, allow_negative_numbers = true)]
        importance: Option<i64>,
        /// New estimate in minutes
        #[arg(long, allow_negative_numbers = true)]
        estimate: Option<i64>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New due date (RFC 3339)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// New scheduled start (RFC 3339)
        #[arg(long, conflicts_with = "unschedule")]
        at: Option<DateTime<Utc>>,
        /// Remove the scheduled start
        #[arg(long)]
        unschedule: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Mark a completed task as open again
    Reopen {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::open()?;
    let mut book = store.load()?;

    match action {
        TaskAction::Add {
            title,
            description,
            importance,
            suggest,
            estimate,
            category,
            due,
            at,
        } => {
            let importance = if suggest {
                i64::from(suggest_importance(&description).value())
            } else {
                importance
            };
            let mut input = TaskInput::new(title)
                .with_description(description)
                .with_importance(importance)
                .with_estimated_minutes(estimate)
                .with_category(category);
            input.due_date = due;
            input.scheduled_time = at;

            let task = book.add(input)?.clone();
            store.save(&book)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { all, json } => {
            let tasks: Vec<_> = book.tasks().iter().filter(|t| all || !t.completed).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks");
            } else {
                for task in tasks {
                    println!("{}", task_line(task));
                }
            }
        }
        TaskAction::Get { id } => {
            let task = book.get(&id).ok_or(format!("Task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        TaskAction::Edit {
            id,
            title,
            description,
            importance,
            estimate,
            category,
            due,
            clear_due,
            at,
            unschedule,
        } => {
            let patch = TaskPatch {
                title,
                description,
                importance,
                estimated_minutes: estimate,
                category,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                scheduled_time: if unschedule { Some(None) } else { at.map(Some) },
            };
            if patch.is_empty() {
                return Err("nothing to edit".into());
            }

            let task = book.update(&id, patch)?.clone();
            store.save(&book)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id } => {
            book.set_completed(&id, true)?;
            store.save(&book)?;
            println!("Task completed: {id}");
        }
        TaskAction::Reopen { id } => {
            book.set_completed(&id, false)?;
            store.save(&book)?;
            println!("Task reopened: {id}");
        }
        TaskAction::Delete { id } => {
            book.delete(&id)?;
            store.save(&book)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
