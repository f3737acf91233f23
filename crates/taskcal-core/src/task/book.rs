//! In-memory task collection owned by the host application.
//!
//! The engine never mutates tasks. Everything that changes the collection
//! (add, complete, edit, delete, accepting a suggested slot or importance)
//! goes through [`TaskBook`], which keeps ids unique and re-validates edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{create_task, validate_estimated_minutes, validate_title, Importance, Task, TaskCategory, TaskInput};
use crate::error::{CoreError, InvariantViolation, Result, ValidationError};

/// Field edits for an existing task. `None` leaves the field untouched.
///
/// The doubly-optional dates distinguish "leave as is" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub importance: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub category: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.importance.is_none()
            && self.estimated_minutes.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.scheduled_time.is_none()
    }
}

/// Ordered task collection. Insertion order is preserved and is the final
/// tie-break of the priority ranking.
#[derive(Debug, Clone, Default)]
pub struct TaskBook {
    tasks: Vec<Task>,
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing collection, e.g. one loaded from disk.
    pub fn from_tasks(tasks: Vec<Task>) -> std::result::Result<Self, InvariantViolation> {
        crate::scheduler::check_collection(&tasks)?;
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate the input and append the new task.
    pub fn add(&mut self, input: TaskInput) -> std::result::Result<&Task, ValidationError> {
        let mut task = create_task(input)?;
        let taken: HashSet<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        while taken.contains(task.id.as_str()) {
            task.id = super::new_task_id(task.created_at);
        }
        tracing::debug!(id = %task.id, title = %task.title, "task added");
        self.tasks.push(task);
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    pub fn set_completed(&mut self, id: &str, completed: bool) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.completed = completed;
        tracing::debug!(id, completed, "task completion changed");
        Ok(task)
    }

    pub fn toggle_completed(&mut self, id: &str) -> Result<&Task> {
        let completed = !self.get_mut(id)?.completed;
        self.set_completed(id, completed)
    }

    /// Apply field edits. Nothing is written unless every edited field is valid.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let importance = patch.importance.map(Importance::new).transpose()?;
        let estimated = patch
            .estimated_minutes
            .map(validate_estimated_minutes)
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(str::parse::<TaskCategory>)
            .transpose()?;

        let task = self.get_mut(id)?;
        if let Some(t) = title {
            task.title = t;
        }
        if let Some(d) = patch.description {
            task.description = d;
        }
        if let Some(i) = importance {
            task.importance = i;
        }
        if let Some(e) = estimated {
            task.estimated_minutes = e;
        }
        if let Some(c) = category {
            task.category = c;
        }
        if let Some(d) = patch.due_date {
            task.due_date = d;
        }
        if let Some(s) = patch.scheduled_time {
            task.scheduled_time = s;
        }
        Ok(task)
    }

    /// Remove a task. Its id is not handed out again.
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        tracing::debug!(id, "task deleted");
        Ok(self.tasks.remove(index))
    }

    /// Accept a slot proposed by the scheduling engine.
    pub fn apply_slot(&mut self, id: &str, start: DateTime<Utc>) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.scheduled_time = Some(start);
        Ok(task)
    }

    /// Accept an importance proposed by the heuristic.
    pub fn apply_importance(&mut self, id: &str, importance: Importance) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.importance = importance;
        Ok(task)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
    }
}
