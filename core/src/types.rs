//! Domain DTOs for the task API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Decoding applies the backend's defaults (`completed = false`,
//! `priority = 1`) so sparse payloads still parse.

use serde::{Deserialize, Serialize};

/// Priority levels understood by the backend. Nothing enforces them: other
/// integers pass through the client untouched.
pub struct Priority;

impl Priority {
    pub const LOW: i32 = 1;
    pub const MEDIUM: i32 = 2;
    pub const HIGH: i32 = 3;
}

fn default_priority() -> i32 {
    Priority::LOW
}

/// A single task. `id` is `None` until the server has persisted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl Task {
    /// The task's full state without its id, as sent to create/update.
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            priority: self.priority,
        }
    }
}

/// Request payload for creating a task or fully replacing an existing one.
///
/// Update has replacement semantics: every field is sent, so the caller
/// supplies the complete desired state rather than a patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            priority: Priority::LOW,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Server-side filter for listing tasks. Unset fields are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub priority: Option<i32>,
}

impl TaskFilter {
    /// Render as a query string including the leading `?`, or an empty
    /// string when no field is set.
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if let Some(completed) = self.completed {
            params.push(format!("completed={completed}"));
        }
        if let Some(priority) = self.priority {
            params.push(format!("priority={priority}"));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<u64>,
}

/// Body of a successful `DELETE /tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Tasks partitioned by priority level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityBuckets {
    pub high: Vec<Task>,
    pub medium: Vec<Task>,
    pub low: Vec<Task>,
}

impl PriorityBuckets {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut buckets = Self::default();
        for task in tasks {
            match task.priority {
                Priority::HIGH => buckets.high.push(task.clone()),
                Priority::MEDIUM => buckets.medium.push(task.clone()),
                Priority::LOW => buckets.low.push(task.clone()),
                _ => {}
            }
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_task_takes_backend_defaults() {
        let task: Task = serde_json::from_str(r#"{"title":"Sparse"}"#).unwrap();
        assert_eq!(task.id, None);
        assert_eq!(task.description, None);
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::LOW);
    }

    #[test]
    fn new_task_serializes_without_id() {
        let body = serde_json::to_value(NewTask::new("A").with_priority(Priority::HIGH)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "A");
        assert_eq!(body["priority"], 3);
        assert_eq!(body["completed"], false);
    }

    #[test]
    fn to_new_task_strips_id() {
        let task = Task {
            id: Some(4),
            title: "Keep".to_string(),
            description: Some("all fields".to_string()),
            completed: true,
            priority: Priority::MEDIUM,
        };
        let new_task = task.to_new_task();
        assert_eq!(new_task.title, "Keep");
        assert_eq!(new_task.description.as_deref(), Some("all fields"));
        assert!(new_task.completed);
        assert_eq!(new_task.priority, Priority::MEDIUM);
    }

    #[test]
    fn empty_filter_has_no_query() {
        assert_eq!(TaskFilter::default().to_query(), "");
    }

    #[test]
    fn filter_sends_only_set_fields() {
        let only_priority = TaskFilter {
            completed: None,
            priority: Some(2),
        };
        assert_eq!(only_priority.to_query(), "?priority=2");

        let both = TaskFilter {
            completed: Some(false),
            priority: Some(3),
        };
        assert_eq!(both.to_query(), "?completed=false&priority=3");
    }

    #[test]
    fn priority_buckets_skip_unknown_levels() {
        let tasks: Vec<Task> = [1, 2, 7]
            .into_iter()
            .map(|priority| Task {
                id: None,
                title: "t".to_string(),
                description: None,
                completed: false,
                priority,
            })
            .collect();
        let buckets = PriorityBuckets::from_tasks(&tasks);
        assert_eq!(buckets.low.len(), 1);
        assert_eq!(buckets.medium.len(), 1);
        assert!(buckets.high.is_empty());
    }
}
