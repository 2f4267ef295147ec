//! Task record model for td.
//!
//! Records are persisted as a JSON array in the configured data file; the
//! serde shapes here define that on-disk format. Loading is lenient: an
//! entry with `id` and `title` present is accepted even when other fields
//! are missing, so older or hand-edited files keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric weight used for sorting: high sorts before low
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Create a new pending record with both timestamps set to now
    pub fn new(id: u64, title: String, description: String, priority: Priority) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description,
            priority,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Structurally valid: a real id and a non-blank title
    pub fn is_valid(&self) -> bool {
        self.id >= 1 && !self.title.trim().is_empty()
    }
}

/// Sort records for listing: priority high to low, then oldest first,
/// with the id as a stable final tie-break
pub fn sort_tasks(tasks: &mut [TaskRecord]) {
    tasks.sort_by(|left, right| {
        right
            .priority
            .weight()
            .cmp(&left.priority.weight())
            .then_with(|| left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.cmp(&right.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u64, priority: Priority, created_secs: i64) -> TaskRecord {
        let created = Utc.timestamp_opt(created_secs, 0).unwrap();
        TaskRecord {
            id,
            title: format!("task {id}"),
            description: String::new(),
            priority,
            status: Status::Pending,
            created_at: created,
            updated_at: created,
            completed_at: None,
        }
    }

    #[test]
    fn sorts_high_before_medium_before_low() {
        let mut tasks = vec![
            record(1, Priority::Low, 10),
            record(2, Priority::High, 20),
            record(3, Priority::Medium, 5),
        ];
        sort_tasks(&mut tasks);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ties_break_by_creation_time_ascending() {
        let mut tasks = vec![
            record(5, Priority::Medium, 300),
            record(6, Priority::Medium, 100),
            record(7, Priority::Medium, 200),
        ];
        sort_tasks(&mut tasks);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![6, 7, 5]);
    }

    #[test]
    fn serializes_snake_case_enums() {
        let task = record(1, Priority::High, 0);
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"priority\":\"high\""));
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"completed_at\":null"));
    }

    #[test]
    fn deserializes_sparse_entry_with_defaults() {
        let json = r#"{"id": 3, "title": "only the basics"}"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, Status::Pending);
        assert!(task.description.is_empty());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn missing_title_is_rejected() {
        let json = r#"{"id": 3}"#;
        assert!(serde_json::from_str::<TaskRecord>(json).is_err());
    }

    #[test]
    fn validity_requires_id_and_title() {
        let mut task = record(1, Priority::Low, 0);
        assert!(task.is_valid());
        task.title = "   ".to_string();
        assert!(!task.is_valid());
        task.title = "ok".to_string();
        task.id = 0;
        assert!(!task.is_valid());
    }
}
