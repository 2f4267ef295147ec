//! Task operations for td.
//!
//! `TaskService` owns the in-memory store and the storage manager; every
//! mutating operation validates, mutates the store, then persists the full
//! collection synchronously. A failed persist keeps the in-memory change
//! and surfaces the error; memory and disk diverge until the next
//! successful save. Not-found is an outcome value, never an error.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::task::{sort_tasks, Priority, Status, TaskRecord};
use crate::validate::{lenient_priority, strict_priority, validate_text};

/// Status filter for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "status filter must be one of all, pending, completed (got '{other}')"
            ))),
        }
    }

    fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == Status::Pending,
            StatusFilter::Completed => status == Status::Completed,
        }
    }
}

/// Priority filter for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFilter {
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed == "all" {
            return Ok(PriorityFilter::All);
        }
        trimmed
            .parse()
            .map(PriorityFilter::Only)
            .map_err(|()| {
                Error::InvalidArgument(format!(
                    "priority filter must be one of all, low, medium, high (got '{trimmed}')"
                ))
            })
    }

    fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => priority == wanted,
        }
    }
}

/// Fields accepted by `update`; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

impl UpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

/// Outcome of an update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(TaskRecord),
    Unchanged,
    NotFound,
}

/// Outcome of a complete/reopen transition
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Applied(TaskRecord),
    /// The record was already in the requested state
    Noop(TaskRecord),
    NotFound,
}

/// Outcome of a delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(TaskRecord),
    NotFound,
}

/// Aggregated counts for `stats`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// completed / total * 100, 0 for an empty store
    pub completion_rate: f64,
    pub pending_high: usize,
    pub pending_medium: usize,
    pub pending_low: usize,
}

/// Health status levels
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Structured result of `health_check`; failures are embedded, not thrown
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub total_tasks: usize,
    pub valid_tasks: usize,
    pub data_file: String,
    pub timestamp: chrono::DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The task-list service: store, storage, and the operation surface
#[derive(Debug)]
pub struct TaskService {
    store: TaskStore,
    storage: Storage,
    max_title_length: usize,
    max_description_length: usize,
}

impl TaskService {
    /// Build the service and populate the store from the data file
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::new(config.file.clone());
        let mut store = TaskStore::new(config.max_tasks);
        store.replace_all(storage.load()?);
        Ok(Self {
            store,
            storage,
            max_title_length: config.max_title_length,
            max_description_length: config.max_description_length,
        })
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Add a new task; unknown priority falls back to medium with a warning
    pub fn add(&mut self, title: &str, description: &str, priority: &str) -> Result<TaskRecord> {
        if self.store.len() >= self.store.capacity() {
            return Err(Error::Capacity {
                max: self.store.capacity(),
            });
        }

        let title = validate_text(title, self.max_title_length, "Title")?;
        if title.is_empty() {
            return Err(Error::Validation("Title cannot be empty".to_string()));
        }
        let description =
            validate_text(description, self.max_description_length, "Description")?;
        let priority = lenient_priority(priority);

        let id = self.store.next_id();
        let record = TaskRecord::new(id, title, description, priority);
        self.store.insert(record.clone())?;
        self.storage.save(self.store.records())?;

        tracing::info!("added task {} '{}'", record.id, record.title);
        Ok(record)
    }

    /// List tasks matching the filters, sorted by priority then age
    pub fn list(&self, status: StatusFilter, priority: PriorityFilter) -> Vec<TaskRecord> {
        let mut tasks: Vec<TaskRecord> = self
            .store
            .records()
            .iter()
            .filter(|record| status.matches(record.status) && priority.matches(record.priority))
            .cloned()
            .collect();
        sort_tasks(&mut tasks);
        tasks
    }

    /// Fetch one task; absence is a normal result
    pub fn get(&self, id: u64) -> Option<&TaskRecord> {
        self.store.find(id)
    }

    /// Apply the provided fields to a task.
    ///
    /// Title must stay non-empty and priority must be a valid level (no
    /// lenient fallback here). Persists only when at least one field was
    /// provided.
    pub fn update(&mut self, id: u64, request: UpdateRequest) -> Result<UpdateOutcome> {
        if self.store.find(id).is_none() {
            return Ok(UpdateOutcome::NotFound);
        }
        if request.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }

        // Validate every provided field before touching the record so a
        // bad one leaves the store unchanged
        let title = match &request.title {
            Some(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Err(Error::Validation("Title cannot be empty".to_string()));
                }
                Some(trimmed)
            }
            None => None,
        };
        let description = request.description.as_ref().map(|value| value.trim().to_string());
        let priority = match &request.priority {
            Some(value) => Some(strict_priority(value)?),
            None => None,
        };

        let Some(record) = self.store.find_mut(id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(title) = title {
            record.title = title;
        }
        if let Some(description) = description {
            record.description = description;
        }
        if let Some(priority) = priority {
            record.priority = priority;
        }
        record.updated_at = Utc::now();
        let updated = record.clone();

        self.storage.save(self.store.records())?;
        tracing::info!("updated task {id}");
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Mark a task completed; completing a completed task is a no-op
    pub fn complete(&mut self, id: u64) -> Result<TransitionOutcome> {
        let Some(record) = self.store.find_mut(id) else {
            return Ok(TransitionOutcome::NotFound);
        };

        if record.status == Status::Completed {
            return Ok(TransitionOutcome::Noop(record.clone()));
        }

        let now = Utc::now();
        record.status = Status::Completed;
        record.completed_at = Some(now);
        record.updated_at = now;
        let completed = record.clone();

        self.storage.save(self.store.records())?;
        tracing::info!("completed task {id}");
        Ok(TransitionOutcome::Applied(completed))
    }

    /// Reopen a completed task; reopening a pending task is a no-op
    pub fn reopen(&mut self, id: u64) -> Result<TransitionOutcome> {
        let Some(record) = self.store.find_mut(id) else {
            return Ok(TransitionOutcome::NotFound);
        };

        if record.status == Status::Pending {
            return Ok(TransitionOutcome::Noop(record.clone()));
        }

        record.status = Status::Pending;
        record.completed_at = None;
        record.updated_at = Utc::now();
        let reopened = record.clone();

        self.storage.save(self.store.records())?;
        tracing::info!("reopened task {id}");
        Ok(TransitionOutcome::Applied(reopened))
    }

    /// Remove a task
    pub fn delete(&mut self, id: u64) -> Result<DeleteOutcome> {
        let Some(removed) = self.store.remove(id) else {
            return Ok(DeleteOutcome::NotFound);
        };

        self.storage.save(self.store.records())?;
        tracing::info!("deleted task {id}");
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Remove every completed task in one batch, persisting once
    pub fn clear_completed(&mut self) -> Result<usize> {
        let removed = self.store.retain(|record| record.status != Status::Completed);
        if removed == 0 {
            return Ok(0);
        }

        self.storage.save(self.store.records())?;
        tracing::info!("cleared {removed} completed tasks");
        Ok(removed)
    }

    /// Aggregate counts over the store
    pub fn stats(&self) -> TaskStats {
        let records = self.store.records();
        let total = records.len();
        let completed = records
            .iter()
            .filter(|record| record.status == Status::Completed)
            .count();
        let pending = total - completed;

        let pending_with = |priority: Priority| {
            records
                .iter()
                .filter(|record| record.status == Status::Pending && record.priority == priority)
                .count()
        };

        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        TaskStats {
            total,
            pending,
            completed,
            completion_rate,
            pending_high: pending_with(Priority::High),
            pending_medium: pending_with(Priority::Medium),
            pending_low: pending_with(Priority::Low),
        }
    }

    /// Report service health; internal failures are embedded in the report
    pub fn health_check(&self) -> HealthReport {
        let total = self.store.len();
        let valid = self
            .store
            .records()
            .iter()
            .filter(|record| record.is_valid())
            .count();

        let mut report = HealthReport {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            total_tasks: total,
            valid_tasks: valid,
            data_file: self.storage.data_file().display().to_string(),
            timestamp: Utc::now(),
            issues: None,
            error: None,
        };

        if let Err(err) = self.storage.ensure_dirs() {
            report.status = HealthStatus::Unhealthy;
            report.error = Some(err.to_string());
            tracing::error!("health check failed: {err}");
            return report;
        }

        if valid != total {
            report.status = HealthStatus::Warning;
            report.issues = Some(format!("{} corrupted tasks found", total - valid));
        }

        tracing::info!("health check completed: {}", report.status.as_str());
        report
    }
}
