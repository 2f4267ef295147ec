//! td command handlers.
//!
//! Each handler runs one service operation and emits the result through
//! the shared output envelope. Not-found outcomes are reported as normal
//! results, not errors.

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, task_block, task_line, HumanOutput, OutputOptions};
use crate::service::{
    DeleteOutcome, PriorityFilter, StatusFilter, TaskService, TransitionOutcome, UpdateOutcome,
    UpdateRequest,
};
use crate::task::TaskRecord;

#[derive(Serialize)]
struct TaskPayload<'a> {
    task: &'a TaskRecord,
}

#[derive(Serialize)]
struct OutcomePayload {
    outcome: &'static str,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<TaskRecord>,
}

impl OutcomePayload {
    fn bare(outcome: &'static str, id: u64) -> Self {
        Self {
            outcome,
            id,
            task: None,
        }
    }

    fn with_task(outcome: &'static str, id: u64, task: TaskRecord) -> Self {
        Self {
            outcome,
            id,
            task: Some(task),
        }
    }
}

pub fn add(
    service: &mut TaskService,
    title: &str,
    description: &str,
    priority: &str,
    options: OutputOptions,
) -> Result<()> {
    let record = service.add(title, description, priority)?;

    let mut human = HumanOutput::new(format!("Added task #{}: {}", record.id, record.title));
    human.push_summary("priority", record.priority.to_string());

    emit_success(options, "add", &TaskPayload { task: &record }, Some(&human))
}

pub fn list(
    service: &TaskService,
    status: &str,
    priority: &str,
    options: OutputOptions,
) -> Result<()> {
    let status = StatusFilter::parse(status)?;
    let priority = PriorityFilter::parse(priority)?;
    let tasks = service.list(status, priority);

    #[derive(Serialize)]
    struct ListPayload {
        count: usize,
        tasks: Vec<TaskRecord>,
    }

    let mut human = if tasks.is_empty() {
        HumanOutput::new("No tasks found matching the criteria.")
    } else {
        HumanOutput::new(format!("Found {} task(s):", tasks.len()))
    };
    for task in &tasks {
        human.push_detail(task_line(task));
    }

    let payload = ListPayload {
        count: tasks.len(),
        tasks,
    };
    emit_success(options, "list", &payload, Some(&human))
}

pub fn show(service: &TaskService, id: u64, options: OutputOptions) -> Result<()> {
    match service.get(id) {
        Some(record) => {
            let mut human = HumanOutput::new(format!("Task #{}", record.id));
            for line in task_block(record) {
                human.push_detail(line);
            }
            emit_success(options, "show", &TaskPayload { task: record }, Some(&human))
        }
        None => {
            let human = HumanOutput::new(format!("Task {id} not found."));
            let payload = OutcomePayload::bare("not_found", id);
            emit_success(options, "show", &payload, Some(&human))
        }
    }
}

pub fn update(
    service: &mut TaskService,
    id: u64,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    options: OutputOptions,
) -> Result<()> {
    let request = UpdateRequest {
        title,
        description,
        priority,
    };

    let (human, payload) = match service.update(id, request)? {
        UpdateOutcome::Updated(record) => (
            HumanOutput::new(format!("Task {id} updated successfully.")),
            OutcomePayload::with_task("updated", id, record),
        ),
        UpdateOutcome::Unchanged => (
            HumanOutput::new("No changes were made."),
            OutcomePayload::bare("unchanged", id),
        ),
        UpdateOutcome::NotFound => (
            HumanOutput::new(format!("Task {id} not found.")),
            OutcomePayload::bare("not_found", id),
        ),
    };

    emit_success(options, "update", &payload, Some(&human))
}

pub fn done(service: &mut TaskService, id: u64, options: OutputOptions) -> Result<()> {
    let (human, payload) = match service.complete(id)? {
        TransitionOutcome::Applied(record) => (
            HumanOutput::new(format!("Task {id} marked as completed.")),
            OutcomePayload::with_task("completed", id, record),
        ),
        TransitionOutcome::Noop(_) => (
            HumanOutput::new(format!("Task {id} is already completed.")),
            OutcomePayload::bare("already_completed", id),
        ),
        TransitionOutcome::NotFound => (
            HumanOutput::new(format!("Task {id} not found.")),
            OutcomePayload::bare("not_found", id),
        ),
    };

    emit_success(options, "done", &payload, Some(&human))
}

pub fn reopen(service: &mut TaskService, id: u64, options: OutputOptions) -> Result<()> {
    let (human, payload) = match service.reopen(id)? {
        TransitionOutcome::Applied(record) => (
            HumanOutput::new(format!("Task {id} reopened successfully.")),
            OutcomePayload::with_task("reopened", id, record),
        ),
        TransitionOutcome::Noop(_) => (
            HumanOutput::new(format!("Task {id} is already pending.")),
            OutcomePayload::bare("already_pending", id),
        ),
        TransitionOutcome::NotFound => (
            HumanOutput::new(format!("Task {id} not found.")),
            OutcomePayload::bare("not_found", id),
        ),
    };

    emit_success(options, "reopen", &payload, Some(&human))
}

pub fn rm(service: &mut TaskService, id: u64, options: OutputOptions) -> Result<()> {
    let (human, payload) = match service.delete(id)? {
        DeleteOutcome::Deleted(record) => (
            HumanOutput::new(format!("Task {id} deleted successfully.")),
            OutcomePayload::with_task("deleted", id, record),
        ),
        DeleteOutcome::NotFound => (
            HumanOutput::new(format!("Task {id} not found.")),
            OutcomePayload::bare("not_found", id),
        ),
    };

    emit_success(options, "rm", &payload, Some(&human))
}

pub fn clear(service: &mut TaskService, options: OutputOptions) -> Result<()> {
    let cleared = service.clear_completed()?;

    #[derive(Serialize)]
    struct ClearPayload {
        cleared: usize,
    }

    let human = if cleared == 0 {
        HumanOutput::new("No completed tasks to clear.")
    } else {
        HumanOutput::new(format!("Cleared {cleared} completed task(s)."))
    };

    emit_success(options, "clear", &ClearPayload { cleared }, Some(&human))
}

pub fn stats(service: &TaskService, options: OutputOptions) -> Result<()> {
    let stats = service.stats();

    let mut human = if stats.total == 0 {
        HumanOutput::new("No tasks found.")
    } else {
        HumanOutput::new("Task statistics")
    };
    if stats.total > 0 {
        human.push_summary("total", stats.total.to_string());
        human.push_summary("pending", stats.pending.to_string());
        human.push_summary("completed", stats.completed.to_string());
        human.push_summary(
            "completion rate",
            format!("{:.1}%", stats.completion_rate),
        );
        if stats.pending > 0 {
            human.push_detail(format!(
                "Pending by priority: high {}, medium {}, low {}",
                stats.pending_high, stats.pending_medium, stats.pending_low
            ));
        }
    }

    emit_success(options, "stats", &stats, Some(&human))
}

pub fn health(service: &TaskService, options: OutputOptions) -> Result<()> {
    let report = service.health_check();

    let mut human = HumanOutput::new(format!("Status: {}", report.status.as_str()));
    human.push_summary("total tasks", report.total_tasks.to_string());
    human.push_summary("valid tasks", report.valid_tasks.to_string());
    human.push_summary("data file", report.data_file.clone());
    if let Some(issues) = &report.issues {
        human.push_detail(format!("Issues: {issues}"));
    }
    if let Some(error) = &report.error {
        human.push_detail(format!("Error: {error}"));
    }

    emit_success(options, "health", &report, Some(&human))
}
