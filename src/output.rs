//! Shared output formatting for td CLI commands.

use serde::Serialize;

use crate::error::Result;
use crate::task::{Status, TaskRecord};

pub const SCHEMA_VERSION: &str = "td.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
            },
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    if !output.summary.is_empty() {
        lines.push(String::new());
        for (key, value) in &output.summary {
            if value.is_empty() {
                lines.push(format!("- {key}"));
            } else {
                lines.push(format!("- {key}: {value}"));
            }
        }
    }

    if !output.details.is_empty() {
        lines.push(String::new());
        for item in &output.details {
            lines.push(item.clone());
        }
    }

    lines.join("\n")
}

/// One listing line for a task: status and priority markers, id, title
pub fn task_line(record: &TaskRecord) -> String {
    let status_marker = match record.status {
        Status::Completed => "[x]",
        Status::Pending => "[ ]",
    };
    format!(
        "{status_marker} ({}) #{} {}",
        record.priority, record.id, record.title
    )
}

/// Multi-line detail block for a single task
pub fn task_block(record: &TaskRecord) -> Vec<String> {
    let mut lines = vec![task_line(record)];
    if !record.description.is_empty() {
        lines.push(format!("    Description: {}", record.description));
    }
    lines.push(format!(
        "    Status: {} | Priority: {}",
        record.status, record.priority
    ));
    lines.push(format!(
        "    Created: {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!(
        "    Updated: {}",
        record.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(completed_at) = record.completed_at {
        lines.push(format!(
            "    Completed: {}",
            completed_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    lines
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "policy_blocked",
        _ => "operation_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    #[test]
    fn task_line_shows_status_and_priority() {
        let mut record =
            TaskRecord::new(3, "Write docs".to_string(), String::new(), Priority::High);
        assert_eq!(task_line(&record), "[ ] (high) #3 Write docs");

        record.status = Status::Completed;
        assert!(task_line(&record).starts_with("[x]"));
    }

    #[test]
    fn task_block_includes_description_only_when_present() {
        let record = TaskRecord::new(1, "t".to_string(), String::new(), Priority::Low);
        let block = task_block(&record);
        assert!(!block.iter().any(|line| line.contains("Description")));

        let record = TaskRecord::new(1, "t".to_string(), "why".to_string(), Priority::Low);
        let block = task_block(&record);
        assert!(block.iter().any(|line| line.contains("Description: why")));
    }

    #[test]
    fn format_human_renders_sections() {
        let mut output = HumanOutput::new("Added task");
        output.push_summary("id", "1");
        output.push_detail("extra line");

        let text = format_human(&output);
        assert!(text.starts_with("Added task"));
        assert!(text.contains("- id: 1"));
        assert!(text.contains("extra line"));
    }
}
