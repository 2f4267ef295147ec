//! Command-line interface for td
//!
//! This module defines the CLI structure using clap derive macros; the
//! command handlers live in the `tasks` submodule.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::service::TaskService;

mod tasks;

/// td - persistent task lists
///
/// A small todo service backed by a crash-safe JSON file: add, list,
/// update, complete, and inspect tasks from the command line.
#[derive(Parser, Debug)]
#[command(name = "td")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task data file
    #[arg(long, global = true, env = "TD_FILE")]
    pub file: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true, env = "TD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of tasks the store will hold
    #[arg(long, global = true, env = "TD_MAX_TODOS")]
    pub max_tasks: Option<usize>,

    /// Maximum title length in characters
    #[arg(long, global = true, env = "TD_MAX_TITLE_LENGTH")]
    pub max_title_length: Option<usize>,

    /// Maximum description length in characters
    #[arg(long, global = true, env = "TD_MAX_DESCRIPTION_LENGTH")]
    pub max_description_length: Option<usize>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: low, medium, high (unknown values fall back to medium)
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },

    /// List tasks with optional filtering
    List {
        /// Filter by status: all, pending, completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Filter by priority: all, low, medium, high
        #[arg(long, default_value = "all")]
        priority: String,
    },

    /// Show details of one task
    Show {
        /// Task ID
        id: u64,
    },

    /// Update fields of an existing task
    Update {
        /// Task ID
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority: low, medium, high (strict)
        #[arg(long)]
        priority: Option<String>,
    },

    /// Mark a task as completed
    Done {
        /// Task ID
        id: u64,
    },

    /// Reopen a completed task
    Reopen {
        /// Task ID
        id: u64,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: u64,
    },

    /// Delete all completed tasks
    Clear,

    /// Show task statistics
    Stats,

    /// Check service health
    Health,
}

impl Commands {
    /// Command name as it appears in output envelopes
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Update { .. } => "update",
            Commands::Done { .. } => "done",
            Commands::Reopen { .. } => "reopen",
            Commands::Rm { .. } => "rm",
            Commands::Clear => "clear",
            Commands::Stats => "stats",
            Commands::Health => "health",
        }
    }
}

impl Cli {
    /// Resolve the effective configuration: defaults, then the optional
    /// config file, then explicit flag/env overrides
    pub fn resolve_config(&self) -> Config {
        let mut config = Config::load_or_default(self.config.as_deref());
        if let Some(file) = &self.file {
            config.file = file.clone();
        }
        if let Some(max_tasks) = self.max_tasks {
            config.max_tasks = max_tasks;
        }
        if let Some(max_title_length) = self.max_title_length {
            config.max_title_length = max_title_length;
        }
        if let Some(max_description_length) = self.max_description_length {
            config.max_description_length = max_description_length;
        }
        config
    }

    pub fn run(self) -> Result<()> {
        let config = self.resolve_config();
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let mut service = TaskService::open(&config)?;

        match self.command {
            Commands::Add {
                title,
                description,
                priority,
            } => tasks::add(&mut service, &title, &description, &priority, options),
            Commands::List { status, priority } => {
                tasks::list(&service, &status, &priority, options)
            }
            Commands::Show { id } => tasks::show(&service, id, options),
            Commands::Update {
                id,
                title,
                description,
                priority,
            } => tasks::update(&mut service, id, title, description, priority, options),
            Commands::Done { id } => tasks::done(&mut service, id, options),
            Commands::Reopen { id } => tasks::reopen(&mut service, id, options),
            Commands::Rm { id } => tasks::rm(&mut service, id, options),
            Commands::Clear => tasks::clear(&mut service, options),
            Commands::Stats => tasks::stats(&service, options),
            Commands::Health => tasks::health(&service, options),
        }
    }
}
