//! CLI module for workgate
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::schemas::{EntityId, EntityKind, Status};

/// Workgate - validate workflow transitions of projects, work items and tasks
#[derive(Parser, Debug)]
#[command(name = "workgate")]
#[command(version)]
#[command(about = "Validate workflow transitions of projects, work items and tasks")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .workgate/config.json in the working directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Check whether an entity from a fixture may move to a status
    Check {
        /// Fixture file with the records to validate against
        #[arg(long)]
        fixture: PathBuf,

        #[command(flatten)]
        entity: EntityArgs,

        /// Target status
        #[arg(long)]
        to: Status,

        /// Rework justification for backward transitions
        #[arg(long)]
        justification: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the statuses an entity kind may move to from a status
    Transitions {
        /// Entity kind (project, work_item, task)
        #[arg(long)]
        kind: EntityKind,

        /// Current status
        #[arg(long)]
        from: Status,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the next phase a work item may enter
    NextPhase {
        /// Fixture file with the records to validate against
        #[arg(long)]
        fixture: PathBuf,

        /// Work item ID
        #[arg(long)]
        work_item: EntityId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Exactly one entity to check
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct EntityArgs {
    /// Project ID
    #[arg(long)]
    pub project: Option<EntityId>,

    /// Work item ID
    #[arg(long)]
    pub work_item: Option<EntityId>,

    /// Task ID
    #[arg(long)]
    pub task: Option<EntityId>,
}

impl EntityArgs {
    /// The selected kind and ID
    pub fn selected(&self) -> Option<(EntityKind, EntityId)> {
        match (self.project, self.work_item, self.task) {
            (Some(id), None, None) => Some((EntityKind::Project, id)),
            (None, Some(id), None) => Some((EntityKind::WorkItem, id)),
            (None, None, Some(id)) => Some((EntityKind::Task, id)),
            _ => None,
        }
    }
}
