use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    CatalogCommands, CourseCommands, ExportArgs, ImportArgs, PrereqsArgs, SemesterCommands,
};

/// Semester-by-semester degree planner
///
/// Lay out courses across semesters, move them around, and keep the plan in
/// a local SQLite database. Run without a command to show the current plan.
#[derive(Parser)]
#[command(version, about, name = "dp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/degreeplan/degreeplan.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Whose plan to work on
    #[arg(long, global = true, env = "DEGREEPLAN_USER", default_value = "local")]
    pub user: String,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add, remove and list semesters
    #[command(alias = "s")]
    Semester {
        #[command(subcommand)]
        command: SemesterCommands,
    },
    /// Place, move and remove courses
    #[command(alias = "c")]
    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },
    /// Load and inspect the course catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Show what a course depends on and what depends on it
    Prereqs(PrereqsArgs),
    /// Write the plan as JSON or Markdown
    Export(ExportArgs),
    /// Read a plan exported as JSON
    Import(ImportArgs),
}
