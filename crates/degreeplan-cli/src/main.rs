//! degreeplan CLI
//!
//! Command-line front end for the semester planner. Board changes are made
//! through a plan session and saved through its write queue before exit.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use degreeplan_core::PlannerBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        user,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("degreeplan started for user '{user}'");

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color), user);

    match command {
        Some(Semester { command }) => cli.handle_semester_command(command).await,
        Some(Course { command }) => cli.handle_course_command(command).await,
        Some(Catalog { command }) => cli.handle_catalog_command(command).await,
        Some(Prereqs(args)) => cli.show_prereqs(args).await,
        Some(Export(args)) => cli.export(args).await,
        Some(Import(args)) => cli.import(args).await,
        None => cli.show_board().await,
    }
}
