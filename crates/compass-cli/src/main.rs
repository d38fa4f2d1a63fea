//! Compass CLI
//!
//! Command-line interface for planning long-term goals and tracking their
//! progress.

mod args;
mod cli;
mod generator;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use compass_core::{GoalFilter, PlannerBuilder};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("Compass started");

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    match command {
        Some(Plan(args)) => cli.plan(args).await,
        Some(Goal { command }) => cli.handle_goal_command(command).await,
        Some(Milestone { command }) => cli.handle_milestone_command(command).await,
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(Progress(args)) => cli.progress(args.goal_id).await,
        Some(Blockers(args)) => cli.blockers(args.goal_id).await,
        Some(Report(args)) => cli.report(args.goal_id).await,
        Some(AtRisk) => cli.at_risk().await,
        None => cli.list_goals(GoalFilter::active()).await,
    }
}
