//! High-level async API over the repository, progress engine and planning
//! pipeline.
//!
//! The [`Planner`] holds no open connection. Each operation opens the
//! database inside [`tokio::task::spawn_blocking`], does its work and drops
//! the connection, so a planner can be shared freely between tasks.
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  goal_ops,       │    │  progress_ops    │    │    Database     │
//! │  milestone_ops,  │───▶│  (pure engine    │───▶│   (via db/)     │
//! │  task_ops        │    │   over a goal)   │    │                 │
//! └──────────────────┘    └──────────────────┘    └─────────────────┘
//!          ▲
//!          │  planning: generator → repair → map → create_goal
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use compass_core::{
//!     models::{GoalFilter, Status},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/compass.db"))
//!     .build()
//!     .await?;
//!
//! for summary in planner.list_goal_summaries(GoalFilter::active()).await? {
//!     println!("{}: {}/{} tasks", summary.title, summary.completed_tasks, summary.total_tasks);
//! }
//!
//! let goal = planner.update_goal_status(1, Status::InProgress).await?;
//! let report = planner.progress_report(goal.id).await?;
//! println!("{} blocker(s)", report.blockers.len());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use jiff::{Zoned, civil::Date};
use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
};

pub mod builder;
pub mod goal_ops;
pub mod milestone_ops;
pub mod planning;
pub mod progress_ops;
pub mod task_ops;


pub use builder::PlannerBuilder;
pub use planning::{PlanGoal, PlanSource, PlanningOutcome};

/// Main entry point for goals, milestones, tasks and progress.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the SQLite database this planner opens.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Runs `op` against a freshly opened database on the blocking pool.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(PlannerError::join)?
    }
}

/// The local calendar date used for all date arithmetic.
pub(crate) fn today() -> Date {
    Zoned::now().date()
}
