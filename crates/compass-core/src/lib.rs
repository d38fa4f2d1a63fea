//! Core library for the Compass goal planner.
//!
//! Compass turns a long-term goal into a hierarchy of milestones and tasks,
//! stores it in SQLite and reports on progress toward the deadline.
//!
//! - [`pipeline`]: extract, normalize, repair and map plans produced by an
//!   external text generator.
//! - [`db`]: the SQLite repository for goals, milestones, tasks and
//!   dependencies.
//! - [`progress`]: pure progress, time-health, blocker and risk analysis.
//! - [`planner`]: the async [`Planner`] API tying the above together.
//! - [`display`]: markdown formatting for everything the planner returns.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compass_core::{
//!     models::GoalCategory,
//!     pipeline::{ConversationContext, GenerationError, GoalContext, TextGenerator},
//!     PlanGoal, PlannerBuilder,
//! };
//! use jiff::civil::date;
//!
//! struct Offline;
//!
//! #[async_trait::async_trait]
//! impl TextGenerator for Offline {
//!     async fn generate(
//!         &self,
//!         _context: &ConversationContext,
//!         _prompt: &str,
//!     ) -> Result<String, GenerationError> {
//!         Err(GenerationError::new("offline"))
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("compass.db"))
//!     .build()
//!     .await?;
//!
//! let outcome = planner
//!     .plan_goal(
//!         &Offline,
//!         PlanGoal {
//!             context: GoalContext {
//!                 memory_id: "thread-1".to_string(),
//!                 title: "Pass the driving test".to_string(),
//!                 category: GoalCategory::Other,
//!                 deadline: date(2027, 5, 1),
//!                 budget: None,
//!                 weekly_hours: Some(3),
//!             },
//!             user_notes: None,
//!         },
//!     )
//!     .await?;
//! println!("{outcome}");
//!
//! let report = planner.progress_report(outcome.goal.id).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod planner;
pub mod progress;

// Re-export commonly used types
pub use db::Database;
pub use error::{PlannerError, Result};
pub use models::{
    Dependency, Goal, GoalCategory, GoalFilter, GoalSummary, HierarchyPayload, Milestone,
    NewGoal, NewMilestone, NewTask, Priority, Status, Task, TaskFilter, UpdateGoalRequest,
    UpdateMilestoneRequest, UpdateTaskRequest,
};
pub use planner::{PlanGoal, PlanSource, Planner, PlannerBuilder, PlanningOutcome};
