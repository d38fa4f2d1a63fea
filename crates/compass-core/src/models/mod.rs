//! Data models for goals, milestones and tasks.
//!
//! A [`Goal`] exclusively owns its [`Milestone`]s, and each milestone owns
//! its [`Task`]s. Children hold plain ID references back to their owners.
//! Display implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use compass_core::models::{Goal, GoalCategory, Status};
//! use jiff::{civil::date, Timestamp};
//!
//! let goal = Goal {
//!     id: 1,
//!     memory_id: "thread-42".to_string(),
//!     title: "Pass the B2 French exam".to_string(),
//!     category: GoalCategory::Language,
//!     deadline: date(2027, 6, 1),
//!     budget: Some(1200.0),
//!     weekly_hours: Some(6),
//!     status: Status::InProgress,
//!     created_at: Timestamp::now(),
//!     updated_at: Timestamp::now(),
//!     milestones: vec![],
//! };
//! assert_eq!(goal.tasks().count(), 0);
//! ```

pub mod dependency;
pub mod filters;
pub mod goal;
pub mod milestone;
pub mod requests;
pub mod status;
pub mod summary;
pub mod task;

#[cfg(test)]
mod tests;

pub use dependency::Dependency;
pub use filters::{GoalFilter, TaskFilter};
pub use goal::Goal;
pub use milestone::Milestone;
pub use requests::{
    HierarchyPayload, NewGoal, NewMilestone, NewTask, UpdateGoalRequest, UpdateMilestoneRequest,
    UpdateTaskRequest,
};
pub use status::{GoalCategory, Priority, Status};
pub use summary::GoalSummary;
pub use task::Task;
