//! Markdown formatting for models, progress results and operation outcomes.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]
//! and [`progress`]); newtype wrappers add context such as empty-list
//! messages or "Created goal with ID" headers. Every formatter produces
//! markdown, which the CLI renders in the terminal.
//!
//! ```rust
//! use compass_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Milestones reordered");
//! assert_eq!(status.to_string(), "✓ Milestones reordered\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod progress;
pub mod results;
pub mod status;

pub use collections::{AtRiskGoals, Blockers, Dependencies, DueTasks, GoalSummaries, Tasks};
pub use datetime::{LocalDateTime, RelativeDays};
pub use models::DatedTask;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
