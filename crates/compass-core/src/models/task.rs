//! Task model definition.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use super::{Priority, Status};

/// The smallest actionable unit. Belongs to exactly one milestone and that
/// milestone's goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the owning goal
    pub goal_id: u64,

    /// ID of the owning milestone
    pub milestone_id: u64,

    /// Title of the task
    pub title: String,

    /// Date the task is due
    pub due_date: Date,

    /// Task priority
    #[serde(default)]
    pub priority: Priority,

    /// Lifecycle status
    #[serde(default)]
    pub status: Status,

    /// Estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,
}
