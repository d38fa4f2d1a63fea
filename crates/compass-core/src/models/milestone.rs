//! Milestone model definition.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Status, Task};

/// An ordered checkpoint toward a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    /// Unique identifier for the milestone
    pub id: u64,

    /// ID of the owning goal
    pub goal_id: u64,

    /// Title of the milestone
    pub title: String,

    /// Date the milestone should be reached by
    pub target_date: Date,

    /// What has to be true for the milestone to count as done
    pub definition_of_done: String,

    /// 1-based position within the goal (unique per goal, monotonic)
    pub order: u32,

    /// Lifecycle status
    #[serde(default)]
    pub status: Status,

    /// Tasks of this milestone ordered by due date
    #[serde(default)]
    pub tasks: Vec<Task>,
}
