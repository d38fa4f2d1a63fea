//! Goal model definition and related functionality.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use super::{GoalCategory, Milestone, Status, Task};

/// A long-term objective with a deadline, owning its milestones and,
/// transitively, their tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Unique identifier for the goal
    pub id: u64,

    /// External-memory correlation key (unique across goals)
    pub memory_id: String,

    /// Title of the goal
    pub title: String,

    /// Goal category
    pub category: GoalCategory,

    /// Calendar date by which the goal should be reached
    pub deadline: Date,

    /// Optional monetary budget
    pub budget: Option<f64>,

    /// Optional weekly time budget in hours
    pub weekly_hours: Option<u32>,

    /// Lifecycle status
    #[serde(default)]
    pub status: Status,

    /// Timestamp when the goal was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the goal was last modified (UTC)
    pub updated_at: Timestamp,

    /// Milestones ordered by their `order` field (empty unless children were
    /// requested)
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Goal {
    /// Calendar date of creation in the system time zone.
    pub fn created_on(&self) -> Date {
        self.created_at.to_zoned(TimeZone::system()).date()
    }

    /// All tasks of the goal, in milestone order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.milestones.iter().flat_map(|m| m.tasks.iter())
    }

    /// Looks up a milestone by ID.
    pub fn milestone(&self, id: u64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }
}
