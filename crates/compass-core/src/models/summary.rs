//! Goal summary types.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Goal, GoalCategory, Status};

/// Summary information about a goal with milestone and task statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalSummary {
    /// Goal ID
    pub id: u64,
    /// Title of the goal
    pub title: String,
    /// Goal category
    pub category: GoalCategory,
    /// Goal status
    pub status: Status,
    /// Goal deadline
    pub deadline: Date,
    /// Total number of milestones
    pub total_milestones: u32,
    /// Number of completed milestones
    pub completed_milestones: u32,
    /// Total number of tasks
    pub total_tasks: u32,
    /// Number of completed tasks
    pub completed_tasks: u32,
}

impl From<&Goal> for GoalSummary {
    fn from(goal: &Goal) -> Self {
        let total_milestones = goal.milestones.len() as u32;
        let completed_milestones = goal
            .milestones
            .iter()
            .filter(|m| m.status.is_completed())
            .count() as u32;
        let total_tasks = goal.tasks().count() as u32;
        let completed_tasks = goal.tasks().filter(|t| t.status.is_completed()).count() as u32;

        Self {
            id: goal.id,
            title: goal.title.clone(),
            category: goal.category,
            status: goal.status,
            deadline: goal.deadline,
            total_milestones,
            completed_milestones,
            total_tasks,
            completed_tasks,
        }
    }
}
