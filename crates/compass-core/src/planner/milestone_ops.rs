//! Milestone operations for the Planner.

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{Milestone, NewMilestone, Status, UpdateMilestoneRequest},
};

impl Planner {
    /// Appends a milestone, with its tasks, to an existing goal.
    pub async fn add_milestone(&self, goal_id: u64, milestone: NewMilestone) -> Result<Milestone> {
        self.with_database(move |db| db.add_milestone(goal_id, &milestone))
            .await
    }

    /// Retrieves a milestone with its tasks.
    pub async fn get_milestone(&self, id: u64) -> Result<Milestone> {
        self.with_database(move |db| db.get_milestone(id))
            .await?
            .ok_or(PlannerError::MilestoneNotFound { id })
    }

    /// Applies a partial update to a milestone.
    pub async fn update_milestone(
        &self,
        id: u64,
        request: UpdateMilestoneRequest,
    ) -> Result<Milestone> {
        self.with_database(move |db| db.update_milestone(id, &request))
            .await?
            .ok_or(PlannerError::MilestoneNotFound { id })
    }

    /// Sets a milestone's lifecycle status.
    pub async fn update_milestone_status(&self, id: u64, status: Status) -> Result<Milestone> {
        self.with_database(move |db| db.update_milestone_status(id, status))
            .await?
            .ok_or(PlannerError::MilestoneNotFound { id })
    }

    /// Renumbers a goal's milestones to follow `ordered_ids`.
    pub async fn reorder_milestones(
        &self,
        goal_id: u64,
        ordered_ids: Vec<u64>,
    ) -> Result<Vec<Milestone>> {
        self.with_database(move |db| db.reorder_milestones(goal_id, &ordered_ids))
            .await
    }
}
