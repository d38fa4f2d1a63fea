//! Goal operations for the Planner.

use super::{Planner, today};
use crate::{
    error::{PlannerError, Result},
    models::{Goal, GoalFilter, GoalSummary, HierarchyPayload, Status, UpdateGoalRequest},
};

impl Planner {
    /// Persists a goal with all of its milestones and tasks in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Conflict` if the correlation key is already
    /// used, or `PlannerError::InvalidInput` for an invalid payload.
    pub async fn create_goal(&self, payload: HierarchyPayload) -> Result<Goal> {
        self.with_database(move |db| db.create_goal(&payload)).await
    }

    /// Retrieves a goal with its milestones and tasks.
    pub async fn get_goal(&self, id: u64) -> Result<Goal> {
        self.with_database(move |db| db.get_goal(id, true))
            .await?
            .ok_or(PlannerError::GoalNotFound { id })
    }

    /// Looks a goal up by its external-memory correlation key.
    pub async fn find_goal_by_memory_id(&self, memory_id: &str) -> Result<Option<Goal>> {
        let memory_id = memory_id.to_string();
        self.with_database(move |db| db.get_goal_by_memory_id(&memory_id, true))
            .await
    }

    /// Whether a goal already uses the correlation key.
    pub async fn memory_id_in_use(&self, memory_id: &str) -> Result<bool> {
        let memory_id = memory_id.to_string();
        self.with_database(move |db| db.memory_id_exists(&memory_id))
            .await
    }

    /// Lists goals matching `filter`, earliest deadline first.
    pub async fn list_goals(&self, filter: GoalFilter) -> Result<Vec<Goal>> {
        self.with_database(move |db| db.list_goals(&filter)).await
    }

    /// Lists goals matching `filter` with milestone and task counts.
    pub async fn list_goal_summaries(&self, filter: GoalFilter) -> Result<Vec<GoalSummary>> {
        self.with_database(move |db| db.list_goal_summaries(&filter))
            .await
    }

    /// Applies a partial update to a goal.
    pub async fn update_goal(&self, id: u64, request: UpdateGoalRequest) -> Result<Goal> {
        self.with_database(move |db| db.update_goal(id, &request))
            .await?
            .ok_or(PlannerError::GoalNotFound { id })
    }

    /// Sets a goal's lifecycle status.
    pub async fn update_goal_status(&self, id: u64, status: Status) -> Result<Goal> {
        self.with_database(move |db| db.update_goal_status(id, status))
            .await?
            .ok_or(PlannerError::GoalNotFound { id })
    }

    /// Permanently deletes a goal together with its milestones, tasks and
    /// dependencies. Returns the goal as it was before deletion.
    pub async fn delete_goal(&self, id: u64) -> Result<Goal> {
        self.with_database(move |db| db.delete_goal(id))
            .await?
            .ok_or(PlannerError::GoalNotFound { id })
    }

    /// Open goals with a deadline in the next `window_days` days.
    pub async fn upcoming_deadlines(&self, window_days: i64) -> Result<Vec<Goal>> {
        let today = today();
        self.with_database(move |db| db.upcoming_deadlines(today, window_days))
            .await
    }
}
