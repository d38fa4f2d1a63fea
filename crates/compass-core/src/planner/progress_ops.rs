//! Progress operations for the Planner.
//!
//! Each operation loads the goal with its children and hands it to the
//! pure functions in [`crate::progress`], evaluated against today's local
//! date.

use super::{Planner, today};
use crate::{
    error::{PlannerError, Result},
    models::GoalFilter,
    progress::{
        self, AtRiskGoal, Blocker, MilestoneProgress, ProgressReport, ProgressSnapshot,
        UpcomingTask,
    },
};

impl Planner {
    /// Completion percentages, days remaining and time-health for a goal.
    pub async fn calculate_progress(&self, goal_id: u64) -> Result<ProgressSnapshot> {
        let goal = self.get_goal(goal_id).await?;
        Ok(progress::calculate_progress(&goal, today()))
    }

    /// Overdue and urgent items of a goal, most severe first.
    pub async fn identify_blockers(&self, goal_id: u64) -> Result<Vec<Blocker>> {
        let goal = self.get_goal(goal_id).await?;
        Ok(progress::identify_blockers(&goal, today()))
    }

    pub async fn milestone_progress(&self, milestone_id: u64) -> Result<MilestoneProgress> {
        let milestone = self.get_milestone(milestone_id).await?;
        Ok(progress::milestone_progress(&milestone, today()))
    }

    /// Open tasks of a goal due within `days_ahead` days.
    pub async fn upcoming_tasks(
        &self,
        goal_id: u64,
        days_ahead: i64,
    ) -> Result<Vec<UpcomingTask>> {
        if days_ahead < 0 {
            return Err(
                PlannerError::invalid_input("days_ahead").with_reason("must not be negative")
            );
        }
        let goal = self.get_goal(goal_id).await?;
        Ok(progress::upcoming_tasks(&goal, today(), days_ahead))
    }

    /// Not-started and in-progress goals that are behind schedule, close
    /// to their deadline, or past it.
    pub async fn at_risk_goals(&self) -> Result<Vec<AtRiskGoal>> {
        let goals = self.list_goals(GoalFilter::active().with_children()).await?;
        let today = today();
        let at_risk = goals
            .iter()
            .filter_map(|goal| progress::assess_risk(goal, today))
            .collect();
        Ok(at_risk)
    }

    pub async fn progress_report(&self, goal_id: u64) -> Result<ProgressReport> {
        let goal = self.get_goal(goal_id).await?;
        Ok(progress::progress_report(&goal, today()))
    }
}
