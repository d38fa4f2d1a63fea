//! Request types for creating and updating models.

use std::collections::HashSet;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{GoalCategory, Priority, Status};
use crate::error::{PlannerError, Result};

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(PlannerError::invalid_input(field).with_reason("must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// Goal fields supplied at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGoal {
    pub memory_id: String,
    pub title: String,
    pub category: GoalCategory,
    pub deadline: Date,
    pub budget: Option<f64>,
    pub weekly_hours: Option<u32>,
    #[serde(default)]
    pub status: Status,
}

impl NewGoal {
    /// Checks the fields the database cannot check itself.
    pub fn validate(&self) -> Result<()> {
        require_text("memory_id", &self.memory_id)?;
        require_text("title", &self.title)?;
        require_non_negative("budget", self.budget)
    }
}

/// Milestone fields supplied at creation time, with its nested tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMilestone {
    pub title: String,
    pub target_date: Date,
    pub definition_of_done: String,
    /// Explicit order; the repository assigns the next free position when
    /// absent
    pub order: Option<u32>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub tasks: Vec<NewTask>,
}

impl NewMilestone {
    /// Validates the milestone and all of its tasks.
    pub fn validate(&self) -> Result<()> {
        require_text("milestone.title", &self.title)?;
        if self.order == Some(0) {
            return Err(
                PlannerError::invalid_input("milestone.order").with_reason("must be positive")
            );
        }
        self.tasks.iter().try_for_each(NewTask::validate)
    }
}

/// Task fields supplied at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Date,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    pub estimated_time: Option<f64>,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        require_text("task.title", &self.title)?;
        require_non_negative("task.estimated_time", self.estimated_time)
    }
}

/// A goal descriptor with its nested milestones and tasks, ready to be
/// written in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HierarchyPayload {
    pub goal: NewGoal,
    pub milestones: Vec<NewMilestone>,
}

impl HierarchyPayload {
    /// Total number of tasks across all milestones.
    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks.len()).sum()
    }

    /// Validates the whole hierarchy before anything is written.
    pub fn validate(&self) -> Result<()> {
        self.goal.validate()?;
        self.milestones.iter().try_for_each(NewMilestone::validate)?;

        let mut seen = HashSet::new();
        for order in self.milestones.iter().filter_map(|m| m.order) {
            if !seen.insert(order) {
                return Err(PlannerError::invalid_input("milestone.order")
                    .with_reason(format!("order {order} is used by more than one milestone")));
            }
        }
        Ok(())
    }

    /// Position of each milestone, in list order.
    ///
    /// Milestones without an explicit order continue after the highest
    /// position used so far, skipping positions other milestones claim.
    ///
    /// ```rust
    /// # use compass_core::models::{GoalCategory, HierarchyPayload, NewGoal, NewMilestone, Status};
    /// # use jiff::civil::date;
    /// # let milestone = |order| NewMilestone {
    /// #     title: "m".to_string(),
    /// #     target_date: date(2027, 1, 1),
    /// #     definition_of_done: "done".to_string(),
    /// #     order,
    /// #     status: Status::NotStarted,
    /// #     tasks: vec![],
    /// # };
    /// let payload = HierarchyPayload {
    ///     goal: NewGoal {
    ///         memory_id: "thread-1".to_string(),
    ///         title: "Move abroad".to_string(),
    ///         category: GoalCategory::Visa,
    ///         deadline: date(2027, 6, 1),
    ///         budget: None,
    ///         weekly_hours: None,
    ///         status: Status::NotStarted,
    ///     },
    ///     milestones: vec![milestone(None), milestone(Some(1)), milestone(None)],
    /// };
    /// assert_eq!(payload.milestone_orders().unwrap(), vec![2, 1, 3]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` when no free position is left.
    pub fn milestone_orders(&self) -> Result<Vec<u32>> {
        let mut taken: HashSet<u32> = self.milestones.iter().filter_map(|m| m.order).collect();
        let mut next: u32 = 1;
        let mut orders = Vec::with_capacity(self.milestones.len());

        for milestone in &self.milestones {
            let order = match milestone.order {
                Some(order) => order,
                None => {
                    while taken.contains(&next) {
                        next = next.checked_add(1).ok_or_else(|| {
                            PlannerError::invalid_input("milestone.order")
                                .with_reason("no free position left")
                        })?;
                    }
                    taken.insert(next);
                    next
                }
            };
            next = next.max(order.saturating_add(1));
            orders.push(order);
        }
        Ok(orders)
    }
}

/// Partial update of a goal. Only these fields are mutable after creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub category: Option<GoalCategory>,
    pub deadline: Option<Date>,
    pub budget: Option<f64>,
    pub weekly_hours: Option<u32>,
    pub status: Option<Status>,
}

impl UpdateGoalRequest {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.deadline.is_none()
            && self.budget.is_none()
            && self.weekly_hours.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        require_non_negative("budget", self.budget)
    }
}

/// Partial update of a milestone.
#[derive(Debug, Clone, Default)]
pub struct UpdateMilestoneRequest {
    pub title: Option<String>,
    pub target_date: Option<Date>,
    pub definition_of_done: Option<String>,
    pub status: Option<Status>,
}

impl UpdateMilestoneRequest {
    /// Shorthand for a status-only update.
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        Ok(())
    }
}

/// Partial update of a task.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub due_date: Option<Date>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub estimated_time: Option<f64>,
    /// Move the task to another milestone of the same goal
    pub milestone_id: Option<u64>,
}

impl UpdateTaskRequest {
    /// Shorthand for a status-only update.
    ///
    /// ```rust
    /// use compass_core::models::{Status, UpdateTaskRequest};
    ///
    /// let request = UpdateTaskRequest::status(Status::Completed);
    /// assert_eq!(request.status, Some(Status::Completed));
    /// assert!(request.title.is_none());
    /// ```
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        require_non_negative("estimated_time", self.estimated_time)
    }
}
