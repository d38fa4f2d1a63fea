//! Filter types for querying goals and tasks.

use jiff::civil::Date;

use super::{GoalCategory, Status};

/// Filter options for querying goals.
#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    /// Only goals with one of these statuses (all statuses when empty)
    pub statuses: Vec<Status>,

    /// Only goals of this category
    pub category: Option<GoalCategory>,

    /// Only goals whose deadline is on or before this date
    pub due_before: Option<Date>,

    /// Eagerly load milestones and tasks
    pub include_children: bool,
}

impl GoalFilter {
    /// Filter for goals in a single status.
    ///
    /// ```rust
    /// use compass_core::models::{GoalFilter, Status};
    ///
    /// let filter = GoalFilter::with_status(Status::InProgress);
    /// assert_eq!(filter.statuses, vec![Status::InProgress]);
    /// assert!(!filter.include_children);
    /// ```
    pub fn with_status(status: Status) -> Self {
        Self {
            statuses: vec![status],
            ..Default::default()
        }
    }

    /// Goals that are still being pursued (not started or in progress).
    pub fn active() -> Self {
        Self {
            statuses: vec![Status::NotStarted, Status::InProgress],
            ..Default::default()
        }
    }

    /// Request eager loading of milestones and tasks.
    pub fn with_children(mut self) -> Self {
        self.include_children = true;
        self
    }
}

/// Filter options for querying tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub goal_id: Option<u64>,
    pub milestone_id: Option<u64>,
    pub status: Option<Status>,
    /// Due on or before this date
    pub due_before: Option<Date>,
    /// Due on or after this date
    pub due_after: Option<Date>,
    /// Exclude completed tasks
    pub outstanding_only: bool,
}
