//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own `Display` and prints a
//! fixed message when the collection is empty.

use std::fmt;

use jiff::civil::Date;

use super::models::DatedTask;
use crate::{
    models::{Dependency, GoalSummary, Task},
    progress::{AtRiskGoal, Blocker, days_between},
};

/// Newtype wrapper for displaying collections of goal summaries.
///
/// # Examples
///
/// ```rust
/// use compass_core::{
///     display::GoalSummaries,
///     models::{GoalCategory, GoalSummary, Status},
/// };
/// use jiff::civil::date;
///
/// let summary = GoalSummary {
///     id: 1,
///     title: "Get a driving licence".to_string(),
///     category: GoalCategory::Other,
///     status: Status::InProgress,
///     deadline: date(2027, 2, 1),
///     total_milestones: 2,
///     completed_milestones: 1,
///     total_tasks: 6,
///     completed_tasks: 4,
/// };
///
/// let output = GoalSummaries(vec![summary]).to_string();
/// assert!(output.contains("Get a driving licence (ID: 1)"));
/// assert!(output.contains("4/6 completed"));
/// ```
pub struct GoalSummaries(pub Vec<GoalSummary>);

impl GoalSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GoalSummary> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a GoalSummaries {
    type Item = &'a GoalSummary;
    type IntoIter = std::slice::Iter<'a, GoalSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for GoalSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals found.");
        }
        for goal in &self.0 {
            write!(f, "{goal}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a flat list of tasks.
pub struct Tasks(pub Vec<Task>);

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// Tasks across goals listed relative to `today`, as returned by the due
/// and overdue queries.
pub struct DueTasks {
    pub tasks: Vec<Task>,
    pub today: Date,
}

impl fmt::Display for DueTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tasks.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.tasks {
            write!(
                f,
                "{}",
                DatedTask {
                    task,
                    days_until_due: days_between(self.today, task.due_date),
                }
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying blockers, most severe first.
pub struct Blockers(pub Vec<Blocker>);

impl fmt::Display for Blockers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No blockers found.");
        }
        for blocker in &self.0 {
            write!(f, "{blocker}")?;
        }
        Ok(())
    }
}

pub struct AtRiskGoals(pub Vec<AtRiskGoal>);

impl fmt::Display for AtRiskGoals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals are at risk.");
        }
        for goal in &self.0 {
            write!(f, "{goal}")?;
        }
        Ok(())
    }
}

pub struct Dependencies(pub Vec<Dependency>);

impl fmt::Display for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No dependencies found.");
        }
        for dependency in &self.0 {
            write!(f, "{dependency}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections() {
        assert_eq!(GoalSummaries(vec![]).to_string(), "No goals found.\n");
        assert_eq!(Tasks(vec![]).to_string(), "No tasks found.\n");
        assert_eq!(Blockers(vec![]).to_string(), "No blockers found.\n");
        assert_eq!(AtRiskGoals(vec![]).to_string(), "No goals are at risk.\n");
        assert_eq!(Dependencies(vec![]).to_string(), "No dependencies found.\n");
    }

    #[test]
    fn test_due_tasks_are_relative_to_today() {
        use jiff::{Timestamp, civil::date};

        use crate::models::{Priority, Status};

        let task = Task {
            id: 9,
            goal_id: 2,
            milestone_id: 4,
            title: "Pay the deposit".to_string(),
            due_date: date(2026, 10, 14),
            priority: Priority::Urgent,
            status: Status::NotStarted,
            estimated_time: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };
        let output = DueTasks {
            tasks: vec![task],
            today: date(2026, 10, 16),
        }
        .to_string();
        assert_eq!(
            output,
            "- **Pay the deposit** (ID: 9, goal 2) due 2026-10-14 (2 days ago), urgent priority\n"
        );
    }

    #[test]
    fn test_dependencies_display() {
        let output = Dependencies(vec![Dependency {
            id: 1,
            from_task_id: 5,
            to_task_id: 2,
        }])
        .to_string();
        assert_eq!(output, "- Task 5 depends on task 2\n");
    }
}
