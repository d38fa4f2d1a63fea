//! Detection of conditions that threaten on-time completion.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::days_between;
use crate::models::Goal;

/// How close to its due date a high-priority task becomes urgent.
pub const URGENT_WINDOW_DAYS: i64 = 2;

/// What kind of problem a blocker describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockerKind {
    OverdueTask,
    UrgentTask,
    OverdueMilestone,
}

impl BlockerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockerKind::OverdueTask => "overdue-task",
            BlockerKind::UrgentTask => "urgent-task",
            BlockerKind::OverdueMilestone => "overdue-milestone",
        }
    }
}

/// Blocker severity, most severe first when sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// A detected problem with a task or milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    pub kind: BlockerKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    /// Title of the affected task or milestone
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_due: Option<i64>,
    pub message: String,
}

/// Finds overdue tasks, urgent high-priority tasks and overdue milestones.
///
/// Only open items (neither completed nor cancelled) are considered. An
/// overdue task is never also reported as urgent. The result is ordered by
/// severity, critical first, keeping discovery order within a severity.
pub fn identify_blockers(goal: &Goal, today: Date) -> Vec<Blocker> {
    let mut blockers = Vec::new();

    for task in goal.tasks().filter(|t| t.status.is_open()) {
        let days_until_due = days_between(today, task.due_date);

        if days_until_due < 0 {
            let days_overdue = -days_until_due;
            blockers.push(Blocker {
                kind: BlockerKind::OverdueTask,
                severity: Severity::High,
                task_id: Some(task.id),
                milestone_id: Some(task.milestone_id),
                title: task.title.clone(),
                days_overdue: Some(days_overdue),
                days_until_due: None,
                message: format!("Task '{}' is {} overdue", task.title, plural_days(days_overdue)),
            });
        } else if task.priority.is_high() && days_until_due <= URGENT_WINDOW_DAYS {
            blockers.push(Blocker {
                kind: BlockerKind::UrgentTask,
                severity: Severity::Medium,
                task_id: Some(task.id),
                milestone_id: Some(task.milestone_id),
                title: task.title.clone(),
                days_overdue: None,
                days_until_due: Some(days_until_due),
                message: match days_until_due {
                    0 => format!("High-priority task '{}' is due today", task.title),
                    days => format!(
                        "High-priority task '{}' is due in {}",
                        task.title,
                        plural_days(days)
                    ),
                },
            });
        }
    }

    for milestone in goal.milestones.iter().filter(|m| m.status.is_open()) {
        let days_overdue = days_between(milestone.target_date, today);
        if days_overdue > 0 {
            blockers.push(Blocker {
                kind: BlockerKind::OverdueMilestone,
                severity: Severity::Critical,
                task_id: None,
                milestone_id: Some(milestone.id),
                title: milestone.title.clone(),
                days_overdue: Some(days_overdue),
                days_until_due: None,
                message: format!(
                    "Milestone '{}' is {} overdue",
                    milestone.title,
                    plural_days(days_overdue)
                ),
            });
        }
    }

    blockers.sort_by_key(|b| b.severity);
    blockers
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

#[cfg(test)]
mod tests {
    use jiff::{ToSpan, civil::date};

    use super::*;
    use crate::models::{Priority, Status};
    use crate::progress::test_support::{goal, milestone, task};

    fn today() -> Date {
        date(2026, 10, 16)
    }

    fn plus(days: i64) -> Date {
        today().saturating_add(days.days())
    }

    #[test]
    fn test_single_overdue_task() {
        let goal = goal(
            plus(-30),
            plus(30),
            vec![milestone(
                1,
                plus(10),
                Status::InProgress,
                vec![task(7, 1, plus(-5), Status::InProgress)],
            )],
        );

        let blockers = identify_blockers(&goal, today());
        assert_eq!(blockers.len(), 1);
        let blocker = &blockers[0];
        assert_eq!(blocker.kind, BlockerKind::OverdueTask);
        assert_eq!(blocker.severity, Severity::High);
        assert_eq!(blocker.days_overdue, Some(5));
        assert_eq!(blocker.task_id, Some(7));
        assert_eq!(blocker.message, "Task 'Task 7' is 5 days overdue");
    }

    #[test]
    fn test_urgent_window_and_priority() {
        let mut urgent_today = task(1, 1, today(), Status::NotStarted);
        urgent_today.priority = Priority::High;
        let mut urgent_soon = task(2, 1, plus(2), Status::NotStarted);
        urgent_soon.priority = Priority::Urgent;
        let mut too_far = task(3, 1, plus(3), Status::NotStarted);
        too_far.priority = Priority::High;
        let not_high = task(4, 1, plus(1), Status::NotStarted);

        let goal = goal(
            plus(-30),
            plus(30),
            vec![milestone(
                1,
                plus(10),
                Status::NotStarted,
                vec![urgent_today, urgent_soon, too_far, not_high],
            )],
        );

        let blockers = identify_blockers(&goal, today());
        let ids: Vec<Option<u64>> = blockers.iter().map(|b| b.task_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert!(blockers.iter().all(|b| b.kind == BlockerKind::UrgentTask));
        assert_eq!(blockers[0].days_until_due, Some(0));
        assert_eq!(blockers[1].days_until_due, Some(2));
    }

    #[test]
    fn test_overdue_high_priority_task_is_only_overdue() {
        let mut late = task(1, 1, plus(-1), Status::InProgress);
        late.priority = Priority::High;
        let goal = goal(
            plus(-30),
            plus(30),
            vec![milestone(1, plus(10), Status::InProgress, vec![late])],
        );

        let blockers = identify_blockers(&goal, today());
        assert_eq!(blockers.len(), 1);
        assert_eq!(blockers[0].kind, BlockerKind::OverdueTask);
        assert_eq!(blockers[0].message, "Task 'Task 1' is 1 day overdue");
    }

    #[test]
    fn test_closed_items_are_ignored() {
        let goal = goal(
            plus(-30),
            plus(30),
            vec![
                milestone(
                    1,
                    plus(-3),
                    Status::Completed,
                    vec![
                        task(1, 1, plus(-4), Status::Completed),
                        task(2, 1, plus(-4), Status::Cancelled),
                    ],
                ),
                milestone(2, plus(-3), Status::Cancelled, vec![]),
            ],
        );
        assert!(identify_blockers(&goal, today()).is_empty());
    }

    #[test]
    fn test_sorted_by_severity() {
        let mut urgent = task(1, 1, plus(1), Status::NotStarted);
        urgent.priority = Priority::High;
        let overdue = task(2, 1, plus(-2), Status::NotStarted);

        let goal = goal(
            plus(-30),
            plus(30),
            vec![milestone(1, plus(-1), Status::InProgress, vec![urgent, overdue])],
        );

        let kinds: Vec<BlockerKind> = identify_blockers(&goal, today())
            .iter()
            .map(|b| b.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                BlockerKind::OverdueMilestone,
                BlockerKind::OverdueTask,
                BlockerKind::UrgentTask
            ]
        );
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }
}
