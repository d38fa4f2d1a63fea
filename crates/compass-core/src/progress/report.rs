//! Per-milestone progress, upcoming work, risk assessment and the combined
//! progress report.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{
    Blocker, ProgressSnapshot, TimeHealth, calculate_progress, days_between, identify_blockers,
    percentage, round1,
};
use crate::models::{Goal, GoalSummary, Milestone, Priority, Status};

/// Default look-ahead for upcoming tasks.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Overall progress below which a goal close to its deadline is at risk.
const BEHIND_SCHEDULE_PROGRESS: f64 = 50.0;
/// Days remaining under which low progress counts as behind schedule.
const BEHIND_SCHEDULE_DAYS: i64 = 30;
/// Days remaining under which the deadline counts as imminent.
const DEADLINE_SOON_DAYS: i64 = 7;

/// Task completion within one milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub milestone_id: u64,
    pub title: String,
    pub status: Status,
    pub progress_percentage: f64,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub total_tasks: usize,
    pub target_date: Date,
    /// Target date passed while the milestone is still open
    pub is_overdue: bool,
}

/// Computes task completion for one milestone.
pub fn milestone_progress(milestone: &Milestone, today: Date) -> MilestoneProgress {
    let total_tasks = milestone.tasks.len();
    let completed_tasks = milestone
        .tasks
        .iter()
        .filter(|t| t.status.is_completed())
        .count();
    let in_progress_tasks = milestone
        .tasks
        .iter()
        .filter(|t| t.status == Status::InProgress)
        .count();

    MilestoneProgress {
        milestone_id: milestone.id,
        title: milestone.title.clone(),
        status: milestone.status,
        progress_percentage: round1(percentage(completed_tasks, total_tasks)),
        completed_tasks,
        in_progress_tasks,
        total_tasks,
        target_date: milestone.target_date,
        is_overdue: milestone.status.is_open() && milestone.target_date < today,
    }
}

/// An open task due soon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingTask {
    pub task_id: u64,
    pub milestone_id: u64,
    pub title: String,
    pub due_date: Date,
    pub priority: Priority,
    pub days_until_due: i64,
}

/// Open tasks due between `today` and `today + days_ahead`, soonest first.
pub fn upcoming_tasks(goal: &Goal, today: Date, days_ahead: i64) -> Vec<UpcomingTask> {
    let mut upcoming: Vec<UpcomingTask> = goal
        .tasks()
        .filter(|t| t.status.is_open())
        .filter_map(|t| {
            let days_until_due = days_between(today, t.due_date);
            (0..=days_ahead).contains(&days_until_due).then(|| UpcomingTask {
                task_id: t.id,
                milestone_id: t.milestone_id,
                title: t.title.clone(),
                due_date: t.due_date,
                priority: t.priority,
                days_until_due,
            })
        })
        .collect();

    upcoming.sort_by_key(|t| t.days_until_due);
    upcoming
}

/// Why a goal is considered at risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum RiskFactor {
    /// Under half done with less than a month left
    BehindSchedule,
    /// Deadline within a week
    DeadlineSoon { days_remaining: i64 },
    /// Deadline has passed
    Overdue { days_overdue: i64 },
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::BehindSchedule => write!(f, "Progress is behind schedule"),
            RiskFactor::DeadlineSoon { days_remaining: 0 } => write!(f, "Deadline is today"),
            RiskFactor::DeadlineSoon { days_remaining } => {
                write!(f, "Only {days_remaining} day(s) until the deadline")
            }
            RiskFactor::Overdue { days_overdue } => {
                write!(f, "Deadline passed {days_overdue} day(s) ago")
            }
        }
    }
}

/// A goal flagged by [`assess_risk`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskGoal {
    pub goal_id: u64,
    pub title: String,
    pub overall_progress: f64,
    pub days_remaining: Option<i64>,
    pub risk_factors: Vec<RiskFactor>,
    pub time_health: TimeHealth,
}

/// Flags a goal that is behind schedule, close to its deadline, or past
/// it. Returns `None` for goals without risk factors.
pub fn assess_risk(goal: &Goal, today: Date) -> Option<AtRiskGoal> {
    let snapshot = calculate_progress(goal, today);
    let days = snapshot.days_remaining?;

    let overall = (percentage(snapshot.completed_milestones, snapshot.total_milestones)
        + percentage(snapshot.completed_tasks, snapshot.total_tasks))
        / 2.0;

    let mut risk_factors = Vec::new();
    if overall < BEHIND_SCHEDULE_PROGRESS && days < BEHIND_SCHEDULE_DAYS {
        risk_factors.push(RiskFactor::BehindSchedule);
    }
    if days < 0 {
        risk_factors.push(RiskFactor::Overdue { days_overdue: -days });
    } else if days < DEADLINE_SOON_DAYS {
        risk_factors.push(RiskFactor::DeadlineSoon {
            days_remaining: days,
        });
    }

    if risk_factors.is_empty() {
        return None;
    }

    Some(AtRiskGoal {
        goal_id: goal.id,
        title: goal.title.clone(),
        overall_progress: snapshot.overall_progress,
        days_remaining: snapshot.days_remaining,
        risk_factors,
        time_health: snapshot.time_health,
    })
}

/// Everything known about a goal's progress at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub goal: GoalSummary,
    pub progress: ProgressSnapshot,
    pub milestones: Vec<MilestoneProgress>,
    pub blockers: Vec<Blocker>,
    pub upcoming_tasks: Vec<UpcomingTask>,
    pub generated_on: Date,
}

/// Builds the full report for a goal loaded with its children.
pub fn progress_report(goal: &Goal, today: Date) -> ProgressReport {
    ProgressReport {
        goal: GoalSummary::from(goal),
        progress: calculate_progress(goal, today),
        milestones: goal
            .milestones
            .iter()
            .map(|m| milestone_progress(m, today))
            .collect(),
        blockers: identify_blockers(goal, today),
        upcoming_tasks: upcoming_tasks(goal, today, UPCOMING_WINDOW_DAYS),
        generated_on: today,
    }
}

#[cfg(test)]
mod tests {
    use jiff::{ToSpan, civil::date};

    use super::*;
    use crate::progress::test_support::{goal, milestone, task};

    fn today() -> Date {
        date(2026, 10, 16)
    }

    fn plus(days: i64) -> Date {
        today().saturating_add(days.days())
    }

    #[test]
    fn test_milestone_progress_counts() {
        let m = milestone(
            1,
            plus(-1),
            Status::InProgress,
            vec![
                task(1, 1, plus(1), Status::Completed),
                task(2, 1, plus(2), Status::InProgress),
                task(3, 1, plus(3), Status::NotStarted),
                task(4, 1, plus(4), Status::Completed),
            ],
        );

        let progress = milestone_progress(&m, today());
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.completed_tasks, 2);
        assert_eq!(progress.in_progress_tasks, 1);
        assert_eq!(progress.progress_percentage, 50.0);
        assert!(progress.is_overdue);
    }

    #[test]
    fn test_completed_milestone_is_not_overdue() {
        let m = milestone(1, plus(-10), Status::Completed, vec![]);
        let progress = milestone_progress(&m, today());
        assert!(!progress.is_overdue);
        assert_eq!(progress.progress_percentage, 0.0);
    }

    #[test]
    fn test_upcoming_tasks_window_and_order() {
        let goal = goal(
            plus(-10),
            plus(60),
            vec![milestone(
                1,
                plus(20),
                Status::InProgress,
                vec![
                    task(1, 1, plus(7), Status::NotStarted),
                    task(2, 1, plus(8), Status::NotStarted),
                    task(3, 1, plus(-1), Status::NotStarted),
                    task(4, 1, today(), Status::InProgress),
                    task(5, 1, plus(2), Status::Completed),
                ],
            )],
        );

        let upcoming = upcoming_tasks(&goal, today(), UPCOMING_WINDOW_DAYS);
        let ids: Vec<(u64, i64)> = upcoming
            .iter()
            .map(|t| (t.task_id, t.days_until_due))
            .collect();
        assert_eq!(ids, vec![(4, 0), (1, 7)]);
    }

    #[test]
    fn test_risk_factors() {
        // Low progress, three weeks left
        let behind = goal(plus(-60), plus(21), vec![]);
        let risk = assess_risk(&behind, today()).unwrap();
        assert_eq!(risk.risk_factors, vec![RiskFactor::BehindSchedule]);

        // Low progress, deadline in 3 days
        let soon = goal(plus(-60), plus(3), vec![]);
        let risk = assess_risk(&soon, today()).unwrap();
        assert_eq!(
            risk.risk_factors,
            vec![
                RiskFactor::BehindSchedule,
                RiskFactor::DeadlineSoon { days_remaining: 3 }
            ]
        );

        // Past the deadline
        let late = goal(plus(-60), plus(-2), vec![]);
        let risk = assess_risk(&late, today()).unwrap();
        assert!(risk
            .risk_factors
            .contains(&RiskFactor::Overdue { days_overdue: 2 }));
        assert_eq!(risk.time_health, TimeHealth::Critical);
    }

    #[test]
    fn test_goal_with_time_left_is_not_at_risk() {
        let relaxed = goal(today(), plus(120), vec![]);
        assert!(assess_risk(&relaxed, today()).is_none());

        // Well ahead, even with the deadline three weeks away
        let ahead = goal(
            plus(-60),
            plus(21),
            vec![milestone(
                1,
                plus(5),
                Status::Completed,
                vec![task(1, 1, plus(1), Status::Completed)],
            )],
        );
        assert!(assess_risk(&ahead, today()).is_none());
    }

    #[test]
    fn test_risk_factor_display() {
        assert_eq!(
            RiskFactor::DeadlineSoon { days_remaining: 0 }.to_string(),
            "Deadline is today"
        );
        assert_eq!(
            RiskFactor::Overdue { days_overdue: 4 }.to_string(),
            "Deadline passed 4 day(s) ago"
        );
    }

    #[test]
    fn test_report_collects_all_sections() {
        let goal = goal(
            plus(-10),
            plus(30),
            vec![milestone(
                1,
                plus(-1),
                Status::InProgress,
                vec![
                    task(1, 1, plus(-3), Status::NotStarted),
                    task(2, 1, plus(3), Status::NotStarted),
                ],
            )],
        );

        let report = progress_report(&goal, today());
        assert_eq!(report.goal.total_tasks, 2);
        assert_eq!(report.milestones.len(), 1);
        assert_eq!(report.blockers.len(), 2);
        assert_eq!(report.upcoming_tasks.len(), 1);
        assert_eq!(report.generated_on, today());
        assert_eq!(report.progress.goal_id, 1);
    }
}
