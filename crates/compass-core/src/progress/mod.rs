//! Progress, schedule health and blocker analysis for a loaded goal.
//!
//! Everything here is a pure function of a [`Goal`] (with children) and the
//! current date, so results are reproducible in tests. The planner supplies
//! today's date in the system time zone.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::Goal;

pub mod blockers;
pub mod report;

pub use blockers::{Blocker, BlockerKind, Severity, identify_blockers};
pub use report::{
    AtRiskGoal, MilestoneProgress, ProgressReport, RiskFactor, UpcomingTask, assess_risk,
    milestone_progress, progress_report, upcoming_tasks,
};

/// Plan length assumed when the goal's start date is unknown.
pub const FALLBACK_PLAN_SPAN_DAYS: i64 = 90;

/// Progress gap (percentage points) below which a goal is critical.
const CRITICAL_GAP: f64 = -20.0;
/// Progress gap below which a goal needs attention.
const WARNING_GAP: f64 = -10.0;
/// Tolerance of the on-track check.
const ON_TRACK_TOLERANCE: f64 = 10.0;
/// Task completion required to count as on track without a start date.
const ON_TRACK_FLOOR_WITHOUT_START: f64 = 30.0;

/// Whether progress keeps pace with the time elapsed toward the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHealth {
    Healthy,
    Warning,
    Critical,
    Unknown,
}

impl TimeHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHealth::Healthy => "healthy",
            TimeHealth::Warning => "warning",
            TimeHealth::Critical => "critical",
            TimeHealth::Unknown => "unknown",
        }
    }

    /// Get health with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            TimeHealth::Healthy => "✓ Healthy",
            TimeHealth::Warning => "! Warning",
            TimeHealth::Critical => "✗ Critical",
            TimeHealth::Unknown => "? Unknown",
        }
    }
}

/// Point-in-time progress of one goal.
///
/// Percentages are rounded to one decimal place; classifications are made
/// on the unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub goal_id: u64,
    pub goal_title: String,
    pub milestone_progress: f64,
    pub task_progress: f64,
    /// Mean of milestone and task progress
    pub overall_progress: f64,
    pub completed_milestones: usize,
    pub total_milestones: usize,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// Deadline minus today; negative once the deadline has passed
    pub days_remaining: Option<i64>,
    pub time_health: TimeHealth,
    pub on_track: bool,
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: Date, to: Date) -> i64 {
    i64::from((to - from).get_days())
}

/// `done / total` as a percentage, `0.0` for an empty set.
pub fn percentage(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

/// Rounds to one decimal place for presentation.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Progress expected after `total_days - days_remaining` of `total_days`.
pub fn expected_progress(days_remaining: i64, total_days: i64) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    (total_days - days_remaining) as f64 / total_days as f64 * 100.0
}

/// Classifies schedule health from overall progress.
///
/// `total_days` is the span from goal creation to deadline, or `None` when
/// the creation date is unknown.
///
/// ```rust
/// use compass_core::progress::{time_health, TimeHealth};
///
/// // Halfway through a 100-day goal
/// assert_eq!(time_health(0.0, Some(50), Some(100)), TimeHealth::Critical);
/// assert_eq!(time_health(45.0, Some(50), Some(100)), TimeHealth::Healthy);
/// assert_eq!(time_health(10.0, Some(-1), Some(100)), TimeHealth::Critical);
/// assert_eq!(time_health(10.0, None, None), TimeHealth::Unknown);
/// ```
pub fn time_health(
    overall: f64,
    days_remaining: Option<i64>,
    total_days: Option<i64>,
) -> TimeHealth {
    let Some(days_remaining) = days_remaining else {
        return TimeHealth::Unknown;
    };
    if days_remaining < 0 {
        return TimeHealth::Critical;
    }

    let total_days = total_days.unwrap_or(FALLBACK_PLAN_SPAN_DAYS);
    let gap = overall - expected_progress(days_remaining, total_days);

    if gap < CRITICAL_GAP {
        TimeHealth::Critical
    } else if gap < WARNING_GAP {
        TimeHealth::Warning
    } else {
        TimeHealth::Healthy
    }
}

/// Whether task completion keeps up with elapsed time, within a 10-point
/// tolerance. Without a start date at least 30 % of tasks must be done.
pub fn is_on_track(
    task_progress: f64,
    total_tasks: usize,
    days_remaining: Option<i64>,
    total_days: Option<i64>,
) -> bool {
    match days_remaining {
        Some(days) if days >= 0 => {}
        _ => return false,
    }
    if total_tasks == 0 {
        return true;
    }

    match (days_remaining, total_days) {
        (Some(days), Some(total)) => {
            task_progress >= expected_progress(days, total) - ON_TRACK_TOLERANCE
        }
        _ => task_progress >= ON_TRACK_FLOOR_WITHOUT_START,
    }
}

/// Computes the progress snapshot of `goal` as of `today`.
///
/// A completed goal is reported as healthy and on track even after its
/// deadline.
pub fn calculate_progress(goal: &Goal, today: Date) -> ProgressSnapshot {
    let total_milestones = goal.milestones.len();
    let completed_milestones = goal
        .milestones
        .iter()
        .filter(|m| m.status.is_completed())
        .count();
    let total_tasks = goal.tasks().count();
    let completed_tasks = goal.tasks().filter(|t| t.status.is_completed()).count();

    let milestone_progress = percentage(completed_milestones, total_milestones);
    let task_progress = percentage(completed_tasks, total_tasks);
    let overall_progress = (milestone_progress + task_progress) / 2.0;

    let days_remaining = Some(days_between(today, goal.deadline));
    let total_days = Some(days_between(goal.created_on(), goal.deadline));

    let (time_health, on_track) = if goal.status.is_completed() {
        (TimeHealth::Healthy, true)
    } else {
        (
            time_health(overall_progress, days_remaining, total_days),
            is_on_track(task_progress, total_tasks, days_remaining, total_days),
        )
    };

    ProgressSnapshot {
        goal_id: goal.id,
        goal_title: goal.title.clone(),
        milestone_progress: round1(milestone_progress),
        task_progress: round1(task_progress),
        overall_progress: round1(overall_progress),
        completed_milestones,
        total_milestones,
        completed_tasks,
        total_tasks,
        days_remaining,
        time_health,
        on_track,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use jiff::{Timestamp, civil::Date, tz::TimeZone};

    use crate::models::{Goal, GoalCategory, Milestone, Priority, Status, Task};

    /// Noon on `date` in the system zone, so `Goal::created_on` maps back
    /// to `date`.
    pub fn noon(date: Date) -> Timestamp {
        date.at(12, 0, 0, 0)
            .to_zoned(TimeZone::system())
            .unwrap()
            .timestamp()
    }

    pub fn task(id: u64, milestone_id: u64, due: Date, status: Status) -> Task {
        Task {
            id,
            goal_id: 1,
            milestone_id,
            title: format!("Task {id}"),
            due_date: due,
            priority: Priority::Medium,
            status,
            estimated_time: None,
            created_at: noon(due),
            updated_at: noon(due),
        }
    }

    pub fn milestone(id: u64, target: Date, status: Status, tasks: Vec<Task>) -> Milestone {
        Milestone {
            id,
            goal_id: 1,
            title: format!("Milestone {id}"),
            target_date: target,
            definition_of_done: "done".to_string(),
            order: id as u32,
            status,
            tasks,
        }
    }

    pub fn goal(created: Date, deadline: Date, milestones: Vec<Milestone>) -> Goal {
        Goal {
            id: 1,
            memory_id: "thread-1".to_string(),
            title: "Learn Portuguese".to_string(),
            category: GoalCategory::Language,
            deadline,
            budget: None,
            weekly_hours: None,
            status: Status::InProgress,
            created_at: noon(created),
            updated_at: noon(created),
            milestones,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::{ToSpan, civil::date};

    use super::test_support::{goal, milestone, task};
    use super::*;
    use crate::models::Status;

    fn today() -> Date {
        date(2026, 10, 16)
    }

    fn plus(days: i64) -> Date {
        today().saturating_add(days.days())
    }

    #[test]
    fn test_mixed_completion_scenario() {
        let goal = goal(
            today(),
            plus(30),
            vec![milestone(
                1,
                plus(15),
                Status::InProgress,
                vec![
                    task(1, 1, plus(5), Status::Completed),
                    task(2, 1, plus(10), Status::Completed),
                ],
            )],
        );

        let snapshot = calculate_progress(&goal, today());
        assert_eq!(snapshot.milestone_progress, 0.0);
        assert_eq!(snapshot.task_progress, 100.0);
        assert_eq!(snapshot.overall_progress, 50.0);
        assert_eq!(snapshot.days_remaining, Some(30));
        assert_eq!(snapshot.completed_tasks, 2);
        assert_eq!(snapshot.total_milestones, 1);
    }

    #[test]
    fn test_time_health_at_halfway_point() {
        // Created 50 days ago with a 100-day horizon
        let created = today().saturating_sub(50.days());
        let deadline = created.saturating_add(100.days());
        let remaining = days_between(today(), deadline);
        let total = days_between(created, deadline);
        assert_eq!((remaining, total), (50, 100));

        assert_eq!(time_health(0.0, Some(remaining), Some(total)), TimeHealth::Critical);
        assert_eq!(time_health(45.0, Some(remaining), Some(total)), TimeHealth::Healthy);
        assert_eq!(time_health(35.0, Some(remaining), Some(total)), TimeHealth::Warning);
        assert_eq!(time_health(30.0, Some(remaining), Some(total)), TimeHealth::Warning);
        assert_eq!(time_health(29.9, Some(remaining), Some(total)), TimeHealth::Critical);
    }

    #[test]
    fn test_deadline_today_is_not_unknown() {
        assert_eq!(time_health(100.0, Some(0), Some(10)), TimeHealth::Healthy);
        assert_eq!(time_health(0.0, Some(0), Some(10)), TimeHealth::Critical);
    }

    #[test]
    fn test_time_health_without_start_uses_fallback_span() {
        // 45 of 90 days elapsed, expected 50 %
        assert_eq!(time_health(45.0, Some(45), None), TimeHealth::Healthy);
        assert_eq!(time_health(35.0, Some(45), None), TimeHealth::Warning);
    }

    #[test]
    fn test_zero_length_plan_expects_nothing() {
        assert_eq!(expected_progress(0, 0), 0.0);
        assert_eq!(time_health(0.0, Some(0), Some(0)), TimeHealth::Healthy);
    }

    #[test]
    fn test_on_track_rules() {
        assert!(!is_on_track(100.0, 4, Some(-1), Some(100)));
        assert!(!is_on_track(100.0, 4, None, Some(100)));
        assert!(is_on_track(0.0, 0, Some(10), Some(100)));
        // Expected 50 %, tolerance 10
        assert!(is_on_track(40.0, 4, Some(50), Some(100)));
        assert!(!is_on_track(39.0, 4, Some(50), Some(100)));
        // No start date: at least 30 % done
        assert!(is_on_track(30.0, 10, Some(50), None));
        assert!(!is_on_track(29.0, 10, Some(50), None));
    }

    #[test]
    fn test_overdue_goal_is_critical_unless_completed() {
        let mut goal = goal(
            today().saturating_sub(60.days()),
            today().saturating_sub(1.day()),
            vec![],
        );
        let snapshot = calculate_progress(&goal, today());
        assert_eq!(snapshot.days_remaining, Some(-1));
        assert_eq!(snapshot.time_health, TimeHealth::Critical);
        assert!(!snapshot.on_track);

        goal.status = Status::Completed;
        let snapshot = calculate_progress(&goal, today());
        assert_eq!(snapshot.time_health, TimeHealth::Healthy);
        assert!(snapshot.on_track);
    }

    #[test]
    fn test_percentages_are_rounded_for_presentation() {
        let goal = goal(
            today(),
            plus(30),
            vec![milestone(
                1,
                plus(15),
                Status::NotStarted,
                vec![
                    task(1, 1, plus(5), Status::Completed),
                    task(2, 1, plus(6), Status::NotStarted),
                    task(3, 1, plus(7), Status::NotStarted),
                ],
            )],
        );
        let snapshot = calculate_progress(&goal, today());
        assert_eq!(snapshot.task_progress, 33.3);
        assert_eq!(snapshot.overall_progress, 16.7);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(days_between(date(2026, 1, 1), date(2026, 3, 1)), 59);
        assert_eq!(days_between(date(2026, 3, 1), date(2026, 1, 1)), -59);
    }
}
