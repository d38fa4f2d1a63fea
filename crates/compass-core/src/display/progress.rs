//! Display implementations for progress, blockers and reports.

use std::fmt;

use super::datetime::RelativeDays;
use crate::progress::{
    AtRiskGoal, Blocker, MilestoneProgress, ProgressReport, ProgressSnapshot, TimeHealth,
    UpcomingTask,
};

impl fmt::Display for TimeHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Renders a text progress bar ten cells wide.
fn bar(percent: f64) -> String {
    let filled = ((percent / 10.0).round() as usize).min(10);
    format!("`{}{}`", "█".repeat(filled), "░".repeat(10 - filled))
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Progress: {}", self.goal_title)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Overall: {} {:.1}%",
            bar(self.overall_progress),
            self.overall_progress
        )?;
        writeln!(
            f,
            "- Milestones: {:.1}% ({}/{})",
            self.milestone_progress, self.completed_milestones, self.total_milestones
        )?;
        writeln!(
            f,
            "- Tasks: {:.1}% ({}/{})",
            self.task_progress, self.completed_tasks, self.total_tasks
        )?;
        match self.days_remaining {
            Some(days) if days < 0 => writeln!(f, "- Deadline: passed {} day(s) ago", -days)?,
            Some(days) => writeln!(f, "- Days remaining: {days}")?,
            None => writeln!(f, "- Days remaining: unknown")?,
        }
        writeln!(f, "- Time health: {}", self.time_health.with_icon())?;
        writeln!(
            f,
            "- On track: {}",
            if self.on_track { "yes" } else { "no" }
        )
    }
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** [{}] {}",
            self.severity.as_str(),
            self.kind.as_str(),
            self.message
        )
    }
}

impl fmt::Display for MilestoneProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}** {} {:.1}% ({}/{} tasks, {} in progress), target {}",
            self.title,
            bar(self.progress_percentage),
            self.progress_percentage,
            self.completed_tasks,
            self.total_tasks,
            self.in_progress_tasks,
            self.target_date
        )?;
        if self.is_overdue {
            write!(f, " *overdue*")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for UpcomingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** (ID: {}) due {} ({}), {} priority",
            self.title,
            self.task_id,
            self.due_date,
            RelativeDays(self.days_until_due),
            self.priority
        )
    }
}

impl fmt::Display for AtRiskGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.title, self.goal_id)?;
        writeln!(f)?;
        writeln!(f, "- Progress: {:.1}%", self.overall_progress)?;
        if let Some(days) = self.days_remaining {
            writeln!(f, "- Days remaining: {days}")?;
        }
        writeln!(f, "- Time health: {}", self.time_health.with_icon())?;
        for factor in &self.risk_factors {
            writeln!(f, "- ⚠ {factor}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.progress)?;
        writeln!(f, "- Generated: {}", self.generated_on)?;

        writeln!(f, "\n## Milestones")?;
        writeln!(f)?;
        if self.milestones.is_empty() {
            writeln!(f, "No milestones.")?;
        }
        for milestone in &self.milestones {
            write!(f, "{milestone}")?;
        }

        writeln!(f, "\n## Blockers")?;
        writeln!(f)?;
        if self.blockers.is_empty() {
            writeln!(f, "Nothing is blocking this goal.")?;
        }
        for blocker in &self.blockers {
            write!(f, "{blocker}")?;
        }

        writeln!(f, "\n## Coming up")?;
        writeln!(f)?;
        if self.upcoming_tasks.is_empty() {
            writeln!(f, "No open tasks due in the next week.")?;
        }
        for task in &self.upcoming_tasks {
            write!(f, "{task}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{BlockerKind, RiskFactor, Severity};

    fn snapshot() -> ProgressSnapshot {
        ProgressSnapshot {
            goal_id: 1,
            goal_title: "Move to Lisbon".to_string(),
            milestone_progress: 0.0,
            task_progress: 100.0,
            overall_progress: 50.0,
            completed_milestones: 0,
            total_milestones: 1,
            completed_tasks: 2,
            total_tasks: 2,
            days_remaining: Some(30),
            time_health: TimeHealth::Healthy,
            on_track: true,
        }
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), "`░░░░░░░░░░`");
        assert_eq!(bar(50.0), "`█████░░░░░`");
        assert_eq!(bar(100.0), "`██████████`");
    }

    #[test]
    fn test_snapshot_display() {
        let output = snapshot().to_string();
        assert!(output.starts_with("# Progress: Move to Lisbon"));
        assert!(output.contains("- Tasks: 100.0% (2/2)"));
        assert!(output.contains("- Days remaining: 30"));
        assert!(output.contains("✓ Healthy"));

        let mut late = snapshot();
        late.days_remaining = Some(-3);
        assert!(late.to_string().contains("passed 3 day(s) ago"));
    }

    #[test]
    fn test_blocker_display() {
        let blocker = Blocker {
            kind: BlockerKind::OverdueTask,
            severity: Severity::High,
            task_id: Some(4),
            milestone_id: Some(1),
            title: "Renew passport".to_string(),
            days_overdue: Some(2),
            days_until_due: None,
            message: "Task 'Renew passport' is 2 days overdue".to_string(),
        };
        assert_eq!(
            blocker.to_string(),
            "- **high** [overdue-task] Task 'Renew passport' is 2 days overdue\n"
        );
    }

    #[test]
    fn test_at_risk_display_lists_factors() {
        let goal = AtRiskGoal {
            goal_id: 3,
            title: "Marathon".to_string(),
            overall_progress: 12.5,
            days_remaining: Some(5),
            risk_factors: vec![
                RiskFactor::BehindSchedule,
                RiskFactor::DeadlineSoon { days_remaining: 5 },
            ],
            time_health: TimeHealth::Critical,
        };
        let output = goal.to_string();
        assert!(output.contains("## Marathon (ID: 3)"));
        assert!(output.contains("- ⚠ Progress is behind schedule"));
        assert!(output.contains("- ⚠ Only 5 day(s) until the deadline"));
    }
}
