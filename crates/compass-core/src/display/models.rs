//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it with rich terminal
//! formatting, or print it as-is.

use std::fmt;

use super::datetime::{LocalDateTime, RelativeDays};
use crate::models::{
    Dependency, Goal, GoalCategory, GoalSummary, Milestone, Priority, Status, Task,
};

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Category: {}", self.category)?;
        writeln!(f, "- Deadline: {}", self.deadline)?;
        if let Some(budget) = self.budget {
            writeln!(f, "- Budget: {budget:.2}")?;
        }
        if let Some(hours) = self.weekly_hours {
            writeln!(f, "- Weekly hours: {hours}")?;
        }
        writeln!(f, "- Memory ID: `{}`", self.memory_id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.milestones.is_empty() {
            writeln!(f, "\nNo milestones in this goal.")?;
        } else {
            writeln!(f, "\n## Milestones")?;
            writeln!(f)?;
            for milestone in &self.milestones {
                write!(f, "{milestone}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.order,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Target: {}", self.target_date)?;
        writeln!(f, "- Done when: {}", self.definition_of_done)?;
        writeln!(f)?;

        for task in &self.tasks {
            write!(f, "{task}")?;
        }
        if !self.tasks.is_empty() {
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.status.is_completed() { "x" } else { " " };
        write!(
            f,
            "- [{check}] **{}** (ID: {}) due {}, {} priority",
            self.title, self.id, self.due_date, self.priority
        )?;
        if let Some(hours) = self.estimated_time.filter(|h| *h > 0.0) {
            write!(f, ", ~{hours}h")?;
        }
        if !matches!(self.status, Status::NotStarted | Status::Completed) {
            write!(f, " *{}*", self.status)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for GoalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status.with_icon())?;
        writeln!(f, "- **Category**: {}", self.category)?;
        writeln!(f, "- **Deadline**: {}", self.deadline)?;
        writeln!(
            f,
            "- **Milestones**: {}/{} completed",
            self.completed_milestones, self.total_milestones
        )?;
        writeln!(
            f,
            "- **Tasks**: {}/{} completed",
            self.completed_tasks, self.total_tasks
        )?;
        writeln!(f)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Task {} depends on task {}",
            self.from_task_id, self.to_task_id
        )
    }
}

/// A task shown together with how far away its due date is.
pub struct DatedTask<'a> {
    pub task: &'a Task,
    pub days_until_due: i64,
}

impl fmt::Display for DatedTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** (ID: {}, goal {}) due {} ({}), {} priority",
            self.task.title,
            self.task.id,
            self.task.goal_id,
            self.task.due_date,
            RelativeDays(self.days_until_due),
            self.task.priority
        )
    }
}
