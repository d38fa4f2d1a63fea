//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::{Goal, Milestone, Task},
    planner::{PlanSource, PlanningOutcome},
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use compass_core::{
///     display::CreateResult,
///     models::{Goal, GoalCategory, Status},
/// };
/// use jiff::{civil::date, Timestamp};
///
/// let goal = Goal {
///     id: 7,
///     memory_id: "thread-7".to_string(),
///     title: "Save an emergency fund".to_string(),
///     category: GoalCategory::Finance,
///     deadline: date(2027, 12, 31),
///     budget: None,
///     weekly_hours: None,
///     status: Status::NotStarted,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     milestones: vec![],
/// };
///
/// let output = CreateResult::new(goal).to_string();
/// assert!(output.starts_with("Created goal with ID: 7"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created goal with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Milestone> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created milestone with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of the changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UpdateResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated goal with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Milestone> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated milestone with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated task with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted goal '{}' (ID: {}) with {} milestone(s) and {} task(s)",
            self.resource.title,
            self.resource.id,
            self.resource.milestones.len(),
            self.resource.tasks().count()
        )
    }
}

impl fmt::Display for PlanningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.reply)?;
        writeln!(f)?;

        match self.source {
            PlanSource::Generated => writeln!(
                f,
                "*Plan generated in {} attempt(s).*",
                self.attempts
            )?,
            PlanSource::Default => writeln!(
                f,
                "*No usable plan after {} attempt(s); a starter plan was created instead.*",
                self.attempts
            )?,
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Adjustments:")?;
            for warning in &self.warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.goal)
    }
}
