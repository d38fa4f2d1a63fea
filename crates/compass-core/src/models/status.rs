//! Status, priority and category enumerations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by goals, milestones and tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Work has not begun
    #[default]
    NotStarted,

    /// Work is underway
    InProgress,

    /// Work is finished
    Completed,

    /// Work is on hold
    Paused,

    /// Work was abandoned
    Cancelled,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-started" | "notstarted" | "todo" => Ok(Status::NotStarted),
            "in-progress" | "inprogress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            "paused" => Ok(Status::Paused),
            "cancelled" | "canceled" => Ok(Status::Cancelled),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

impl Status {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
            Status::Paused => "paused",
            Status::Cancelled => "cancelled",
        }
    }

    /// True once the item has been completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }

    /// True while the item can still block progress (neither completed nor
    /// cancelled).
    pub fn is_open(&self) -> bool {
        !matches!(self, Status::Completed | Status::Cancelled)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use compass_core::models::Status;
    ///
    /// assert_eq!(Status::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(Status::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(Status::NotStarted.with_icon(), "○ Not Started");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            Status::NotStarted => "○ Not Started",
            Status::InProgress => "➤ In Progress",
            Status::Completed => "✓ Completed",
            Status::Paused => "‖ Paused",
            Status::Cancelled => "✗ Cancelled",
        }
    }
}

/// Task priority levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// High and urgent tasks count as high priority for blocker detection.
    pub fn is_high(&self) -> bool {
        *self >= Priority::High
    }
}

/// Closed set of goal categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Visa,
    Language,
    Fitness,
    Study,
    Career,
    Finance,
    Health,
    Travel,
    #[default]
    Other,
}

impl FromStr for GoalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Ok(GoalCategory::Visa),
            "language" => Ok(GoalCategory::Language),
            "fitness" => Ok(GoalCategory::Fitness),
            "study" => Ok(GoalCategory::Study),
            "career" => Ok(GoalCategory::Career),
            "finance" => Ok(GoalCategory::Finance),
            "health" => Ok(GoalCategory::Health),
            "travel" => Ok(GoalCategory::Travel),
            "other" => Ok(GoalCategory::Other),
            _ => Err(format!("Invalid goal category: {s}")),
        }
    }
}

impl GoalCategory {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::Visa => "visa",
            GoalCategory::Language => "language",
            GoalCategory::Fitness => "fitness",
            GoalCategory::Study => "study",
            GoalCategory::Career => "career",
            GoalCategory::Finance => "finance",
            GoalCategory::Health => "health",
            GoalCategory::Travel => "travel",
            GoalCategory::Other => "other",
        }
    }
}
