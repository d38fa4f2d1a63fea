//! Turning an accepted plan (or nothing) into a persistable hierarchy.

use std::collections::HashSet;

use jiff::civil::Date;
use jiff::ToSpan;
use serde::{Deserialize, Serialize};

use super::normalize::{ExtractedPlan, MilestoneDescriptor, TaskDescriptor};
use crate::error::{PlannerError, Result};
use crate::models::{
    GoalCategory, HierarchyPayload, NewGoal, NewMilestone, NewTask, Priority, Status,
};

/// Date format expected from the generator.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Days before the deadline used when a generated date is unusable.
pub const DEFAULT_DEADLINE_OFFSET_DAYS: i64 = 7;
/// Horizon of the kickoff milestone in the default plan.
pub const DEFAULT_MILESTONE_HORIZON_DAYS: i64 = 14;

const DEFAULT_DEFINITION_OF_DONE: &str = "All tasks in this milestone are complete.";

/// What the caller knows about the goal before any planning happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalContext {
    /// External-memory correlation key
    pub memory_id: String,
    pub title: String,
    pub category: GoalCategory,
    pub deadline: Date,
    pub budget: Option<f64>,
    pub weekly_hours: Option<u32>,
}

impl GoalContext {
    /// Rejects a context that cannot identify or describe a goal.
    pub fn validate(&self) -> Result<()> {
        if self.memory_id.trim().is_empty() {
            return Err(PlannerError::invalid_input("memory_id").with_reason("must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(PlannerError::invalid_input("title").with_reason("must not be empty"));
        }
        if matches!(self.budget, Some(b) if !b.is_finite() || b < 0.0) {
            return Err(PlannerError::invalid_input("budget").with_reason("must be non-negative"));
        }
        Ok(())
    }

    fn new_goal(&self) -> NewGoal {
        NewGoal {
            memory_id: self.memory_id.trim().to_string(),
            title: self.title.trim().to_string(),
            category: self.category,
            deadline: self.deadline,
            budget: self.budget,
            weekly_hours: self.weekly_hours,
            status: Status::NotStarted,
        }
    }
}

/// A hierarchy ready for the repository, plus notes about any adjustments
/// made along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedPlan {
    pub payload: HierarchyPayload,
    pub warnings: Vec<String>,
}

/// Maps an accepted plan onto the goal described by `context`.
///
/// Dates that fail to parse or lie before `today` are replaced by the
/// fallback date (deadline minus seven days, but never before `today`).
pub fn map_plan(plan: &ExtractedPlan, context: &GoalContext, today: Date) -> MappedPlan {
    let mut mapper = Mapper {
        today,
        fallback: fallback_date(context.deadline, today),
        deadline: context.deadline,
        warnings: Vec::new(),
    };

    let orders = mapper.assign_orders(&plan.milestones);
    let mut milestones: Vec<NewMilestone> = plan
        .milestones
        .iter()
        .zip(orders)
        .map(|(descriptor, order)| mapper.milestone(descriptor, order))
        .collect();
    milestones.sort_by_key(|m| m.order);

    MappedPlan {
        payload: HierarchyPayload {
            goal: context.new_goal(),
            milestones,
        },
        warnings: mapper.warnings,
    }
}

/// The deterministic plan used when no generated plan was accepted.
///
/// ```rust
/// use compass_core::models::GoalCategory;
/// use compass_core::pipeline::{build_default_plan, GoalContext};
/// use jiff::civil::date;
///
/// let context = GoalContext {
///     memory_id: "thread-1".to_string(),
///     title: "Learn Spanish".to_string(),
///     category: GoalCategory::Language,
///     deadline: date(2027, 6, 1),
///     budget: None,
///     weekly_hours: None,
/// };
/// let payload = build_default_plan(&context, date(2026, 10, 16));
/// assert_eq!(payload.milestones[0].title, "Kickoff: Learn Spanish");
/// assert_eq!(payload.task_count(), 3);
/// ```
pub fn build_default_plan(context: &GoalContext, today: Date) -> HierarchyPayload {
    let due_in = |days: i64| clamp_to_today(context.deadline.min(add_days(today, days)), today);

    let starter = |title: &str, days: i64, priority: Priority, hours: f64| NewTask {
        title: title.to_string(),
        due_date: due_in(days),
        priority,
        status: Status::NotStarted,
        estimated_time: Some(hours),
    };

    HierarchyPayload {
        goal: context.new_goal(),
        milestones: vec![NewMilestone {
            title: format!("Kickoff: {}", context.title.trim()),
            target_date: due_in(DEFAULT_MILESTONE_HORIZON_DAYS),
            definition_of_done: "Initial plan, resources, and schedule are in place.".to_string(),
            order: Some(1),
            status: Status::NotStarted,
            tasks: vec![
                starter("Define milestones and success criteria", 3, Priority::High, 2.0),
                starter("Collect key resources and links", 5, Priority::Medium, 1.5),
                starter("Schedule the first work block", 7, Priority::Medium, 1.0),
            ],
        }],
    }
}

/// Deadline minus the default offset, never before `today`.
pub fn fallback_date(deadline: Date, today: Date) -> Date {
    clamp_to_today(add_days(deadline, -DEFAULT_DEADLINE_OFFSET_DAYS), today)
}

fn add_days(date: Date, days: i64) -> Date {
    date.saturating_add(days.days())
}

fn clamp_to_today(date: Date, today: Date) -> Date {
    date.max(today)
}

struct Mapper {
    today: Date,
    fallback: Date,
    deadline: Date,
    warnings: Vec<String>,
}

impl Mapper {
    /// Explicit orders in `1..=milestones.len()` win; anything else takes
    /// the list position. Duplicates force positional ordering for the
    /// whole plan so orders stay unique.
    fn assign_orders(&mut self, milestones: &[MilestoneDescriptor]) -> Vec<u32> {
        let count = milestones.len() as i64;
        let requested: Vec<u32> = milestones
            .iter()
            .enumerate()
            .map(|(idx, m)| {
                m.order
                    .filter(|order| (1..=count).contains(order))
                    .and_then(|order| u32::try_from(order).ok())
                    .unwrap_or(idx as u32 + 1)
            })
            .collect();

        let mut seen = HashSet::new();
        if requested.iter().all(|order| seen.insert(*order)) {
            requested
        } else {
            self.warnings
                .push("Milestone orders were inconsistent; using list order instead".to_string());
            (1..=milestones.len() as u32).collect()
        }
    }

    fn milestone(&mut self, descriptor: &MilestoneDescriptor, order: u32) -> NewMilestone {
        let what = format!("Milestone '{}'", descriptor.title);
        let target_date = self.resolve_date(descriptor.target_date.as_deref(), &what);
        if target_date > self.deadline {
            self.warnings.push(format!(
                "{what}: target date {target_date} is after the goal deadline {}",
                self.deadline
            ));
        }

        NewMilestone {
            title: descriptor.title.clone(),
            target_date,
            definition_of_done: descriptor
                .definition_of_done
                .clone()
                .unwrap_or_else(|| DEFAULT_DEFINITION_OF_DONE.to_string()),
            order: Some(order),
            status: Status::NotStarted,
            tasks: descriptor.tasks.iter().map(|t| self.task(t)).collect(),
        }
    }

    fn task(&mut self, descriptor: &TaskDescriptor) -> NewTask {
        let what = format!("Task '{}'", descriptor.title);
        NewTask {
            title: descriptor.title.clone(),
            due_date: self.resolve_date(descriptor.due_date.as_deref(), &what),
            priority: descriptor.priority,
            status: Status::NotStarted,
            estimated_time: Some(descriptor.estimated_time),
        }
    }

    fn resolve_date(&mut self, raw: Option<&str>, what: &str) -> Date {
        let Some(raw) = raw else {
            self.warnings
                .push(format!("{what}: no date given; using {}", self.fallback));
            return self.fallback;
        };

        match Date::strptime(DATE_FORMAT, raw) {
            Ok(date) if date >= self.today => date,
            Ok(date) => {
                self.warnings.push(format!(
                    "{what}: date {date} is in the past; using {}",
                    self.fallback
                ));
                self.fallback
            }
            Err(_) => {
                self.warnings.push(format!(
                    "{what}: '{raw}' is not a YYYY-MM-DD date; using {}",
                    self.fallback
                ));
                self.fallback
            }
        }
    }
}
