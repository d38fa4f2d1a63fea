#![allow(dead_code)]

use compass_core::{
    GoalCategory, HierarchyPayload, NewGoal, NewMilestone, NewTask, Planner, PlannerBuilder,
    Priority, Status,
};
use jiff::{ToSpan, Zoned, civil::Date};
use tempfile::TempDir;

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

pub fn today() -> Date {
    Zoned::now().date()
}

pub fn in_days(days: i64) -> Date {
    today().saturating_add(days.days())
}

pub fn task(title: &str, due_date: Date) -> NewTask {
    NewTask {
        title: title.to_string(),
        due_date,
        priority: Priority::Medium,
        status: Status::NotStarted,
        estimated_time: None,
    }
}

pub fn milestone(title: &str, target_date: Date, tasks: Vec<NewTask>) -> NewMilestone {
    NewMilestone {
        title: title.to_string(),
        target_date,
        definition_of_done: format!("{title} finished"),
        order: None,
        status: Status::NotStarted,
        tasks,
    }
}

pub fn hierarchy(
    memory_id: &str,
    deadline: Date,
    milestones: Vec<NewMilestone>,
) -> HierarchyPayload {
    HierarchyPayload {
        goal: NewGoal {
            memory_id: memory_id.to_string(),
            title: format!("Goal for {memory_id}"),
            category: GoalCategory::Career,
            deadline,
            budget: Some(500.0),
            weekly_hours: Some(8),
            status: Status::NotStarted,
        },
        milestones,
    }
}
