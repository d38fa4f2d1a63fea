#[cfg(test)]
mod model_tests {
    use jiff::{Timestamp, civil::date};

    use crate::models::{
        Goal, GoalCategory, GoalFilter, GoalSummary, Milestone, Priority, Status, Task,
    };

    fn create_test_task(id: u64, milestone_id: u64, status: Status) -> Task {
        Task {
            id,
            goal_id: 1,
            milestone_id,
            title: format!("Task {id}"),
            due_date: date(2027, 1, 10),
            priority: Priority::Medium,
            status,
            estimated_time: Some(1.5),
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            updated_at: Timestamp::from_second(1641081600).unwrap(), // 2022-01-02 00:00:00 UTC
        }
    }

    fn create_test_goal() -> Goal {
        Goal {
            id: 1,
            memory_id: "thread-1".to_string(),
            title: "Apply for a work visa".to_string(),
            category: GoalCategory::Visa,
            deadline: date(2027, 3, 1),
            budget: None,
            weekly_hours: Some(4),
            status: Status::InProgress,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(),
            milestones: vec![
                Milestone {
                    id: 10,
                    goal_id: 1,
                    title: "Collect documents".to_string(),
                    target_date: date(2027, 1, 15),
                    definition_of_done: "All documents scanned".to_string(),
                    order: 1,
                    status: Status::Completed,
                    tasks: vec![
                        create_test_task(100, 10, Status::Completed),
                        create_test_task(101, 10, Status::Completed),
                    ],
                },
                Milestone {
                    id: 11,
                    goal_id: 1,
                    title: "Submit application".to_string(),
                    target_date: date(2027, 2, 15),
                    definition_of_done: "Application submitted".to_string(),
                    order: 2,
                    status: Status::NotStarted,
                    tasks: vec![create_test_task(102, 11, Status::InProgress)],
                },
            ],
        }
    }

    #[test]
    fn test_status_parsing_accepts_common_spellings() {
        assert_eq!("not-started".parse::<Status>(), Ok(Status::NotStarted));
        assert_eq!("in_progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("In-Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("COMPLETED".parse::<Status>(), Ok(Status::Completed));
        assert_eq!("canceled".parse::<Status>(), Ok(Status::Cancelled));
        assert!("finished-ish".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for status in [
            Status::NotStarted,
            Status::InProgress,
            Status::Completed,
            Status::Paused,
            Status::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Status::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let parsed: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn test_open_statuses() {
        assert!(Status::NotStarted.is_open());
        assert!(Status::Paused.is_open());
        assert!(!Status::Completed.is_open());
        assert!(!Status::Cancelled.is_open());
    }

    #[test]
    fn test_priority_ordering_and_high_check() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Urgent.is_high());
        assert!(Priority::High.is_high());
        assert!(!Priority::Medium.is_high());
        assert_eq!("URGENT".parse::<Priority>(), Ok(Priority::Urgent));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Language".parse::<GoalCategory>(), Ok(GoalCategory::Language));
        assert_eq!(GoalCategory::Finance.as_str(), "finance");
        assert!("astronomy".parse::<GoalCategory>().is_err());
    }

    #[test]
    fn test_goal_tasks_flatten_in_milestone_order() {
        let goal = create_test_goal();
        let ids: Vec<u64> = goal.tasks().map(|t| t.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
        assert_eq!(goal.milestone(11).map(|m| m.order), Some(2));
        assert!(goal.milestone(99).is_none());
    }

    #[test]
    fn test_goal_summary_counts() {
        let goal = create_test_goal();
        let summary = GoalSummary::from(&goal);

        assert_eq!(summary.total_milestones, 2);
        assert_eq!(summary.completed_milestones, 1);
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.completed_tasks, 2);
        assert_eq!(summary.category, GoalCategory::Visa);
    }

    #[test]
    fn test_goal_serializes_dates_as_iso() {
        let goal = create_test_goal();
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["deadline"], "2027-03-01");
        assert_eq!(json["milestones"][0]["target_date"], "2027-01-15");
        assert_eq!(json["category"], "visa");
    }

    #[test]
    fn test_active_filter() {
        let filter = GoalFilter::active().with_children();
        assert_eq!(filter.statuses, vec![Status::NotStarted, Status::InProgress]);
        assert!(filter.include_children);
    }
}
