//! Instruction texts sent to the text generator.
//!
//! None of these strings are a wire protocol. They can be reworded freely;
//! only the shape of the JSON they ask for matters to the normalizer.

use jiff::civil::Date;

use super::mapper::GoalContext;

/// Milestone cap for the minimal-plan repair.
pub const MINIMAL_MILESTONES: usize = 3;
/// Per-milestone task caps for the minimal-plan repair.
pub const MINIMAL_TASKS_PER_MILESTONE: [usize; MINIMAL_MILESTONES] = [5, 5, 2];
/// Resource cap for the minimal-plan repair.
pub const MINIMAL_RESOURCES: usize = 3;

const PLAN_SHAPE: &str = r#"{
  "reply": "short encouraging summary of the plan for the user",
  "milestones": [
    {
      "title": "milestone title",
      "target_date": "YYYY-MM-DD",
      "definition_of_done": "how we know the milestone is reached",
      "order": 1,
      "tasks": [
        {
          "title": "task title",
          "due_date": "YYYY-MM-DD",
          "priority": "low | medium | high | urgent",
          "estimated_time": 1.5
        }
      ]
    }
  ],
  "insights": ["optional advice"],
  "resources": [{"title": "resource name", "url": "optional link"}]
}"#;

/// Builds the first planning request for a goal.
pub fn planning_prompt(context: &GoalContext, notes: Option<&str>, today: Date) -> String {
    let mut prompt = format!(
        "Create a step-by-step plan for this goal.\n\n\
         Goal: {title}\n\
         Category: {category}\n\
         Deadline: {deadline}\n\
         Today: {today}\n",
        title = context.title,
        category = context.category.as_str(),
        deadline = context.deadline,
    );

    if let Some(budget) = context.budget {
        prompt.push_str(&format!("Budget: {budget:.2}\n"));
    }
    if let Some(hours) = context.weekly_hours {
        prompt.push_str(&format!("Available hours per week: {hours}\n"));
    }
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        prompt.push_str(&format!("Notes from the user: {notes}\n"));
    }

    prompt.push_str(&format!(
        "\nAll dates must fall between {today} and {deadline}. \
         Answer with exactly one ```json fenced block of this shape:\n\n{PLAN_SHAPE}\n",
        deadline = context.deadline,
    ));
    prompt
}

/// First repair: same plan, but well-formed.
pub fn repair_format_prompt() -> String {
    format!(
        "Your previous answer could not be read as a plan. Reply again with exactly one \
         well-formed JSON object inside a ```json fenced block and nothing else. \
         Keep the required fields \"reply\" and \"milestones\", and give every task's \
         \"estimated_time\" as a plain number of hours (for example 1.5, not \"1.5 hours\").\n\n\
         Expected shape:\n\n{PLAN_SHAPE}\n"
    )
}

/// Second repair: a deliberately small plan that fits in one reply.
pub fn minimal_plan_prompt() -> String {
    let [first, second, third] = MINIMAL_TASKS_PER_MILESTONE;
    format!(
        "The plan is still not readable, probably because it was cut off. Produce a smaller \
         plan: at most {MINIMAL_MILESTONES} milestones, with at most {first}, {second} and \
         {third} tasks respectively, and at most {MINIMAL_RESOURCES} resources. \
         Keep every text field short. Reply with exactly one ```json fenced block containing \
         \"reply\" and \"milestones\", and numeric \"estimated_time\" hours.\n"
    )
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::GoalCategory;

    fn context() -> GoalContext {
        GoalContext {
            memory_id: "thread-1".to_string(),
            title: "Run a half marathon".to_string(),
            category: GoalCategory::Fitness,
            deadline: date(2027, 4, 30),
            budget: None,
            weekly_hours: Some(5),
        }
    }

    #[test]
    fn test_planning_prompt_mentions_goal_and_dates() {
        let prompt = planning_prompt(&context(), Some("  bad knee  "), date(2026, 10, 16));
        assert!(prompt.contains("Goal: Run a half marathon"));
        assert!(prompt.contains("Category: fitness"));
        assert!(prompt.contains("between 2026-10-16 and 2027-04-30"));
        assert!(prompt.contains("Available hours per week: 5"));
        assert!(prompt.contains("Notes from the user: bad knee\n"));
        assert!(!prompt.contains("Budget"));
    }

    #[test]
    fn test_blank_notes_are_omitted() {
        let prompt = planning_prompt(&context(), Some("   "), date(2026, 10, 16));
        assert!(!prompt.contains("Notes from the user"));
    }

    #[test]
    fn test_repair_prompts_restate_contract() {
        assert!(repair_format_prompt().contains("estimated_time"));

        let minimal = minimal_plan_prompt();
        assert!(minimal.contains("at most 3 milestones"));
        assert!(minimal.contains("at most 5, 5 and 2 tasks"));
        assert!(minimal.contains("at most 3 resources"));
    }
}
