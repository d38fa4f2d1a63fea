//! Command handlers.
//!
//! Each handler calls one planner operation and renders the result through
//! the markdown formatters in `compass_core::display`.

use anyhow::{Context, Result, bail};
use compass_core::{
    GoalFilter, Planner, Task, UpdateTaskRequest,
    display::{
        AtRiskGoals, Blockers, CreateResult, DeleteResult, Dependencies, DueTasks, GoalSummaries,
        OperationStatus, Tasks, UpdateResult,
    },
};
use jiff::Zoned;
use log::info;

use crate::{
    args::{GoalCommands, MilestoneCommands, PlanArgs, TaskCommands},
    generator::{CommandGenerator, OfflineGenerator},
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn plan(&self, args: PlanArgs) -> Result<()> {
        let (request, command) = args.into_request();
        let outcome = match command {
            Some(command) => {
                info!("Planning with generator command: {command}");
                self.planner
                    .plan_goal(&CommandGenerator::new(command), request)
                    .await
            }
            None => self.planner.plan_goal(&OfflineGenerator, request).await,
        }
        .context("Failed to plan goal")?;

        self.renderer.render(&outcome.to_string())
    }

    pub async fn list_goals(&self, filter: GoalFilter) -> Result<()> {
        let summaries = self
            .planner
            .list_goal_summaries(filter)
            .await
            .context("Failed to list goals")?;
        self.renderer.render(&GoalSummaries(summaries).to_string())
    }

    pub async fn handle_goal_command(&self, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::List(args) => self.list_goals(args.into()).await,
            GoalCommands::Show(args) => {
                let goal = self
                    .planner
                    .get_goal(args.goal_id)
                    .await
                    .context("Failed to get goal")?;
                self.renderer.render(&goal.to_string())
            }
            GoalCommands::Update(args) => {
                let id = args.id;
                let request = args.into();
                let goal = self
                    .planner
                    .update_goal(id, request)
                    .await
                    .context("Failed to update goal")?;
                self.renderer.render(&UpdateResult::new(goal).to_string())
            }
            GoalCommands::Status(args) => {
                let goal = self
                    .planner
                    .update_goal_status(args.id, args.status)
                    .await
                    .context("Failed to update goal status")?;
                let changes = vec![format!("Status: {}", args.status)];
                self.renderer
                    .render(&UpdateResult::with_changes(goal, changes).to_string())
            }
            GoalCommands::Delete(args) => {
                if !args.confirm {
                    bail!(
                        "Deleting goal {} removes all of its milestones and tasks. \
                         Re-run with --confirm to proceed.",
                        args.id
                    );
                }
                let goal = self
                    .planner
                    .delete_goal(args.id)
                    .await
                    .context("Failed to delete goal")?;
                self.renderer.render(&DeleteResult::new(goal).to_string())
            }
            GoalCommands::Deadlines(args) => {
                let goals = self
                    .planner
                    .upcoming_deadlines(args.days)
                    .await
                    .context("Failed to query deadlines")?;
                if goals.is_empty() {
                    return self.renderer.render(
                        &OperationStatus::success(format!(
                            "No deadlines in the next {} day(s)",
                            args.days
                        ))
                        .to_string(),
                    );
                }
                let markdown: String = goals.iter().map(ToString::to_string).collect();
                self.renderer.render(&markdown)
            }
        }
    }

    pub async fn handle_milestone_command(&self, command: MilestoneCommands) -> Result<()> {
        match command {
            MilestoneCommands::Add(args) => {
                let goal_id = args.goal_id;
                let milestone = self
                    .planner
                    .add_milestone(goal_id, args.into())
                    .await
                    .context("Failed to add milestone")?;
                self.renderer
                    .render(&CreateResult::new(milestone).to_string())
            }
            MilestoneCommands::Show(args) => {
                let milestone = self
                    .planner
                    .get_milestone(args.id)
                    .await
                    .context("Failed to get milestone")?;
                let progress = self
                    .planner
                    .milestone_progress(args.id)
                    .await
                    .context("Failed to calculate milestone progress")?;
                self.renderer.render(&format!("{milestone}\n{progress}"))
            }
            MilestoneCommands::Update(args) => {
                let id = args.id;
                let milestone = self
                    .planner
                    .update_milestone(id, args.into())
                    .await
                    .context("Failed to update milestone")?;
                self.renderer
                    .render(&UpdateResult::new(milestone).to_string())
            }
            MilestoneCommands::Status(args) => {
                let milestone = self
                    .planner
                    .update_milestone_status(args.id, args.status)
                    .await
                    .context("Failed to update milestone status")?;
                let changes = vec![format!("Status: {}", args.status)];
                self.renderer
                    .render(&UpdateResult::with_changes(milestone, changes).to_string())
            }
            MilestoneCommands::Reorder(args) => {
                let milestones = self
                    .planner
                    .reorder_milestones(args.goal_id, args.milestone_ids)
                    .await
                    .context("Failed to reorder milestones")?;
                let mut markdown = OperationStatus::success(format!(
                    "Reordered {} milestone(s) of goal {}",
                    milestones.len(),
                    args.goal_id
                ))
                .to_string();
                for milestone in &milestones {
                    markdown.push('\n');
                    markdown.push_str(&milestone.to_string());
                }
                self.renderer.render(&markdown)
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let (goal_id, milestone_id, task) = args.into_parts();
                let task = self
                    .planner
                    .add_task(goal_id, milestone_id, task)
                    .await
                    .context("Failed to add task")?;
                self.renderer.render(&CreateResult::new(task).to_string())
            }
            TaskCommands::Update(args) => {
                let id = args.id;
                let request: UpdateTaskRequest = args.into();
                let changes = describe_task_changes(&request);
                let task = self
                    .planner
                    .update_task(id, request)
                    .await
                    .context("Failed to update task")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, changes).to_string())
            }
            TaskCommands::List(args) => {
                let tasks = self
                    .planner
                    .list_tasks(args.into())
                    .await
                    .context("Failed to list tasks")?;
                self.renderer.render(&Tasks(tasks).to_string())
            }
            TaskCommands::Due(args) => {
                let tasks = self
                    .planner
                    .due_tasks(args.days)
                    .await
                    .context("Failed to query due tasks")?;
                self.render_dated(tasks)
            }
            TaskCommands::Overdue => {
                let tasks = self
                    .planner
                    .overdue_tasks()
                    .await
                    .context("Failed to query overdue tasks")?;
                self.render_dated(tasks)
            }
            TaskCommands::Depend(args) => {
                let dependency = self
                    .planner
                    .add_dependency(args.task_id, args.depends_on)
                    .await
                    .context("Failed to add dependency")?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Task {} now depends on task {}",
                        dependency.from_task_id, dependency.to_task_id
                    ))
                    .to_string(),
                )
            }
            TaskCommands::Dependencies(args) => {
                let dependencies = self
                    .planner
                    .list_dependencies(args.goal_id)
                    .await
                    .context("Failed to list dependencies")?;
                self.renderer
                    .render(&Dependencies(dependencies).to_string())
            }
        }
    }

    pub async fn progress(&self, goal_id: u64) -> Result<()> {
        let snapshot = self
            .planner
            .calculate_progress(goal_id)
            .await
            .context("Failed to calculate progress")?;
        self.renderer.render(&snapshot.to_string())
    }

    pub async fn blockers(&self, goal_id: u64) -> Result<()> {
        let blockers = self
            .planner
            .identify_blockers(goal_id)
            .await
            .context("Failed to identify blockers")?;
        self.renderer.render(&Blockers(blockers).to_string())
    }

    pub async fn report(&self, goal_id: u64) -> Result<()> {
        let report = self
            .planner
            .progress_report(goal_id)
            .await
            .context("Failed to build progress report")?;
        self.renderer.render(&report.to_string())
    }

    pub async fn at_risk(&self) -> Result<()> {
        let goals = self
            .planner
            .at_risk_goals()
            .await
            .context("Failed to assess goals")?;
        self.renderer.render(&AtRiskGoals(goals).to_string())
    }

    fn render_dated(&self, tasks: Vec<Task>) -> Result<()> {
        let today = Zoned::now().date();
        self.renderer.render(&DueTasks { tasks, today }.to_string())
    }
}

fn describe_task_changes(request: &UpdateTaskRequest) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(title) = &request.title {
        changes.push(format!("Title: {title}"));
    }
    if let Some(due) = request.due_date {
        changes.push(format!("Due: {due}"));
    }
    if let Some(priority) = request.priority {
        changes.push(format!("Priority: {priority}"));
    }
    if let Some(status) = request.status {
        changes.push(format!("Status: {status}"));
    }
    if let Some(hours) = request.estimated_time {
        changes.push(format!("Estimate: {hours}h"));
    }
    if let Some(milestone_id) = request.milestone_id {
        changes.push(format!("Milestone: {milestone_id}"));
    }
    changes
}
