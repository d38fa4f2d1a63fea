//! Command-line arguments.
//!
//! Argument structs carry the clap attributes and convert into the core
//! request types with `From`, so nothing in `compass-core` depends on clap.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use compass_core::{
    GoalCategory, GoalFilter, NewMilestone, NewTask, PlanGoal, Priority, Status, TaskFilter,
    UpdateGoalRequest, UpdateMilestoneRequest, UpdateTaskRequest, pipeline::GoalContext,
};
use jiff::civil::Date;

/// Plan long-term goals as milestones and tasks, and track progress toward
/// their deadlines.
#[derive(Parser)]
#[command(version, about, name = "compass")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/compass/compass.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan a new goal with a text generator
    Plan(PlanArgs),
    /// Manage goals
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Manage milestones within goals
    #[command(alias = "m")]
    Milestone {
        #[command(subcommand)]
        command: MilestoneCommands,
    },
    /// Manage tasks within milestones
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show progress and time-health of a goal
    Progress(GoalIdArgs),
    /// Show what is blocking a goal
    Blockers(GoalIdArgs),
    /// Show the full progress report of a goal
    Report(GoalIdArgs),
    /// List active goals that are behind schedule or close to their deadline
    AtRisk,
}

#[derive(ClapArgs)]
pub struct PlanArgs {
    /// What the goal is
    #[arg(long)]
    pub title: String,
    /// Goal category
    #[arg(long, default_value = "other")]
    pub category: GoalCategory,
    /// Deadline (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Date,
    /// External-memory correlation key, unique per goal
    #[arg(long)]
    pub memory_id: String,
    /// Total budget
    #[arg(long)]
    pub budget: Option<f64>,
    /// Hours per week available for the goal
    #[arg(long)]
    pub weekly_hours: Option<u32>,
    /// Extra context passed to the generator
    #[arg(long)]
    pub notes: Option<String>,
    /// Shell command that produces the plan. It runs through `sh -c`,
    /// receives the conversation so far on stdin and prints its reply
    #[arg(long, conflicts_with = "offline", required_unless_present = "offline")]
    pub generator: Option<String>,
    /// Skip generation and create the starter plan
    #[arg(long)]
    pub offline: bool,
}

impl PlanArgs {
    /// Splits the arguments into the planning request and the generator
    /// command (absent when offline).
    pub fn into_request(self) -> (PlanGoal, Option<String>) {
        let request = PlanGoal {
            context: GoalContext {
                memory_id: self.memory_id,
                title: self.title,
                category: self.category,
                deadline: self.deadline,
                budget: self.budget,
                weekly_hours: self.weekly_hours,
            },
            user_notes: self.notes,
        };
        let generator = if self.offline { None } else { self.generator };
        (request, generator)
    }
}

#[derive(ClapArgs)]
pub struct GoalIdArgs {
    /// ID of the goal
    pub goal_id: u64,
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List goals
    #[command(aliases = ["l", "ls"])]
    List(ListGoalsArgs),
    /// Show a goal with its milestones and tasks
    #[command(alias = "s")]
    Show(GoalIdArgs),
    /// Update goal fields
    #[command(alias = "u")]
    Update(UpdateGoalArgs),
    /// Set a goal's status
    Status(GoalStatusArgs),
    /// Delete a goal with everything in it
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteGoalArgs),
    /// Open goals with a deadline coming up
    Deadlines(WindowArgs),
}

#[derive(ClapArgs)]
pub struct ListGoalsArgs {
    /// Only goals with this status
    #[arg(long)]
    pub status: Option<Status>,
    /// Only goals in this category
    #[arg(long)]
    pub category: Option<GoalCategory>,
    /// Only goals due on or before this date
    #[arg(long)]
    pub due_before: Option<Date>,
}

impl From<ListGoalsArgs> for GoalFilter {
    fn from(val: ListGoalsArgs) -> Self {
        GoalFilter {
            statuses: val.status.into_iter().collect(),
            category: val.category,
            due_before: val.due_before,
            include_children: false,
        }
    }
}

#[derive(ClapArgs)]
pub struct UpdateGoalArgs {
    /// ID of the goal
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<GoalCategory>,
    #[arg(long)]
    pub deadline: Option<Date>,
    #[arg(long)]
    pub budget: Option<f64>,
    #[arg(long)]
    pub weekly_hours: Option<u32>,
}

impl From<UpdateGoalArgs> for UpdateGoalRequest {
    fn from(val: UpdateGoalArgs) -> Self {
        UpdateGoalRequest {
            title: val.title,
            category: val.category,
            deadline: val.deadline,
            budget: val.budget,
            weekly_hours: val.weekly_hours,
            status: None,
        }
    }
}

#[derive(ClapArgs)]
pub struct GoalStatusArgs {
    /// ID of the goal
    pub id: u64,
    /// New status (not-started, in-progress, completed, paused, cancelled)
    pub status: Status,
}

#[derive(ClapArgs)]
pub struct DeleteGoalArgs {
    /// ID of the goal
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(ClapArgs)]
pub struct WindowArgs {
    /// How many days ahead to look
    #[arg(long, default_value_t = 7)]
    pub days: i64,
}

#[derive(Subcommand)]
pub enum MilestoneCommands {
    /// Add a milestone to a goal
    #[command(alias = "a")]
    Add(AddMilestoneArgs),
    /// Show a milestone's task progress
    #[command(alias = "s")]
    Show(MilestoneIdArgs),
    /// Update milestone fields
    #[command(alias = "u")]
    Update(UpdateMilestoneArgs),
    /// Set a milestone's status
    Status(MilestoneStatusArgs),
    /// Put a goal's milestones in a new order
    Reorder(ReorderArgs),
}

#[derive(ClapArgs)]
pub struct AddMilestoneArgs {
    /// ID of the goal
    pub goal_id: u64,
    /// Title of the milestone
    pub title: String,
    /// Target date (YYYY-MM-DD)
    #[arg(long)]
    pub target: Date,
    /// When the milestone counts as done
    #[arg(long, default_value = "All tasks in this milestone are complete.")]
    pub done_when: String,
    /// Position within the goal; defaults to after the last milestone
    #[arg(long)]
    pub order: Option<u32>,
}

impl From<AddMilestoneArgs> for NewMilestone {
    fn from(val: AddMilestoneArgs) -> Self {
        NewMilestone {
            title: val.title,
            target_date: val.target,
            definition_of_done: val.done_when,
            order: val.order,
            status: Status::NotStarted,
            tasks: Vec::new(),
        }
    }
}

#[derive(ClapArgs)]
pub struct MilestoneIdArgs {
    /// ID of the milestone
    pub id: u64,
}

#[derive(ClapArgs)]
pub struct UpdateMilestoneArgs {
    /// ID of the milestone
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub target: Option<Date>,
    #[arg(long)]
    pub done_when: Option<String>,
}

impl From<UpdateMilestoneArgs> for UpdateMilestoneRequest {
    fn from(val: UpdateMilestoneArgs) -> Self {
        UpdateMilestoneRequest {
            title: val.title,
            target_date: val.target,
            definition_of_done: val.done_when,
            status: None,
        }
    }
}

#[derive(ClapArgs)]
pub struct MilestoneStatusArgs {
    /// ID of the milestone
    pub id: u64,
    /// New status (not-started, in-progress, completed, paused, cancelled)
    pub status: Status,
}

#[derive(ClapArgs)]
pub struct ReorderArgs {
    /// ID of the goal
    pub goal_id: u64,
    /// Every milestone ID of the goal, in the new order
    #[arg(required = true, value_delimiter = ',')]
    pub milestone_ids: Vec<u64>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a milestone
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// Update task fields
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// List tasks
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Outstanding tasks due soon, across all goals
    Due(WindowArgs),
    /// Outstanding tasks past their due date, across all goals
    Overdue,
    /// Make one task depend on another
    Depend(DependArgs),
    /// List task dependencies of a goal
    Dependencies(GoalIdArgs),
}

#[derive(ClapArgs)]
pub struct AddTaskArgs {
    /// ID of the goal
    pub goal_id: u64,
    /// ID of the milestone within the goal
    pub milestone_id: u64,
    /// Title of the task
    pub title: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Date,
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    /// Estimated effort in hours
    #[arg(long)]
    pub hours: Option<f64>,
}

impl AddTaskArgs {
    pub fn into_parts(self) -> (u64, u64, NewTask) {
        let task = NewTask {
            title: self.title,
            due_date: self.due,
            priority: self.priority,
            status: Status::NotStarted,
            estimated_time: self.hours,
        };
        (self.goal_id, self.milestone_id, task)
    }
}

#[derive(ClapArgs)]
pub struct UpdateTaskArgs {
    /// ID of the task
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub due: Option<Date>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub status: Option<Status>,
    /// Estimated effort in hours
    #[arg(long)]
    pub hours: Option<f64>,
    /// Move the task to another milestone of the same goal
    #[arg(long)]
    pub milestone: Option<u64>,
}

impl From<UpdateTaskArgs> for UpdateTaskRequest {
    fn from(val: UpdateTaskArgs) -> Self {
        UpdateTaskRequest {
            title: val.title,
            due_date: val.due,
            priority: val.priority,
            status: val.status,
            estimated_time: val.hours,
            milestone_id: val.milestone,
        }
    }
}

#[derive(ClapArgs)]
pub struct ListTasksArgs {
    /// Only tasks of this goal
    #[arg(long)]
    pub goal: Option<u64>,
    /// Only tasks of this milestone
    #[arg(long)]
    pub milestone: Option<u64>,
    /// Only tasks with this status
    #[arg(long)]
    pub status: Option<Status>,
    /// Hide completed and cancelled tasks
    #[arg(long)]
    pub outstanding: bool,
}

impl From<ListTasksArgs> for TaskFilter {
    fn from(val: ListTasksArgs) -> Self {
        TaskFilter {
            goal_id: val.goal,
            milestone_id: val.milestone,
            status: val.status,
            outstanding_only: val.outstanding,
            ..Default::default()
        }
    }
}

#[derive(ClapArgs)]
pub struct DependArgs {
    /// The task that has to wait
    pub task_id: u64,
    /// The task it waits for
    pub depends_on: u64,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_plan_requires_generator_or_offline() {
        let missing = Args::try_parse_from([
            "compass",
            "plan",
            "--title",
            "Learn to swim",
            "--deadline",
            "2027-06-01",
            "--memory-id",
            "m-1",
        ]);
        assert!(missing.is_err());

        let offline = Args::try_parse_from([
            "compass",
            "plan",
            "--title",
            "Learn to swim",
            "--deadline",
            "2027-06-01",
            "--memory-id",
            "m-1",
            "--category",
            "FITNESS",
            "--offline",
        ])
        .expect("offline plan should parse");
        let Some(Commands::Plan(plan)) = offline.command else {
            panic!("expected the plan command");
        };
        let (request, generator) = plan.into_request();
        assert!(generator.is_none());
        assert_eq!(request.context.category, GoalCategory::Fitness);
        assert_eq!(request.context.deadline, jiff::civil::date(2027, 6, 1));
    }

    #[test]
    fn test_status_arguments_are_lenient() {
        let args = Args::try_parse_from(["compass", "goal", "status", "3", "In_Progress"])
            .expect("status should parse");
        let Some(Commands::Goal {
            command: GoalCommands::Status(status),
        }) = args.command
        else {
            panic!("expected goal status");
        };
        assert_eq!(status.status, Status::InProgress);
    }

    #[test]
    fn test_reorder_accepts_comma_separated_ids() {
        let args = Args::try_parse_from(["compass", "milestone", "reorder", "1", "4,2,3"])
            .expect("reorder should parse");
        let Some(Commands::Milestone {
            command: MilestoneCommands::Reorder(reorder),
        }) = args.command
        else {
            panic!("expected milestone reorder");
        };
        assert_eq!(reorder.milestone_ids, vec![4, 2, 3]);
    }
}
