//! Task, dependency and scheduling operations for the Planner.

use super::{Planner, today};
use crate::{
    error::{PlannerError, Result},
    models::{Dependency, NewTask, Status, Task, TaskFilter, UpdateTaskRequest},
};

impl Planner {
    /// Adds a task to a milestone of the given goal.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` if the milestone belongs to a
    /// different goal.
    pub async fn add_task(&self, goal_id: u64, milestone_id: u64, task: NewTask) -> Result<Task> {
        self.with_database(move |db| db.add_task(goal_id, milestone_id, &task))
            .await
    }

    /// Retrieves a task by ID.
    pub async fn get_task(&self, id: u64) -> Result<Task> {
        self.with_database(move |db| db.get_task(id))
            .await?
            .ok_or(PlannerError::TaskNotFound { id })
    }

    /// Applies a partial update to a task.
    pub async fn update_task(&self, id: u64, request: UpdateTaskRequest) -> Result<Task> {
        self.with_database(move |db| db.update_task(id, &request))
            .await?
            .ok_or(PlannerError::TaskNotFound { id })
    }

    /// Sets a task's lifecycle status.
    pub async fn update_task_status(&self, id: u64, status: Status) -> Result<Task> {
        self.update_task(id, UpdateTaskRequest::status(status)).await
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.with_database(move |db| db.list_tasks(&filter)).await
    }

    /// Outstanding tasks due within the next `window_days` days.
    pub async fn due_tasks(&self, window_days: i64) -> Result<Vec<Task>> {
        let today = today();
        self.with_database(move |db| db.due_tasks(today, window_days))
            .await
    }

    /// Outstanding tasks whose due date has passed.
    pub async fn overdue_tasks(&self) -> Result<Vec<Task>> {
        let today = today();
        self.with_database(move |db| db.overdue_tasks(today)).await
    }

    /// Records that `from_task_id` cannot start before `to_task_id` is done.
    pub async fn add_dependency(&self, from_task_id: u64, to_task_id: u64) -> Result<Dependency> {
        self.with_database(move |db| db.add_dependency(from_task_id, to_task_id))
            .await
    }

    pub async fn list_dependencies(&self, goal_id: u64) -> Result<Vec<Dependency>> {
        self.with_database(move |db| db.list_dependencies(goal_id))
            .await
    }
}
