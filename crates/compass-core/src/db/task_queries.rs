//! Task and task-dependency operations and queries.

use jiff::{Timestamp, ToSpan, civil::Date};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::utils::{id_column, parse_column};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Dependency, NewTask, Task, TaskFilter, UpdateTaskRequest},
};

const INSERT_TASK_SQL: &str = "INSERT INTO tasks (goal_id, milestone_id, title, due_date, priority, status, estimated_time, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const TASK_COLUMNS: &str = "id, goal_id, milestone_id, title, due_date, priority, status, estimated_time, created_at, updated_at";
const SELECT_TASK_SQL: &str = "SELECT id, goal_id, milestone_id, title, due_date, priority, status, estimated_time, created_at, updated_at FROM tasks WHERE id = ?1";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET milestone_id = ?1, title = ?2, due_date = ?3, priority = ?4, status = ?5, estimated_time = ?6, updated_at = ?7 WHERE id = ?8";
const SELECT_TASK_GOAL_SQL: &str = "SELECT goal_id FROM tasks WHERE id = ?1";
const CHECK_DEPENDENCY_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM task_dependencies WHERE from_task_id = ?1 AND to_task_id = ?2)";
const INSERT_DEPENDENCY_SQL: &str =
    "INSERT INTO task_dependencies (from_task_id, to_task_id) VALUES (?1, ?2)";
const SELECT_DEPENDENCIES_BY_GOAL_SQL: &str = "SELECT d.id, d.from_task_id, d.to_task_id FROM task_dependencies d JOIN tasks t ON t.id = d.from_task_id WHERE t.goal_id = ?1 ORDER BY d.id";

impl super::Database {
    fn build_task_from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: id_column(row, 0)?,
            goal_id: id_column(row, 1)?,
            milestone_id: id_column(row, 2)?,
            title: row.get(3)?,
            due_date: parse_column(row, 4)?,
            priority: parse_column(row, 5)?,
            status: parse_column(row, 6)?,
            estimated_time: row.get(7)?,
            created_at: parse_column(row, 8)?,
            updated_at: parse_column(row, 9)?,
        })
    }

    pub(super) fn insert_task(
        conn: &Connection,
        goal_id: u64,
        milestone_id: u64,
        task: &NewTask,
        now: &str,
    ) -> Result<u64> {
        conn.execute(
            INSERT_TASK_SQL,
            params![
                goal_id as i64,
                milestone_id as i64,
                task.title.trim(),
                task.due_date.to_string(),
                task.priority.as_str(),
                task.status.as_str(),
                task.estimated_time,
                now,
                now
            ],
        )
        .db_context("Failed to insert task")?;
        Ok(conn.last_insert_rowid() as u64)
    }

    /// Rejects a milestone that is missing or owned by another goal.
    fn ensure_milestone_in_goal(conn: &Connection, milestone_id: u64, goal_id: u64) -> Result<()> {
        match Self::milestone_goal(conn, milestone_id)? {
            None => Err(PlannerError::MilestoneNotFound { id: milestone_id }),
            Some(owner) if owner != goal_id => Err(PlannerError::invalid_input("milestone_id")
                .with_reason(format!(
                    "milestone {milestone_id} belongs to goal {owner}, not goal {goal_id}"
                ))),
            Some(_) => Ok(()),
        }
    }

    /// Retrieves a task by ID.
    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        self.connection
            .query_row(SELECT_TASK_SQL, params![id as i64], Self::build_task_from_row)
            .optional()
            .db_context("Failed to query task")
    }

    /// Adds a task to a milestone of the given goal.
    pub fn add_task(&mut self, goal_id: u64, milestone_id: u64, task: &NewTask) -> Result<Task> {
        task.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        Self::ensure_goal_exists(&tx, goal_id)?;
        Self::ensure_milestone_in_goal(&tx, milestone_id, goal_id)?;

        let now = Timestamp::now().to_string();
        let task_id = Self::insert_task(&tx, goal_id, milestone_id, task, &now)?;
        Self::touch_goal(&tx, goal_id, &now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_task(task_id)?
            .ok_or(PlannerError::TaskNotFound { id: task_id })
    }

    /// Applies a partial update. Returns `None` if the task does not exist.
    pub fn update_task(&mut self, id: u64, request: &UpdateTaskRequest) -> Result<Option<Task>> {
        request.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let Some(current) = tx
            .query_row(SELECT_TASK_SQL, params![id as i64], Self::build_task_from_row)
            .optional()
            .db_context("Failed to query task")?
        else {
            return Ok(None);
        };

        let milestone_id = match request.milestone_id {
            Some(milestone_id) if milestone_id != current.milestone_id => {
                Self::ensure_milestone_in_goal(&tx, milestone_id, current.goal_id)?;
                milestone_id
            }
            _ => current.milestone_id,
        };

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_TASK_SQL,
            params![
                milestone_id as i64,
                request.title.as_deref().unwrap_or(&current.title).trim(),
                request.due_date.unwrap_or(current.due_date).to_string(),
                request.priority.unwrap_or(current.priority).as_str(),
                request.status.unwrap_or(current.status).as_str(),
                request.estimated_time.or(current.estimated_time),
                &now,
                id as i64
            ],
        )
        .db_context("Failed to update task")?;
        Self::touch_goal(&tx, current.goal_id, &now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_task(id)
    }

    /// Lists tasks matching `filter`, earliest due date first.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(goal_id) = filter.goal_id {
            conditions.push("goal_id = ?");
            params_vec.push(Box::new(goal_id as i64));
        }

        if let Some(milestone_id) = filter.milestone_id {
            conditions.push("milestone_id = ?");
            params_vec.push(Box::new(milestone_id as i64));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params_vec.push(Box::new(status.as_str()));
        }

        if let Some(after) = filter.due_after {
            conditions.push("due_date >= ?");
            params_vec.push(Box::new(after.to_string()));
        }

        if let Some(before) = filter.due_before {
            conditions.push("due_date <= ?");
            params_vec.push(Box::new(before.to_string()));
        }

        if filter.outstanding_only {
            conditions.push("status NOT IN ('completed', 'cancelled')");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY due_date, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let tasks = stmt
            .query_map(&params_refs[..], Self::build_task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch tasks")?;

        Ok(tasks)
    }

    /// Outstanding tasks due between `today` and `today + window_days`,
    /// across all goals.
    pub fn due_tasks(&self, today: Date, window_days: i64) -> Result<Vec<Task>> {
        self.list_tasks(&TaskFilter {
            due_after: Some(today),
            due_before: Some(today.saturating_add(window_days.days())),
            outstanding_only: true,
            ..Default::default()
        })
    }

    /// Outstanding tasks whose due date has passed, across all goals.
    pub fn overdue_tasks(&self, today: Date) -> Result<Vec<Task>> {
        self.list_tasks(&TaskFilter {
            due_before: Some(today.saturating_sub(1.day())),
            outstanding_only: true,
            ..Default::default()
        })
    }

    fn task_goal(conn: &Connection, task_id: u64) -> Result<u64> {
        conn.query_row(SELECT_TASK_GOAL_SQL, params![task_id as i64], |row| {
            id_column(row, 0)
        })
        .optional()
        .db_context("Failed to query task goal")?
        .ok_or(PlannerError::TaskNotFound { id: task_id })
    }

    /// Records that `from_task_id` depends on `to_task_id`.
    ///
    /// Both tasks must belong to the same goal; self-dependencies and
    /// duplicates are rejected.
    pub fn add_dependency(&mut self, from_task_id: u64, to_task_id: u64) -> Result<Dependency> {
        if from_task_id == to_task_id {
            return Err(PlannerError::invalid_input("to_task_id")
                .with_reason("a task cannot depend on itself"));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let from_goal = Self::task_goal(&tx, from_task_id)?;
        let to_goal = Self::task_goal(&tx, to_task_id)?;
        if from_goal != to_goal {
            return Err(PlannerError::invalid_input("to_task_id")
                .with_reason("dependent tasks must belong to the same goal"));
        }

        let exists: bool = tx
            .query_row(
                CHECK_DEPENDENCY_EXISTS_SQL,
                params![from_task_id as i64, to_task_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check dependency")?;
        if exists {
            return Err(PlannerError::invalid_input("to_task_id").with_reason(format!(
                "task {from_task_id} already depends on task {to_task_id}"
            )));
        }

        tx.execute(
            INSERT_DEPENDENCY_SQL,
            params![from_task_id as i64, to_task_id as i64],
        )
        .db_context("Failed to insert dependency")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Dependency {
            id,
            from_task_id,
            to_task_id,
        })
    }

    /// All dependencies between tasks of a goal.
    pub fn list_dependencies(&self, goal_id: u64) -> Result<Vec<Dependency>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DEPENDENCIES_BY_GOAL_SQL)
            .db_context("Failed to prepare query")?;

        let dependencies = stmt
            .query_map(params![goal_id as i64], |row| {
                Ok(Dependency {
                    id: id_column(row, 0)?,
                    from_task_id: id_column(row, 1)?,
                    to_task_id: id_column(row, 2)?,
                })
            })
            .db_context("Failed to query dependencies")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch dependencies")?;

        Ok(dependencies)
    }
}
