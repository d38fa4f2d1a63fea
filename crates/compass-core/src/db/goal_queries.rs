//! Goal CRUD operations and queries.

use jiff::{Timestamp, ToSpan, civil::Date};
use log::info;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::utils::{id_column, parse_column, placeholders};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Goal, GoalFilter, GoalSummary, HierarchyPayload, Status, UpdateGoalRequest},
};

const INSERT_GOAL_SQL: &str = "INSERT INTO goals (memory_id, title, category, deadline, budget, weekly_hours, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const GOAL_COLUMNS: &str =
    "id, memory_id, title, category, deadline, budget, weekly_hours, status, created_at, updated_at";
const SELECT_GOAL_SQL: &str = "SELECT id, memory_id, title, category, deadline, budget, weekly_hours, status, created_at, updated_at FROM goals WHERE id = ?1";
const SELECT_GOAL_BY_MEMORY_ID_SQL: &str = "SELECT id, memory_id, title, category, deadline, budget, weekly_hours, status, created_at, updated_at FROM goals WHERE memory_id = ?1";
const CHECK_MEMORY_ID_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM goals WHERE memory_id = ?1)";
const UPDATE_GOAL_SQL: &str = "UPDATE goals SET title = ?1, category = ?2, deadline = ?3, budget = ?4, weekly_hours = ?5, status = ?6, updated_at = ?7 WHERE id = ?8";
const DELETE_GOAL_SQL: &str = "DELETE FROM goals WHERE id = ?1";
const SELECT_UPCOMING_DEADLINES_SQL: &str = "SELECT id, memory_id, title, category, deadline, budget, weekly_hours, status, created_at, updated_at FROM goals WHERE status NOT IN ('completed', 'cancelled') AND deadline >= ?1 AND deadline <= ?2 ORDER BY deadline, id";
const SUMMARY_COLUMNS: &str = "id, title, category, status, deadline, total_milestones, completed_milestones, total_tasks, completed_tasks";

impl super::Database {
    /// Constructs a goal (without children) from a row of [`GOAL_COLUMNS`].
    fn build_goal_from_row(row: &Row) -> rusqlite::Result<Goal> {
        Ok(Goal {
            id: id_column(row, 0)?,
            memory_id: row.get(1)?,
            title: row.get(2)?,
            category: parse_column(row, 3)?,
            deadline: parse_column(row, 4)?,
            budget: row.get(5)?,
            weekly_hours: row.get(6)?,
            status: parse_column(row, 7)?,
            created_at: parse_column(row, 8)?,
            updated_at: parse_column(row, 9)?,
            milestones: Vec::new(),
        })
    }

    fn build_summary_from_row(row: &Row) -> rusqlite::Result<GoalSummary> {
        Ok(GoalSummary {
            id: id_column(row, 0)?,
            title: row.get(1)?,
            category: parse_column(row, 2)?,
            status: parse_column(row, 3)?,
            deadline: parse_column(row, 4)?,
            total_milestones: row.get(5)?,
            completed_milestones: row.get(6)?,
            total_tasks: row.get(7)?,
            completed_tasks: row.get(8)?,
        })
    }

    fn memory_id_exists_in(conn: &Connection, memory_id: &str) -> Result<bool> {
        conn.query_row(CHECK_MEMORY_ID_EXISTS_SQL, params![memory_id], |row| row.get(0))
            .db_context("Failed to check memory ID")
    }

    /// Whether a goal already uses `memory_id`, without loading it.
    pub fn memory_id_exists(&self, memory_id: &str) -> Result<bool> {
        Self::memory_id_exists_in(&self.connection, memory_id)
    }

    fn goal_exists_in(conn: &Connection, id: u64) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM goals WHERE id = ?1)",
            params![id as i64],
            |row| row.get(0),
        )
        .db_context("Failed to check goal existence")
    }

    /// Creates a goal with all of its milestones and tasks in one
    /// transaction.
    ///
    /// Fails with [`PlannerError::Conflict`] when a goal with the same
    /// memory ID already exists; nothing is written in that case.
    pub fn create_goal(&mut self, payload: &HierarchyPayload) -> Result<Goal> {
        payload.validate()?;
        let goal = &payload.goal;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if Self::memory_id_exists_in(&tx, &goal.memory_id)? {
            return Err(PlannerError::Conflict {
                memory_id: goal.memory_id.clone(),
            });
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            INSERT_GOAL_SQL,
            params![
                goal.memory_id,
                goal.title,
                goal.category.as_str(),
                goal.deadline.to_string(),
                goal.budget,
                goal.weekly_hours,
                goal.status.as_str(),
                &now,
                &now
            ],
        )
        .db_context("Failed to insert goal")?;
        let goal_id = tx.last_insert_rowid() as u64;

        let orders = payload.milestone_orders()?;
        for (milestone, order) in payload.milestones.iter().zip(orders) {
            Self::insert_milestone(&tx, goal_id, milestone, order, &now)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "Created goal {goal_id} '{}' with {} milestones and {} tasks",
            goal.title,
            payload.milestones.len(),
            payload.task_count()
        );

        self.get_goal(goal_id, true)?
            .ok_or(PlannerError::GoalNotFound { id: goal_id })
    }

    /// Retrieves a goal by ID, optionally with its milestones and tasks.
    pub fn get_goal(&self, id: u64, include_children: bool) -> Result<Option<Goal>> {
        let goal = self
            .connection
            .query_row(SELECT_GOAL_SQL, params![id as i64], Self::build_goal_from_row)
            .optional()
            .db_context("Failed to query goal")?;

        self.with_children(goal, include_children)
    }

    /// Retrieves a goal by its external-memory correlation key.
    pub fn get_goal_by_memory_id(
        &self,
        memory_id: &str,
        include_children: bool,
    ) -> Result<Option<Goal>> {
        let goal = self
            .connection
            .query_row(
                SELECT_GOAL_BY_MEMORY_ID_SQL,
                params![memory_id],
                Self::build_goal_from_row,
            )
            .optional()
            .db_context("Failed to query goal by memory ID")?;

        self.with_children(goal, include_children)
    }

    fn with_children(&self, goal: Option<Goal>, include_children: bool) -> Result<Option<Goal>> {
        match goal {
            Some(mut goal) if include_children => {
                goal.milestones = self.get_milestones(goal.id)?;
                Ok(Some(goal))
            }
            other => Ok(other),
        }
    }

    /// Applies a partial update. Returns `None` if the goal does not exist.
    pub fn update_goal(&mut self, id: u64, request: &UpdateGoalRequest) -> Result<Option<Goal>> {
        request.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let Some(current) = tx
            .query_row(SELECT_GOAL_SQL, params![id as i64], Self::build_goal_from_row)
            .optional()
            .db_context("Failed to query goal")?
        else {
            return Ok(None);
        };

        let title = request.title.as_deref().unwrap_or(&current.title);
        let category = request.category.unwrap_or(current.category);
        let deadline = request.deadline.unwrap_or(current.deadline);
        let budget = request.budget.or(current.budget);
        let weekly_hours = request.weekly_hours.or(current.weekly_hours);
        let status = request.status.unwrap_or(current.status);

        tx.execute(
            UPDATE_GOAL_SQL,
            params![
                title.trim(),
                category.as_str(),
                deadline.to_string(),
                budget,
                weekly_hours,
                status.as_str(),
                Timestamp::now().to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update goal")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_goal(id, true)
    }

    /// Sets the lifecycle status of a goal.
    pub fn update_goal_status(&mut self, id: u64, status: Status) -> Result<Option<Goal>> {
        self.update_goal(
            id,
            &UpdateGoalRequest {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Deletes a goal together with its milestones, tasks and dependencies.
    /// Returns the deleted goal, or `None` if it did not exist.
    pub fn delete_goal(&mut self, id: u64) -> Result<Option<Goal>> {
        let Some(goal) = self.get_goal(id, true)? else {
            return Ok(None);
        };

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(DELETE_GOAL_SQL, params![id as i64])
            .db_context("Failed to delete goal")?;
        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "Deleted goal {id} '{}' with {} milestones",
            goal.title,
            goal.milestones.len()
        );
        Ok(Some(goal))
    }

    /// Lists goals matching `filter`, nearest deadline first.
    pub fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>> {
        let (conditions, params_vec) = Self::goal_conditions(filter);
        let mut query = format!("SELECT {GOAL_COLUMNS} FROM goals");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY deadline, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut goals = stmt
            .query_map(&params_refs[..], Self::build_goal_from_row)
            .db_context("Failed to query goals")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch goals")?;

        if filter.include_children {
            for goal in &mut goals {
                goal.milestones = self.get_milestones(goal.id)?;
            }
        }

        Ok(goals)
    }

    /// Lists goal summaries (child counts instead of children).
    pub fn list_goal_summaries(&self, filter: &GoalFilter) -> Result<Vec<GoalSummary>> {
        let (conditions, params_vec) = Self::goal_conditions(filter);
        let mut query = format!("SELECT {SUMMARY_COLUMNS} FROM goal_summaries");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY deadline, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], Self::build_summary_from_row)
            .db_context("Failed to query goal summaries")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch goal summaries")?;

        Ok(summaries)
    }

    fn goal_conditions(filter: &GoalFilter) -> (Vec<String>, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !filter.statuses.is_empty() {
            conditions.push(format!("status IN ({})", placeholders(filter.statuses.len())));
            for status in &filter.statuses {
                params_vec.push(Box::new(status.as_str()));
            }
        }

        if let Some(category) = filter.category {
            conditions.push("category = ?".to_string());
            params_vec.push(Box::new(category.as_str()));
        }

        if let Some(before) = filter.due_before {
            conditions.push("deadline <= ?".to_string());
            params_vec.push(Box::new(before.to_string()));
        }

        (conditions, params_vec)
    }

    /// Open goals whose deadline falls within `window_days` of `today`.
    pub fn upcoming_deadlines(&self, today: Date, window_days: i64) -> Result<Vec<Goal>> {
        let until = today.saturating_add(window_days.days());
        let mut stmt = self
            .connection
            .prepare(SELECT_UPCOMING_DEADLINES_SQL)
            .db_context("Failed to prepare query")?;

        let goals = stmt
            .query_map(
                params![today.to_string(), until.to_string()],
                Self::build_goal_from_row,
            )
            .db_context("Failed to query upcoming deadlines")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch upcoming deadlines")?;

        Ok(goals)
    }

    pub(super) fn ensure_goal_exists(conn: &Connection, id: u64) -> Result<()> {
        if Self::goal_exists_in(conn, id)? {
            Ok(())
        } else {
            Err(PlannerError::GoalNotFound { id })
        }
    }

    /// Bumps a goal's `updated_at` after a child changed.
    pub(super) fn touch_goal(conn: &Connection, id: u64, now: &str) -> Result<()> {
        conn.execute(
            "UPDATE goals SET updated_at = ?1 WHERE id = ?2",
            params![now, id as i64],
        )
        .db_context("Failed to update goal timestamp")?;
        Ok(())
    }
}
