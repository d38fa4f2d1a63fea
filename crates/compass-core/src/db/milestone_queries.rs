//! Milestone operations and queries.

use std::collections::HashSet;

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::utils::{id_column, parse_column};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Milestone, NewMilestone, Status, TaskFilter, UpdateMilestoneRequest},
};

const INSERT_MILESTONE_SQL: &str = "INSERT INTO milestones (goal_id, title, target_date, definition_of_done, sort_order, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_MILESTONES_BY_GOAL_SQL: &str = "SELECT id, goal_id, title, target_date, definition_of_done, sort_order, status FROM milestones WHERE goal_id = ?1 ORDER BY sort_order";
const SELECT_MILESTONE_SQL: &str = "SELECT id, goal_id, title, target_date, definition_of_done, sort_order, status FROM milestones WHERE id = ?1";
const SELECT_MILESTONE_IDS_SQL: &str = "SELECT id FROM milestones WHERE goal_id = ?1";
const NEXT_MILESTONE_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM milestones WHERE goal_id = ?1";
const CHECK_ORDER_TAKEN_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM milestones WHERE goal_id = ?1 AND sort_order = ?2)";
const UPDATE_MILESTONE_SQL: &str = "UPDATE milestones SET title = ?1, target_date = ?2, definition_of_done = ?3, status = ?4 WHERE id = ?5";
const NEGATE_MILESTONE_ORDERS_SQL: &str =
    "UPDATE milestones SET sort_order = -sort_order WHERE goal_id = ?1";
const UPDATE_MILESTONE_ORDER_SQL: &str = "UPDATE milestones SET sort_order = ?1 WHERE id = ?2";

impl super::Database {
    fn build_milestone_from_row(row: &Row) -> rusqlite::Result<Milestone> {
        Ok(Milestone {
            id: id_column(row, 0)?,
            goal_id: id_column(row, 1)?,
            title: row.get(2)?,
            target_date: parse_column(row, 3)?,
            definition_of_done: row.get(4)?,
            order: row.get(5)?,
            status: parse_column(row, 6)?,
            tasks: Vec::new(),
        })
    }

    /// Inserts a milestone and its nested tasks using an open connection or
    /// transaction. Returns the new milestone ID.
    pub(super) fn insert_milestone(
        conn: &Connection,
        goal_id: u64,
        milestone: &NewMilestone,
        order: u32,
        now: &str,
    ) -> Result<u64> {
        conn.execute(
            INSERT_MILESTONE_SQL,
            params![
                goal_id as i64,
                milestone.title.trim(),
                milestone.target_date.to_string(),
                milestone.definition_of_done,
                order,
                milestone.status.as_str()
            ],
        )
        .db_context("Failed to insert milestone")?;
        let milestone_id = conn.last_insert_rowid() as u64;

        for task in &milestone.tasks {
            Self::insert_task(conn, goal_id, milestone_id, task, now)?;
        }

        Ok(milestone_id)
    }

    /// All milestones of a goal in order, each with its tasks.
    pub fn get_milestones(&self, goal_id: u64) -> Result<Vec<Milestone>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_MILESTONES_BY_GOAL_SQL)
            .db_context("Failed to prepare query")?;

        let mut milestones = stmt
            .query_map(params![goal_id as i64], Self::build_milestone_from_row)
            .db_context("Failed to query milestones")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch milestones")?;

        let tasks = self.list_tasks(&TaskFilter {
            goal_id: Some(goal_id),
            ..Default::default()
        })?;
        for milestone in &mut milestones {
            milestone.tasks = tasks
                .iter()
                .filter(|task| task.milestone_id == milestone.id)
                .cloned()
                .collect();
        }

        Ok(milestones)
    }

    /// Retrieves a single milestone with its tasks.
    pub fn get_milestone(&self, id: u64) -> Result<Option<Milestone>> {
        let mut milestone = self
            .connection
            .query_row(
                SELECT_MILESTONE_SQL,
                params![id as i64],
                Self::build_milestone_from_row,
            )
            .optional()
            .db_context("Failed to query milestone")?;

        if let Some(ref mut milestone) = milestone {
            milestone.tasks = self.list_tasks(&TaskFilter {
                milestone_id: Some(milestone.id),
                ..Default::default()
            })?;
        }

        Ok(milestone)
    }

    /// Appends a milestone (with tasks) to an existing goal.
    ///
    /// Without an explicit order the milestone goes after the last one; an
    /// explicit order that is already taken is rejected.
    pub fn add_milestone(&mut self, goal_id: u64, milestone: &NewMilestone) -> Result<Milestone> {
        milestone.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        Self::ensure_goal_exists(&tx, goal_id)?;

        let order = match milestone.order {
            Some(order) => {
                let taken: bool = tx
                    .query_row(CHECK_ORDER_TAKEN_SQL, params![goal_id as i64, order], |row| {
                        row.get(0)
                    })
                    .db_context("Failed to check milestone order")?;
                if taken {
                    return Err(PlannerError::invalid_input("milestone.order")
                        .with_reason(format!("order {order} is already used in goal {goal_id}")));
                }
                order
            }
            None => tx
                .query_row(NEXT_MILESTONE_ORDER_SQL, params![goal_id as i64], |row| {
                    row.get(0)
                })
                .db_context("Failed to get next milestone order")?,
        };

        let now = Timestamp::now().to_string();
        let milestone_id = Self::insert_milestone(&tx, goal_id, milestone, order, &now)?;
        Self::touch_goal(&tx, goal_id, &now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_milestone(milestone_id)?
            .ok_or(PlannerError::MilestoneNotFound { id: milestone_id })
    }

    /// Applies a partial update. Returns `None` if the milestone does not
    /// exist.
    pub fn update_milestone(
        &mut self,
        id: u64,
        request: &UpdateMilestoneRequest,
    ) -> Result<Option<Milestone>> {
        request.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let Some(current) = tx
            .query_row(
                SELECT_MILESTONE_SQL,
                params![id as i64],
                Self::build_milestone_from_row,
            )
            .optional()
            .db_context("Failed to query milestone")?
        else {
            return Ok(None);
        };

        tx.execute(
            UPDATE_MILESTONE_SQL,
            params![
                request.title.as_deref().unwrap_or(&current.title).trim(),
                request.target_date.unwrap_or(current.target_date).to_string(),
                request
                    .definition_of_done
                    .as_deref()
                    .unwrap_or(&current.definition_of_done),
                request.status.unwrap_or(current.status).as_str(),
                id as i64
            ],
        )
        .db_context("Failed to update milestone")?;
        Self::touch_goal(&tx, current.goal_id, &Timestamp::now().to_string())?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_milestone(id)
    }

    /// Sets the lifecycle status of a milestone.
    pub fn update_milestone_status(
        &mut self,
        id: u64,
        status: Status,
    ) -> Result<Option<Milestone>> {
        self.update_milestone(id, &UpdateMilestoneRequest::status(status))
    }

    /// Renumbers a goal's milestones 1..n following `ordered_ids`, which
    /// must name every milestone of the goal exactly once.
    pub fn reorder_milestones(
        &mut self,
        goal_id: u64,
        ordered_ids: &[u64],
    ) -> Result<Vec<Milestone>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        Self::ensure_goal_exists(&tx, goal_id)?;

        let existing: HashSet<u64> = {
            let mut stmt = tx
                .prepare(SELECT_MILESTONE_IDS_SQL)
                .db_context("Failed to prepare query")?;
            let ids = stmt
                .query_map(params![goal_id as i64], |row| id_column(row, 0))
                .db_context("Failed to query milestone IDs")?
                .collect::<std::result::Result<HashSet<_>, _>>()
                .db_context("Failed to fetch milestone IDs")?;
            ids
        };

        let requested: HashSet<u64> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != existing {
            return Err(PlannerError::invalid_input("milestone_ids").with_reason(format!(
                "must list every milestone of goal {goal_id} exactly once"
            )));
        }

        // Move everything out of the way first so the unique (goal, order)
        // constraint holds at every step
        tx.execute(NEGATE_MILESTONE_ORDERS_SQL, params![goal_id as i64])
            .db_context("Failed to clear milestone orders")?;
        for (idx, id) in ordered_ids.iter().enumerate() {
            tx.execute(UPDATE_MILESTONE_ORDER_SQL, params![idx as i64 + 1, *id as i64])
                .db_context("Failed to update milestone order")?;
        }
        Self::touch_goal(&tx, goal_id, &Timestamp::now().to_string())?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_milestones(goal_id)
    }

    /// Returns the goal a milestone belongs to, if it exists.
    pub(super) fn milestone_goal(conn: &Connection, milestone_id: u64) -> Result<Option<u64>> {
        conn.query_row(
            "SELECT goal_id FROM milestones WHERE id = ?1",
            params![milestone_id as i64],
            |row| id_column(row, 0),
        )
        .optional()
        .db_context("Failed to query milestone goal")
    }
}
