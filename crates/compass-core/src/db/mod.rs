//! SQLite storage for goals, milestones, tasks and task dependencies.
//!
//! Queries are split by entity into `goal_queries`, `milestone_queries` and
//! `task_queries`, all implemented on the same [`Database`] handle. Every
//! operation that writes more than one row runs inside a single
//! transaction.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod goal_queries;
pub mod migrations;
pub mod milestone_queries;
pub mod task_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
