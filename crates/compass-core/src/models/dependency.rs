//! Task dependency model.

use serde::{Deserialize, Serialize};

/// An ordered pair of distinct tasks: `from_task_id` depends on
/// `to_task_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    pub id: u64,
    pub from_task_id: u64,
    pub to_task_id: u64,
}
