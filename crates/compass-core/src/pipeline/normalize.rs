//! Validating an extracted candidate and coercing its loosely-typed fields.
//!
//! The generator is asked for an object of this shape:
//!
//! ```json
//! {
//!   "reply": "narrative answer for the user",
//!   "milestones": [
//!     {
//!       "title": "...",
//!       "target_date": "YYYY-MM-DD",
//!       "definition_of_done": "...",
//!       "order": 1,
//!       "tasks": [
//!         {"title": "...", "due_date": "YYYY-MM-DD", "priority": "high", "estimated_time": 2.5}
//!       ]
//!     }
//!   ],
//!   "insights": ["..."],
//!   "resources": [{"title": "...", "url": "..."}]
//! }
//! ```
//!
//! `reply` and a non-empty `milestones` list are mandatory. Dates stay opaque
//! strings here; the mapper parses and clamps them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Priority;

/// Why a candidate could not be turned into an [`ExtractedPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The candidate was empty.
    Empty,
    /// The candidate is not well-formed JSON.
    Parse(String),
    /// A mandatory field is absent or has the wrong shape.
    MissingRequiredFields(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Empty => write!(f, "candidate is empty"),
            NormalizeError::Parse(msg) => write!(f, "candidate is not valid JSON: {msg}"),
            NormalizeError::MissingRequiredFields(field) => {
                write!(f, "missing or malformed required field '{field}'")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// A validated plan, transient between extraction and mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPlan {
    /// Narrative reply meant for the user
    pub reply: String,
    pub milestones: Vec<MilestoneDescriptor>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Value>,
}

/// One milestone as proposed by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDescriptor {
    pub title: String,
    pub target_date: Option<String>,
    pub definition_of_done: Option<String>,
    pub order: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

/// One task as proposed by the generator, with coerced priority and hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub title: String,
    pub due_date: Option<String>,
    pub priority: Priority,
    /// Non-negative hours
    pub estimated_time: f64,
}

impl ExtractedPlan {
    /// Total number of task descriptors across all milestones.
    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks.len()).sum()
    }
}

/// Validates `candidate` and coerces it into an [`ExtractedPlan`].
pub fn normalize(candidate: &str) -> Result<ExtractedPlan, NormalizeError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| NormalizeError::Parse(e.to_string()))?;
    let root = value
        .as_object()
        .ok_or_else(|| NormalizeError::MissingRequiredFields("<root object>".to_string()))?;

    let reply = root
        .get("reply")
        .and_then(Value::as_str)
        .ok_or_else(|| NormalizeError::MissingRequiredFields("reply".to_string()))?
        .to_string();

    let raw_milestones = root
        .get("milestones")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| NormalizeError::MissingRequiredFields("milestones".to_string()))?;

    let milestones = raw_milestones
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            raw.as_object()
                .map(|obj| milestone_descriptor(obj, idx + 1))
                .ok_or_else(|| NormalizeError::MissingRequiredFields(format!("milestones[{idx}]")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractedPlan {
        reply,
        milestones,
        insights: string_list(root.get("insights")),
        resources: root
            .get("resources")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    })
}

/// Renders an accepted plan in the canonical fenced, pretty-printed form.
pub fn canonicalize(plan: &ExtractedPlan) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(plan)?;
    Ok(format!("```json\n{body}\n```"))
}

fn milestone_descriptor(obj: &Map<String, Value>, position: usize) -> MilestoneDescriptor {
    let tasks = obj
        .get("tasks")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_object)
                .enumerate()
                .map(|(idx, task)| task_descriptor(task, idx + 1))
                .collect()
        })
        .unwrap_or_default();

    MilestoneDescriptor {
        title: text_field(obj, "title").unwrap_or_else(|| format!("Milestone {position}")),
        target_date: opaque_field(obj, "target_date"),
        definition_of_done: text_field(obj, "definition_of_done"),
        order: obj.get("order").and_then(integer_value),
        tasks,
    }
}

fn task_descriptor(obj: &Map<String, Value>, position: usize) -> TaskDescriptor {
    TaskDescriptor {
        title: text_field(obj, "title").unwrap_or_else(|| format!("Task {position}")),
        due_date: opaque_field(obj, "due_date"),
        priority: coerce_priority(obj.get("priority")),
        estimated_time: coerce_hours(obj.get("estimated_time")),
    }
}

/// Maps any priority spelling onto the four-valued enum, defaulting to
/// medium.
pub fn coerce_priority(value: Option<&Value>) -> Priority {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(Priority::Medium)
}

/// Coerces an estimated-time value into non-negative hours.
///
/// Numbers are used directly, text contributes its first decimal number,
/// anything else is `0.0`.
pub fn coerce_hours(value: Option<&Value>) -> f64 {
    let hours = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => first_decimal(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

/// Extracts the first decimal number (`12`, `1.5`, `.5`) from free text.
fn first_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let first_digit = bytes.iter().position(u8::is_ascii_digit)?;
    let start = if first_digit > 0 && bytes[first_digit - 1] == b'.' {
        first_digit - 1
    } else {
        first_digit
    };

    let mut end = first_digit;
    let mut seen_dot = start < first_digit;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    let literal = &text[start..end];
    if literal.starts_with('.') {
        format!("0{literal}").parse().ok()
    } else {
        literal.parse().ok()
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn opaque_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
