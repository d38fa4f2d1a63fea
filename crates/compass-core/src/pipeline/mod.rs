//! From free-form generated text to a persistable goal hierarchy.
//!
//! The stages run strictly in sequence for one planning request:
//!
//! 1. [`extract`] finds the structured candidate in a reply.
//! 2. [`normalize`] validates it and coerces loose fields.
//! 3. [`RepairController`] re-asks the generator up to twice when either of
//!    the above fails.
//! 4. [`map_plan`] (or [`build_default_plan`] when repairs are exhausted)
//!    produces a [`HierarchyPayload`](crate::models::HierarchyPayload).
//!
//! Nothing in this module touches the database, and no failure in stages
//! 1–3 escapes the controller.

pub mod extract;
pub mod generator;
pub mod mapper;
pub mod normalize;
pub mod prompt;
pub mod repair;

pub use extract::{ExtractionError, extract, extract_candidate};
pub use generator::{ConversationContext, GenerationError, Role, TextGenerator, Turn};
pub use mapper::{GoalContext, MappedPlan, build_default_plan, fallback_date, map_plan};
pub use normalize::{
    ExtractedPlan, MilestoneDescriptor, NormalizeError, TaskDescriptor, canonicalize, normalize,
};
pub use prompt::{minimal_plan_prompt, planning_prompt, repair_format_prompt};
pub use repair::{
    Attempt, FailureReason, RepairController, RepairOutcome, RepairState, evaluate,
    looks_like_plan_attempt,
};
