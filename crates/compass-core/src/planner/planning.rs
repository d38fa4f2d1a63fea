//! End-to-end planning: generate, repair, map and persist a goal.

use log::{info, warn};
use serde::Serialize;

use super::{Planner, today};
use crate::{
    error::{PlannerError, Result},
    models::Goal,
    pipeline::{
        ConversationContext, GoalContext, RepairController, RepairOutcome, TextGenerator,
        build_default_plan, map_plan, planning_prompt,
    },
};

/// Reply shown when the generator never produced a usable plan.
pub const DEFAULT_PLAN_REPLY: &str = "I couldn't put together a detailed plan this time, so \
I've set up a kickoff milestone with a few first steps. You can refine it as you go.";

/// Input of [`Planner::plan_goal`].
#[derive(Debug, Clone)]
pub struct PlanGoal {
    pub context: GoalContext,
    /// Free-form notes from the user, passed to the generator verbatim
    pub user_notes: Option<String>,
}

/// Where the persisted hierarchy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// An accepted generator reply
    Generated,
    /// The deterministic fallback after repairs were exhausted
    Default,
}

impl PlanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSource::Generated => "generated",
            PlanSource::Default => "default",
        }
    }
}

/// Result of a planning request.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningOutcome {
    /// The persisted goal with its milestones and tasks
    pub goal: Goal,
    pub source: PlanSource,
    /// Narrative reply for the user
    pub reply: String,
    /// Canonical fenced plan text, only for generated plans
    pub canonical_text: Option<String>,
    /// Generation calls spent
    pub attempts: usize,
    /// Adjustments made while mapping the plan
    pub warnings: Vec<String>,
}

impl Planner {
    /// Plans a new goal with `generator` and stores the result.
    ///
    /// A malformed or missing plan never fails the request: after two
    /// repair attempts the deterministic default plan is stored instead.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` for an invalid goal context and
    /// `PlannerError::Conflict` when the correlation key is already in use.
    /// Both are reported before the generator is called.
    pub async fn plan_goal(
        &self,
        generator: &dyn TextGenerator,
        params: PlanGoal,
    ) -> Result<PlanningOutcome> {
        let PlanGoal {
            context,
            user_notes,
        } = params;
        context.validate()?;

        let memory_id = context.memory_id.trim().to_string();
        if self.memory_id_in_use(&memory_id).await? {
            return Err(PlannerError::Conflict { memory_id });
        }

        let today = today();
        let prompt = planning_prompt(&context, user_notes.as_deref(), today);
        let mut conversation = ConversationContext::new(memory_id.as_str());

        let outcome = RepairController::new(generator)
            .run(&mut conversation, &prompt)
            .await;
        let attempts = outcome.attempts();

        let (payload, source, reply, canonical_text, warnings) = match outcome {
            RepairOutcome::Accepted {
                plan,
                canonical_text,
                ..
            } => {
                let mapped = map_plan(&plan, &context, today);
                for warning in &mapped.warnings {
                    warn!("Plan for '{memory_id}': {warning}");
                }
                (
                    mapped.payload,
                    PlanSource::Generated,
                    plan.reply,
                    Some(canonical_text),
                    mapped.warnings,
                )
            }
            RepairOutcome::Exhausted { last_failure, .. } => {
                warn!(
                    "No usable plan for '{memory_id}' after {attempts} attempt(s) \
                     (last failure: {last_failure:?}); using the default plan"
                );
                (
                    build_default_plan(&context, today),
                    PlanSource::Default,
                    DEFAULT_PLAN_REPLY.to_string(),
                    None,
                    Vec::new(),
                )
            }
        };

        let goal = self.create_goal(payload).await?;
        info!(
            "Planned goal {} ({}) from {} plan with {} milestone(s)",
            goal.id,
            memory_id,
            source.as_str(),
            goal.milestones.len()
        );

        Ok(PlanningOutcome {
            goal,
            source,
            reply,
            canonical_text,
            attempts,
            warnings,
        })
    }
}
