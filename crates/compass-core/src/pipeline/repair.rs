//! The repair-retry state machine wrapped around the text generator.
//!
//! ```text
//! Initial ──fail──▶ RepairedOnce ──fail──▶ RepairedMinimal ──fail──▶ Exhausted
//!    │                   │                       │
//!    └──────────ok───────┴──────────ok───────────┴──▶ Accepted
//! ```
//!
//! Each state issues exactly one generation call, so a request costs at most
//! three calls. A first reply that does not even look like a plan is not
//! repaired; it goes straight to `Exhausted`.

use std::fmt;

use log::{debug, info, warn};

use super::extract::{ExtractionError, extract_candidate};
use super::generator::{ConversationContext, GenerationError, TextGenerator};
use super::normalize::{ExtractedPlan, NormalizeError, canonicalize, normalize};
use super::prompt::{minimal_plan_prompt, repair_format_prompt};

/// Lower-cased markers of a reply that at least tried to produce a plan.
const PLAN_MARKERS: &[&str] = &[
    "milestones",
    "definition_of_done",
    "definition of done",
    "\"goal\"",
    "target_date",
    "due_date",
    "```json",
];

/// Position in the repair sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    /// The original planning request
    Initial,
    /// Asked once to fix the format
    RepairedOnce,
    /// Asked for a smaller plan
    RepairedMinimal,
}

impl RepairState {
    /// The state entered after a failed attempt, or `None` when retries are
    /// used up.
    pub fn next(self) -> Option<Self> {
        match self {
            RepairState::Initial => Some(RepairState::RepairedOnce),
            RepairState::RepairedOnce => Some(RepairState::RepairedMinimal),
            RepairState::RepairedMinimal => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepairState::Initial => "initial",
            RepairState::RepairedOnce => "repaired-once",
            RepairState::RepairedMinimal => "repaired-minimal",
        }
    }
}

/// Why one attempt did not produce a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Extraction(ExtractionError),
    Normalization(NormalizeError),
    Generation(GenerationError),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Extraction(e) => write!(f, "extraction: {e}"),
            FailureReason::Normalization(e) => write!(f, "normalization: {e}"),
            FailureReason::Generation(e) => write!(f, "{e}"),
        }
    }
}

/// Result of checking a single generator reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    Accepted(ExtractedPlan),
    Failed(FailureReason),
}

/// Runs extraction then normalization on one reply.
pub fn evaluate(text: &str) -> Attempt {
    let candidate = match extract_candidate(text) {
        Ok(candidate) => candidate,
        Err(e) => return Attempt::Failed(FailureReason::Extraction(e)),
    };
    match normalize(candidate) {
        Ok(plan) => Attempt::Accepted(plan),
        Err(e) => Attempt::Failed(FailureReason::Normalization(e)),
    }
}

/// Whether `text` resembles an attempt at a structured plan.
///
/// ```rust
/// use compass_core::pipeline::looks_like_plan_attempt;
///
/// assert!(looks_like_plan_attempt("{\"Milestones\": [ {\"title\": \"Sta"));
/// assert!(!looks_like_plan_attempt("Sorry, I can't help with that."));
/// ```
pub fn looks_like_plan_attempt(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PLAN_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Terminal outcome of the repair sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    Accepted {
        plan: ExtractedPlan,
        /// Fenced, pretty-printed rendering of `plan`
        canonical_text: String,
        /// Generation calls spent, including the successful one
        attempts: usize,
    },
    Exhausted {
        attempts: usize,
        last_failure: Option<FailureReason>,
    },
}

impl RepairOutcome {
    pub fn attempts(&self) -> usize {
        match self {
            RepairOutcome::Accepted { attempts, .. }
            | RepairOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RepairOutcome::Accepted { .. })
    }
}

/// Drives generation, extraction and normalization until a plan is accepted
/// or the retries run out.
pub struct RepairController<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> RepairController<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Sends `prompt` and repairs as needed. Every prompt and reply is
    /// appended to `context`.
    pub async fn run(&self, context: &mut ConversationContext, prompt: &str) -> RepairOutcome {
        let mut state = RepairState::Initial;
        let mut current_prompt = prompt.to_string();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(
                "Generation attempt {attempts} for '{}' in state {}",
                context.id,
                state.as_str()
            );

            let generated = self.generator.generate(context, &current_prompt).await;
            context.push_user(current_prompt.as_str());

            let (attempt, reply) = match generated {
                Ok(text) => {
                    context.push_assistant(text.as_str());
                    (evaluate(&text), Some(text))
                }
                Err(e) => (Attempt::Failed(FailureReason::Generation(e)), None),
            };

            let reason = match attempt {
                Attempt::Accepted(plan) => {
                    info!(
                        "Accepted plan for '{}' on attempt {attempts}: {} milestones, {} tasks",
                        context.id,
                        plan.milestones.len(),
                        plan.task_count()
                    );
                    let canonical_text = match canonicalize(&plan) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Could not canonicalize accepted plan: {e}");
                            reply.unwrap_or_default()
                        }
                    };
                    return RepairOutcome::Accepted {
                        plan,
                        canonical_text,
                        attempts,
                    };
                }
                Attempt::Failed(reason) => reason,
            };

            warn!(
                "Attempt {attempts} for '{}' failed in state {}: {reason}",
                context.id,
                state.as_str()
            );

            if state == RepairState::Initial {
                if let Some(text) = reply.as_deref() {
                    if !looks_like_plan_attempt(text) {
                        info!("Reply for '{}' is not a plan attempt; not repairing", context.id);
                        return RepairOutcome::Exhausted {
                            attempts,
                            last_failure: Some(reason),
                        };
                    }
                }
            }

            match state.next() {
                Some(next) => {
                    current_prompt = match next {
                        RepairState::RepairedOnce => repair_format_prompt(),
                        _ => minimal_plan_prompt(),
                    };
                    state = next;
                }
                None => {
                    info!("Repairs exhausted for '{}' after {attempts} attempts", context.id);
                    return RepairOutcome::Exhausted {
                        attempts,
                        last_failure: Some(reason),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    const VALID_PLAN: &str = "Here you go!\n```json\n{\"reply\": \"Let's start.\", \"milestones\": [{\"title\": \"Basics\", \"target_date\": \"2027-01-01\", \"tasks\": [{\"title\": \"Read\", \"estimated_time\": \"2 hours\"}]}]}\n```";
    const TRUNCATED_PLAN: &str =
        "```json\n{\"reply\": \"ok\", \"milestones\": [{\"title\": \"Week 1\", \"tasks\": [";

    /// Replays canned replies and records every prompt it receives.
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        fallback: Option<String>,
        prompts: Mutex<Vec<String>>,
        seen_turns: Mutex<Vec<usize>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(GenerationError::new))
                        .collect(),
                ),
                fallback: None,
                prompts: Mutex::new(Vec::new()),
                seen_turns: Mutex::new(Vec::new()),
            }
        }

        fn always(reply: &str) -> Self {
            Self {
                fallback: Some(reply.to_string()),
                ..Self::new(vec![])
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn prompt(&self, idx: usize) -> String {
            self.prompts.lock().unwrap()[idx].clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            context: &ConversationContext,
            prompt: &str,
        ) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.seen_turns.lock().unwrap().push(context.turns.len());
            match self.replies.lock().unwrap().pop_front() {
                Some(reply) => reply,
                None => self
                    .fallback
                    .clone()
                    .ok_or_else(|| GenerationError::new("script exhausted")),
            }
        }
    }

    #[tokio::test]
    async fn test_first_valid_reply_is_accepted_immediately() {
        let generator = ScriptedGenerator::new(vec![Ok(VALID_PLAN)]);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert_eq!(generator.calls(), 1);
        match outcome {
            RepairOutcome::Accepted {
                plan,
                canonical_text,
                attempts,
            } => {
                assert_eq!(attempts, 1);
                assert_eq!(plan.reply, "Let's start.");
                assert_eq!(plan.milestones[0].tasks[0].estimated_time, 2.0);
                assert!(canonical_text.starts_with("```json\n{\n"));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert_eq!(context.turns.len(), 2);
    }

    #[tokio::test]
    async fn test_truncated_then_valid_stops_after_repair() {
        let generator =
            ScriptedGenerator::new(vec![Ok(TRUNCATED_PLAN), Ok(VALID_PLAN), Ok("unused")]);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert!(outcome.is_accepted());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(generator.calls(), 2);
        assert_eq!(generator.prompt(1), repair_format_prompt());
        // The repair call sees the malformed exchange.
        assert_eq!(*generator.seen_turns.lock().unwrap(), vec![0, 2]);
        assert_eq!(context.turns[1].content, TRUNCATED_PLAN);
    }

    #[tokio::test]
    async fn test_adversarial_generator_gets_exactly_three_calls() {
        let generator = ScriptedGenerator::always(TRUNCATED_PLAN);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert_eq!(generator.calls(), 3);
        assert_eq!(generator.prompt(0), "plan please");
        assert_eq!(generator.prompt(1), repair_format_prompt());
        assert_eq!(generator.prompt(2), minimal_plan_prompt());
        match outcome {
            RepairOutcome::Exhausted {
                attempts,
                last_failure,
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    last_failure,
                    Some(FailureReason::Extraction(ExtractionError::Truncated))
                );
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_well_formed_but_incomplete_json_is_repaired() {
        let generator = ScriptedGenerator::new(vec![
            Ok("```json\n{\"reply\": \"hi\", \"milestones\": []}\n```"),
            Ok(VALID_PLAN),
        ]);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;
        assert_eq!(outcome.attempts(), 2);
        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn test_non_plan_first_reply_is_not_repaired() {
        let generator = ScriptedGenerator::always("I'd love to help! What is your goal?");
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert_eq!(generator.calls(), 1);
        assert!(matches!(
            outcome,
            RepairOutcome::Exhausted {
                attempts: 1,
                last_failure: Some(FailureReason::Extraction(ExtractionError::Empty)),
            }
        ));
    }

    #[tokio::test]
    async fn test_generation_error_advances_state() {
        let generator = ScriptedGenerator::new(vec![Err("timeout"), Ok(VALID_PLAN)]);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert!(outcome.is_accepted());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(generator.prompt(1), repair_format_prompt());
        // Failed calls record the prompt but no reply.
        assert_eq!(context.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_persistent_generation_errors_exhaust() {
        let generator = ScriptedGenerator::new(vec![]);
        let mut context = ConversationContext::new("thread-1");

        let outcome = RepairController::new(&generator)
            .run(&mut context, "plan please")
            .await;

        assert_eq!(generator.calls(), 3);
        assert!(matches!(
            outcome,
            RepairOutcome::Exhausted {
                attempts: 3,
                last_failure: Some(FailureReason::Generation(_)),
            }
        ));
    }

    #[test]
    fn test_state_sequence_is_finite() {
        assert_eq!(RepairState::Initial.next(), Some(RepairState::RepairedOnce));
        assert_eq!(
            RepairState::RepairedOnce.next(),
            Some(RepairState::RepairedMinimal)
        );
        assert_eq!(RepairState::RepairedMinimal.next(), None);
    }

    #[test]
    fn test_plan_markers() {
        assert!(looks_like_plan_attempt("Definition of Done: all forms filed"));
        assert!(looks_like_plan_attempt("{\"goal\": \"x\""));
        assert!(looks_like_plan_attempt("```JSON\n{"));
        assert!(!looks_like_plan_attempt("The goal is hard."));
    }

    #[test]
    fn test_evaluate_distinguishes_failure_stages() {
        assert!(matches!(
            evaluate("{\"reply\": 1"),
            Attempt::Failed(FailureReason::Extraction(ExtractionError::Truncated))
        ));
        assert!(matches!(
            evaluate("{\"reply\": 1}"),
            Attempt::Failed(FailureReason::Normalization(
                NormalizeError::MissingRequiredFields(_)
            ))
        ));
        assert!(matches!(evaluate(VALID_PLAN), Attempt::Accepted(_)));
    }
}
