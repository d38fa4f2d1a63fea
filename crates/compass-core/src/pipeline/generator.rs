//! The text-generation boundary and the conversation it runs in.
//!
//! The planner never talks to a model provider directly. Callers hand in any
//! [`TextGenerator`]; the pipeline passes an explicit [`ConversationContext`]
//! on every call so that repairs can refer back to the generator's own
//! earlier output.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who produced a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single prompt or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Conversation state shared by every generation call of one planning
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// External-memory correlation key of the goal being planned
    pub id: String,
    /// Earlier exchanges, oldest first
    pub turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            turns: Vec::new(),
        }
    }

    /// Records a prompt sent to the generator.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Records a reply received from the generator.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// The most recent generator reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.content.as_str())
    }

    /// Renders the transcript followed by `prompt` as plain text, for
    /// generators that only accept a single input document.
    ///
    /// ```rust
    /// use compass_core::pipeline::ConversationContext;
    ///
    /// let mut context = ConversationContext::new("thread-1");
    /// context.push_user("Plan my goal");
    /// context.push_assistant("{\"milestones\": [");
    ///
    /// let text = context.render_with("Please fix the JSON.");
    /// assert!(text.starts_with("### user\nPlan my goal\n\n### assistant\n"));
    /// assert!(text.ends_with("### user\nPlease fix the JSON.\n"));
    /// ```
    pub fn render_with(&self, prompt: &str) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(&format!("### {}\n{}\n\n", turn.role.as_str(), turn.content));
        }
        out.push_str(&format!("### {}\n{}\n", Role::User.as_str(), prompt));
        out
    }
}

/// A provider or transport failure while generating text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generation failed: {}", self.message)
    }
}

impl std::error::Error for GenerationError {}

/// Produces a natural-language reply to `prompt` within `context`.
///
/// Implementations must not modify the context; the caller records the
/// exchange once the reply is known.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        context: &ConversationContext,
        prompt: &str,
    ) -> Result<String, GenerationError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};
