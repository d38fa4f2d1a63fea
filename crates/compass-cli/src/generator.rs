//! Text generators available from the command line.

use std::process::Stdio;

use async_trait::async_trait;
use compass_core::pipeline::{ConversationContext, GenerationError, TextGenerator};
use log::debug;
use tokio::{io::AsyncWriteExt, process::Command};

/// Runs a shell command per generation call.
///
/// The rendered conversation plus the new prompt is written to the
/// command's stdin; whatever it prints to stdout is the reply. A non-zero
/// exit status is a generation failure.
pub struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(
        &self,
        context: &ConversationContext,
        prompt: &str,
    ) -> Result<String, GenerationError> {
        debug!(
            "Running generator command with {} earlier turn(s)",
            context.turns.len()
        );

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GenerationError::new(format!("failed to start generator: {e}")))?;

        // Feed stdin while stdout is drained so neither pipe can fill up
        let stdin = child.stdin.take();
        let input = context.render_with(prompt);
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // Commands that ignore their input close the pipe early
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Generator did not read all of its input: {e}");
                }
            }
        };

        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output =
            output.map_err(|e| GenerationError::new(format!("generator did not finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::new(format!(
                "generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| GenerationError::new("generator output is not valid UTF-8"))
    }
}

/// Always fails, so planning falls straight back to the starter plan.
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(
        &self,
        _context: &ConversationContext,
        _prompt: &str,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::new("no generator configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_generator_returns_stdout() {
        let generator = CommandGenerator::new("printf 'hello'");
        let reply = generator
            .generate(&ConversationContext::new("t"), "ignored")
            .await
            .expect("generator should succeed");
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_command_generator_receives_transcript() {
        let mut context = ConversationContext::new("t");
        context.push_user("first prompt");
        context.push_assistant("first reply");

        let generator = CommandGenerator::new("cat");
        let reply = generator
            .generate(&context, "second prompt")
            .await
            .expect("generator should succeed");
        assert_eq!(reply, context.render_with("second prompt"));
    }

    #[tokio::test]
    async fn test_command_generator_streams_large_transcript() {
        let mut context = ConversationContext::new("t");
        context.push_user("plan please");
        context.push_assistant("x".repeat(1024 * 1024));

        let generator = CommandGenerator::new("cat");
        let reply = generator
            .generate(&context, "fix the json")
            .await
            .expect("generator should succeed");
        assert_eq!(reply.len(), context.render_with("fix the json").len());
    }

    #[tokio::test]
    async fn test_command_generator_failure() {
        let generator = CommandGenerator::new("echo broken >&2; exit 3");
        let err = generator
            .generate(&ConversationContext::new("t"), "prompt")
            .await
            .unwrap_err();
        assert!(err.message.contains("broken"));
    }

    #[tokio::test]
    async fn test_offline_generator_always_fails() {
        let result = OfflineGenerator
            .generate(&ConversationContext::new("t"), "prompt")
            .await;
        assert!(result.is_err());
    }
}
