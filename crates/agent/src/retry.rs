use thiserror::Error;
use tracing::warn;

use weave_core::ChatMessage;

use crate::llm::{self, InferenceClient};

/// Terminal agent failure: every attempt's invocation failed.
///
/// Only agents configured with [`ExhaustionPolicy::RaiseToCaller`] ever let
/// this reach their caller; the degrading agents absorb it into a fallback.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("inference failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// What an agent does once the retry bound is spent. The two policies are
/// deliberate, not an inconsistency: conversational surfaces degrade to a
/// safe object so the conversation keeps moving, while the free-text agent
/// raises so its caller can decide what to show the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    #[default]
    DegradeToDefault,
    RaiseToCaller,
}

/// Bounded sequential retry around invoke + recover.
///
/// Attempts never run concurrently: each retry's corrective message depends
/// on the previous attempt's error.
#[derive(Clone, Debug)]
pub struct RetryController {
    max_attempts: u32,
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryController {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1) }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run one agent call to completion.
    ///
    /// On invocation success the infallible `recover` closure produces the
    /// result; normalization failures cannot happen by construction. On
    /// invocation failure a corrective assistant message embedding the error
    /// is appended to the caller-owned transcript so the next attempt can
    /// see it. Exhausting the bound yields [`AgentError::Exhausted`].
    pub async fn run<T>(
        &self,
        client: &dyn InferenceClient,
        model: &str,
        system_prompt: &str,
        transcript: &mut Vec<ChatMessage>,
        corrective_hint: &str,
        recover: impl Fn(&str) -> T,
    ) -> Result<T, AgentError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match llm::invoke(client, system_prompt, transcript, model).await {
                Ok(response) => return Ok(recover(&response)),
                Err(error) => {
                    warn!(
                        event_name = "agent.attempt_failed",
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "inference attempt failed"
                    );
                    last_error = error.to_string();
                    transcript.push(ChatMessage::assistant(format!(
                        "An error occurred. {corrective_hint} Error: {last_error}"
                    )));
                }
            }
        }

        Err(AgentError::Exhausted { attempts: self.max_attempts, last_error })
    }
}
