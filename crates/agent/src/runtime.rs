//! Agent runtime: one handle bundling the inference client, the configured
//! model, and the retry bound, exposing the four agent call surfaces the
//! orchestration loop consumes.

use std::sync::Arc;

use tracing::info;

use weave_core::config::LlmConfig;
use weave_core::{ChatMessage, Workflow};

use crate::agents::{self, NextAgentDecision, UserUnderstanding};
use crate::llm::{InferenceClient, InferenceError};
use crate::openai::OpenAiCompatClient;
use crate::retry::{AgentError, RetryController};

#[derive(Clone)]
pub struct AgentRuntime {
    client: Arc<dyn InferenceClient>,
    model: String,
    controller: RetryController,
}

impl AgentRuntime {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        model: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self { client, model: model.into(), controller: RetryController::new(max_attempts) }
    }

    /// Build the runtime the server uses: an HTTP chat-completions client
    /// behind the configured provider, model, and retry bound.
    pub fn from_config(config: &LlmConfig) -> Result<Self, InferenceError> {
        let client = OpenAiCompatClient::from_config(config)?;
        info!(
            event_name = "agent.runtime.initialized",
            model = %config.model,
            max_attempts = config.max_attempts,
            "agent runtime initialized"
        );
        Ok(Self::new(Arc::new(client), config.model.clone(), config.max_attempts))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_attempts(&self) -> u32 {
        self.controller.max_attempts()
    }

    /// Requirement understanding. Never fails; degrades to the fallback
    /// object after exhausting retries.
    pub async fn understand_user(&self, transcript: &mut Vec<ChatMessage>) -> UserUnderstanding {
        agents::understanding::understand_user(
            self.client.as_ref(),
            &self.controller,
            &self.model,
            transcript,
        )
        .await
    }

    /// Next-agent selection. Never fails; degrades to a restart decision
    /// after exhausting retries, so the conversation cannot get stuck.
    pub async fn select_next_agent(
        &self,
        transcript: &mut Vec<ChatMessage>,
    ) -> NextAgentDecision {
        agents::selector::select_next_agent(
            self.client.as_ref(),
            &self.controller,
            &self.model,
            transcript,
        )
        .await
    }

    /// Workflow design. Never fails; degenerates to the empty workflow after
    /// exhausting retries.
    pub async fn design_workflow(&self, transcript: &mut Vec<ChatMessage>) -> Workflow {
        agents::designer::design_workflow(
            self.client.as_ref(),
            &self.controller,
            &self.model,
            transcript,
        )
        .await
    }

    /// Free-text user response. The one raising surface: exhausted retries
    /// yield [`AgentError::Exhausted`] for the caller to handle.
    pub async fn respond_to_user(
        &self,
        transcript: &mut Vec<ChatMessage>,
    ) -> Result<String, AgentError> {
        agents::interface::respond_to_user(
            self.client.as_ref(),
            &self.controller,
            &self.model,
            transcript,
        )
        .await
    }
}
