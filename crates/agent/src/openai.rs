//! Chat-completions client for OpenAI-compatible providers.
//!
//! OpenAI, Anthropic's compatibility endpoint, and Ollama all speak the same
//! `/chat/completions` wire format, so one client covers every provider the
//! configuration accepts. Responses are requested non-streaming; agents only
//! ever consume whole completions.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use weave_core::config::{LlmConfig, LlmProvider};
use weave_core::ChatMessage;

use crate::llm::{InferenceClient, InferenceError};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

pub struct OpenAiCompatClient {
    http: reqwest::Client,
    chat_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            chat_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, InferenceError> {
        let base_url = config.base_url.as_deref().unwrap_or(match config.provider {
            LlmProvider::OpenAi => OPENAI_BASE_URL,
            LlmProvider::Anthropic => ANTHROPIC_BASE_URL,
            // config validation guarantees a base_url for ollama
            LlmProvider::Ollama => OPENAI_BASE_URL,
        });

        let api_key = config.api_key.as_ref().map(|key| key.expose_secret().to_string());
        Self::new(base_url, api_key, config.timeout_secs)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl InferenceClient for OpenAiCompatClient {
    async fn run_inference(
        &self,
        transcript: &[ChatMessage],
        model: &str,
    ) -> Result<String, InferenceError> {
        let mut request = self
            .http
            .post(&self.chat_url)
            .json(&ChatCompletionRequest { model, messages: transcript });

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Provider { status: status.as_u16(), body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InferenceError::EmptyCompletion)
    }
}
