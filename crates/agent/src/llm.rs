use async_trait::async_trait;
use thiserror::Error;

use weave_core::ChatMessage;

/// Transport-level inference failure.
///
/// The invoker never interprets these; the retry controller decides whether
/// to try again or fall back.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("inference provider returned status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("inference provider returned an empty completion")]
    EmptyCompletion,
}

/// Black-box model inference collaborator.
///
/// Implementations send the transcript to a model and hand back raw text.
/// The text is *supposed* to be JSON matching the calling agent's schema,
/// but nothing here guarantees that; recovery is the normalizer's job.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn run_inference(
        &self,
        transcript: &[ChatMessage],
        model: &str,
    ) -> Result<String, InferenceError>;
}

/// One agent invocation: prepend the agent's fixed system prompt and
/// delegate. No caching, no retries, pure pass-through.
pub async fn invoke(
    client: &dyn InferenceClient,
    system_prompt: &str,
    transcript: &[ChatMessage],
    model: &str,
) -> Result<String, InferenceError> {
    let mut full_transcript = Vec::with_capacity(transcript.len() + 1);
    full_transcript.push(ChatMessage::system(system_prompt));
    full_transcript.extend_from_slice(transcript);
    client.run_inference(&full_transcript, model).await
}
