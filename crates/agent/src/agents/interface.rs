//! Interface agent: free-text conversational responses to the user. No
//! structural schema, so there is nothing to normalize; the raw completion
//! passes straight through.
//!
//! This is the one agent that raises on exhaustion instead of degrading: its
//! output goes verbatim to the user, and a fabricated reply would be worse
//! than letting the caller decide what to show.

use weave_core::ChatMessage;

use crate::llm::InferenceClient;
use crate::retry::{AgentError, ExhaustionPolicy, RetryController};

pub const EXHAUSTION_POLICY: ExhaustionPolicy = ExhaustionPolicy::RaiseToCaller;

const SYSTEM_PROMPT: &str = "\
You are the Weave UI Agent.

Weave is an AI-powered automation platform that helps non-technical users
build and deploy enterprise-grade workflows using simple natural language.

What Weave makes:
- End-to-end automation workflows from user instructions
- AI agents that collect, summarize, format, and send information
- Automations that connect with tools like Gmail, Google Sheets, Notion,
  Slack, and more
- We support integrations, tools, APIs, services, and MCPs.

Your role:
- Understand the user's intent from plain English prompts
- Ask follow-up questions if the request is vague or incomplete
- Propose AI agents or integrations that match each step
- Confirm with the user before building and running workflows

Tone: clear, warm, empowering, and fast-moving. Make the user feel like they
have an army of AI agents helping them succeed, no code required.

If you're unsure, ask. If you're ready, build.";

const CORRECTIVE_HINT: &str = "Please fix your response and comply with the output schema.";

pub async fn respond_to_user(
    client: &dyn InferenceClient,
    controller: &RetryController,
    model: &str,
    transcript: &mut Vec<ChatMessage>,
) -> Result<String, AgentError> {
    controller
        .run(client, model, SYSTEM_PROMPT, transcript, CORRECTIVE_HINT, str::to_string)
        .await
}
