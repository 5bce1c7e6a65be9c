//! Workflow-design agent: turns the gathered requirements into an ordered
//! list of workflow steps, each naming the integrations it needs.

use tracing::warn;

use weave_core::{ChatMessage, Workflow};

use crate::llm::InferenceClient;
use crate::recovery;
use crate::retry::{ExhaustionPolicy, RetryController};

pub const EXHAUSTION_POLICY: ExhaustionPolicy = ExhaustionPolicy::DegradeToDefault;

const SYSTEM_PROMPT: &str = "\
You are the workflow designer agent. Your name is Weave Workflow Designer
Agent. Your task is to design workflow steps based on user requirements and
available integrations.

Each workflow step must be a JSON object with:
- label: a short, clear label for the step (e.g., \"Read Leads Data\")
- description: a brief description of what the step does
- integrations: a list of required integrations (e.g., [\"google-sheets\"])

The output is a JSON array of workflow steps. Each step should be a complete,
self-contained unit that can be executed independently.

Example output:
[
    {
        \"label\": \"Read Leads Data\",
        \"description\": \"Reads leads data from Google Sheets\",
        \"integrations\": [\"google-sheets\"]
    },
    {
        \"label\": \"Process Leads\",
        \"description\": \"Processes and validates lead information\",
        \"integrations\": [\"openai\"]
    }
]

Available integrations - everything we can connect to, including tools, APIs,
services, and MCPs:
google-sheets, gmail, slack, discord, notion, airtable, zapier, webhook,
http, smtp, openai, anthropic, vapi, mcp

Do not include any markdown. Do not include any other text. Do not include
```json```. The output must parse as JSON.";

const CORRECTIVE_HINT: &str =
    "Please provide your response in a clear format with workflow steps.";

/// Design a workflow from the conversation so far. Step order is execution
/// order and is preserved from the model output. Exhausted retries and
/// unrecoverable output both degenerate to the empty workflow.
pub async fn design_workflow(
    client: &dyn InferenceClient,
    controller: &RetryController,
    model: &str,
    transcript: &mut Vec<ChatMessage>,
) -> Workflow {
    let outcome = controller
        .run(client, model, SYSTEM_PROMPT, transcript, CORRECTIVE_HINT, |response| {
            Workflow::new(recovery::normalize_steps(response))
        })
        .await;

    match outcome {
        Ok(workflow) => workflow,
        Err(error) => {
            warn!(
                event_name = "agent.designer.exhausted",
                policy = ?EXHAUSTION_POLICY,
                error = %error,
                "designer agent exhausted retries, returning empty workflow"
            );
            Workflow::default()
        }
    }
}
