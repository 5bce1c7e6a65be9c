//! Next-agent-selection agent: decides which specialized agent handles the
//! next turn, plus the readiness flags the stage flow gates on.
//!
//! This is the one agent with post-validation beyond normalization: an agent
//! name outside the closed set is rewritten to the default agent, with the
//! reason replaced by a message naming the valid set. The correction runs
//! even when the model produced a perfectly well-formed object.

use serde_json::{Map, Value};
use tracing::warn;

use weave_core::{AgentName, ChatMessage, StageContext};

use crate::llm::InferenceClient;
use crate::recovery;
use crate::retry::{ExhaustionPolicy, RetryController};
use crate::schema::{field, FieldKind, Schema};

use super::{bool_field, text_field};

pub const EXHAUSTION_POLICY: ExhaustionPolicy = ExhaustionPolicy::DegradeToDefault;

pub const SCHEMA: Schema = &[
    field("next_agent", FieldKind::Text),
    field("reason", FieldKind::Text),
    field("is_workflow_design_approved", FieldKind::Bool),
    field("is_workflow_build_approved", FieldKind::Bool),
    field("do_we_have_enough_information_to_develop_workflow", FieldKind::Bool),
    field("do_we_have_enough_information_to_design_workflow", FieldKind::Bool),
    field("do_we_have_enough_information_to_run_workflow", FieldKind::Bool),
];

const SYSTEM_PROMPT: &str = "\
You are the next agent selector. Your name is Weave Next Agent Selector.
Your task is to determine which agent should handle the next step in the
workflow development process.

Available agents:
1. user_understanding - for understanding user requirements and intent
2. user_interface - for user interaction and personalized responses
3. workflow_designer - for designing the workflow steps
4. workflow_developer - for developing the workflow implementation
5. workflow_runner - for running and testing the workflow

The process follows this sequence:
1. User Understanding -> User Interface -> Workflow Design
2. Workflow Design -> Workflow Development (when the design is complete and approved)
3. Workflow Development -> Workflow Running (when the build is complete and approved)

TRANSITION RULES:
- If workflow_designer has completed its work (workflow steps are visible in
  the messages), AND is_workflow_design_approved is true, AND
  do_we_have_enough_information_to_develop_workflow is true, you MUST select
  workflow_developer as the next agent.

Return a JSON object with:
- next_agent: the name of the next agent
- reason: a brief explanation of why this agent was chosen
- is_workflow_design_approved: boolean
- is_workflow_build_approved: boolean
- do_we_have_enough_information_to_develop_workflow: boolean
- do_we_have_enough_information_to_design_workflow: boolean
- do_we_have_enough_information_to_run_workflow: boolean

Do not include any markdown. Do not include any other text. Do not include
```json```. The output must parse as JSON.";

const CORRECTIVE_HINT: &str =
    "Please provide your response in a clear format with the next agent and state information.";

/// Typed selection result. `next_agent` is always a member of the closed set;
/// invalid model output never reaches the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextAgentDecision {
    pub next_agent: AgentName,
    pub reason: String,
    pub is_workflow_design_approved: bool,
    pub is_workflow_build_approved: bool,
    pub do_we_have_enough_information_to_develop_workflow: bool,
    pub do_we_have_enough_information_to_design_workflow: bool,
    pub do_we_have_enough_information_to_run_workflow: bool,
}

impl NextAgentDecision {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let raw_agent = text_field(fields, "next_agent");
        let (next_agent, reason) = match raw_agent.parse::<AgentName>() {
            Ok(agent) => (agent, text_field(fields, "reason")),
            Err(_) => (
                AgentName::default(),
                format!(
                    "Invalid agent specified, defaulting to {}. Valid agents are: {}",
                    AgentName::default(),
                    AgentName::valid_set()
                ),
            ),
        };

        Self {
            next_agent,
            reason,
            is_workflow_design_approved: bool_field(fields, "is_workflow_design_approved"),
            is_workflow_build_approved: bool_field(fields, "is_workflow_build_approved"),
            do_we_have_enough_information_to_develop_workflow: bool_field(
                fields,
                "do_we_have_enough_information_to_develop_workflow",
            ),
            do_we_have_enough_information_to_design_workflow: bool_field(
                fields,
                "do_we_have_enough_information_to_design_workflow",
            ),
            do_we_have_enough_information_to_run_workflow: bool_field(
                fields,
                "do_we_have_enough_information_to_run_workflow",
            ),
        }
    }

    /// Hard-coded safe default after exhausting every attempt: route back to
    /// understanding so the conversation restarts instead of stalling.
    pub fn fallback() -> Self {
        Self {
            next_agent: AgentName::default(),
            reason: "Error occurred, defaulting to user understanding".to_string(),
            is_workflow_design_approved: false,
            is_workflow_build_approved: false,
            do_we_have_enough_information_to_develop_workflow: false,
            do_we_have_enough_information_to_design_workflow: false,
            do_we_have_enough_information_to_run_workflow: false,
        }
    }

    /// Readiness flags in the shape the stage flow engine consumes.
    pub fn stage_context(&self) -> StageContext {
        StageContext {
            is_workflow_design_approved: self.is_workflow_design_approved,
            is_workflow_build_approved: self.is_workflow_build_approved,
            do_we_have_enough_information_to_develop_workflow: self
                .do_we_have_enough_information_to_develop_workflow,
            do_we_have_enough_information_to_design_workflow: self
                .do_we_have_enough_information_to_design_workflow,
            do_we_have_enough_information_to_run_workflow: self
                .do_we_have_enough_information_to_run_workflow,
        }
    }
}

pub async fn select_next_agent(
    client: &dyn InferenceClient,
    controller: &RetryController,
    model: &str,
    transcript: &mut Vec<ChatMessage>,
) -> NextAgentDecision {
    let outcome = controller
        .run(client, model, SYSTEM_PROMPT, transcript, CORRECTIVE_HINT, |response| {
            NextAgentDecision::from_fields(&recovery::normalize(response, SCHEMA))
        })
        .await;

    match outcome {
        Ok(decision) => decision,
        Err(error) => {
            warn!(
                event_name = "agent.selector.exhausted",
                policy = ?EXHAUSTION_POLICY,
                error = %error,
                "selection agent exhausted retries, returning fallback"
            );
            NextAgentDecision::fallback()
        }
    }
}
