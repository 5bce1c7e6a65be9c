//! Requirement-understanding agent: distills what the user wants, what they
//! already use, and whether the conversation knows enough to move forward.

use serde_json::{Map, Value};
use tracing::warn;

use weave_core::ChatMessage;

use crate::llm::InferenceClient;
use crate::recovery;
use crate::retry::{ExhaustionPolicy, RetryController};
use crate::schema::{field, FieldKind, Schema};

use super::{bool_field, list_field, text_field};

pub const EXHAUSTION_POLICY: ExhaustionPolicy = ExhaustionPolicy::DegradeToDefault;

pub const SCHEMA: Schema = &[
    field("user_understanding", FieldKind::Text),
    field("problem_understanding", FieldKind::Text),
    field("workflow_tech_understanding", FieldKind::Text),
    field("user_tech_list", FieldKind::TextList),
    field("required_tech_list", FieldKind::TextList),
    field("user_last_message_intent", FieldKind::Text),
    field("clarification_questions", FieldKind::TextList),
    field("is_user_clarification_needed", FieldKind::Bool),
    field("is_workflow_design_approved", FieldKind::Bool),
    field("is_workflow_build_approved", FieldKind::Bool),
    field("do_we_have_enough_information_to_develop_workflow", FieldKind::Bool),
    field("do_we_have_enough_information_to_design_workflow", FieldKind::Bool),
    field("do_we_have_enough_information_to_run_workflow", FieldKind::Bool),
];

const SYSTEM_PROMPT: &str = "\
You are the user understanding agent. Your name is Weave User Understanding Agent.
You receive messages from Weave users and other AI agents in the chat. Your
mission is to find out the user's intent and build up our understanding of
their needs until we know enough details to develop a workflow automation.

Weave is a platform that lets non-technical people automate their work with AI.
A workflow is a list of agents, each specialized in taking specific actions on
specific tech. These are macro units, e.g. a Gmail integration, a Slack
integration, an LLM API call. Do not overwhelm users with technical questions.

Later messages are more important: they are more likely to carry details about
the user's current intent. Use earlier messages for context only.

Respond with a JSON object with exactly these fields:
  user_understanding: string - their technical level, industry, experience
  problem_understanding: string - what they want to accomplish and for whom
  workflow_tech_understanding: string - their tech preference, or whether we decide for them
  user_tech_list: [string] - tech the user already has for this workflow
  required_tech_list: [string] - tech this problem needs (integrations, APIs, services)
  user_last_message_intent: string - what the latest message is doing
  clarification_questions: [string] - questions to ask the user
  is_user_clarification_needed: boolean
  is_workflow_design_approved: boolean
  is_workflow_build_approved: boolean
  do_we_have_enough_information_to_develop_workflow: boolean
  do_we_have_enough_information_to_design_workflow: boolean
  do_we_have_enough_information_to_run_workflow: boolean

Do not include any markdown. Do not include any other text. Do not include
```json```. The output must parse as JSON.";

const CORRECTIVE_HINT: &str =
    "Please provide your response in a clear format with key-value pairs.";

/// Typed reading of the understanding schema. Every field is always present
/// and shape-correct; callers never see a partial object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUnderstanding {
    pub user_understanding: String,
    pub problem_understanding: String,
    pub workflow_tech_understanding: String,
    pub user_tech_list: Vec<String>,
    pub required_tech_list: Vec<String>,
    pub user_last_message_intent: String,
    pub clarification_questions: Vec<String>,
    pub is_user_clarification_needed: bool,
    pub is_workflow_design_approved: bool,
    pub is_workflow_build_approved: bool,
    pub do_we_have_enough_information_to_develop_workflow: bool,
    pub do_we_have_enough_information_to_design_workflow: bool,
    pub do_we_have_enough_information_to_run_workflow: bool,
}

impl UserUnderstanding {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            user_understanding: text_field(fields, "user_understanding"),
            problem_understanding: text_field(fields, "problem_understanding"),
            workflow_tech_understanding: text_field(fields, "workflow_tech_understanding"),
            user_tech_list: list_field(fields, "user_tech_list"),
            required_tech_list: list_field(fields, "required_tech_list"),
            user_last_message_intent: text_field(fields, "user_last_message_intent"),
            clarification_questions: list_field(fields, "clarification_questions"),
            is_user_clarification_needed: bool_field(fields, "is_user_clarification_needed"),
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

    /// Hard-coded safe default returned after exhausting every attempt: the
    /// conversation degrades to asking the user to rephrase instead of
    /// getting stuck.
    pub fn fallback() -> Self {
        Self {
            user_understanding: "Error: Could not parse user understanding".to_string(),
            problem_understanding: "Error: Could not parse problem understanding".to_string(),
            workflow_tech_understanding: "Error: Could not parse workflow tech understanding"
                .to_string(),
            user_last_message_intent: "Error: Could not parse intent".to_string(),
            clarification_questions: vec!["Could you please rephrase your request?".to_string()],
            is_user_clarification_needed: true,
            ..Self::default()
        }
    }
}

pub async fn understand_user(
    client: &dyn InferenceClient,
    controller: &RetryController,
    model: &str,
    transcript: &mut Vec<ChatMessage>,
) -> UserUnderstanding {
    let outcome = controller
        .run(client, model, SYSTEM_PROMPT, transcript, CORRECTIVE_HINT, |response| {
            UserUnderstanding::from_fields(&recovery::normalize(response, SCHEMA))
        })
        .await;

    match outcome {
        Ok(understanding) => understanding,
        Err(error) => {
            warn!(
                event_name = "agent.understanding.exhausted",
                policy = ?EXHAUSTION_POLICY,
                error = %error,
                "understanding agent exhausted retries, returning fallback"
            );
            UserUnderstanding::fallback()
        }
    }
}
