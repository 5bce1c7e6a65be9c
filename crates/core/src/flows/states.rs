use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentName;

/// Conversation stage of the workflow-building flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Understanding,
    Interface,
    Design,
    Development,
    Run,
}

impl Stage {
    /// Stage each routable agent operates in.
    pub fn for_agent(agent: AgentName) -> Self {
        match agent {
            AgentName::UserUnderstanding => Self::Understanding,
            AgentName::UserInterface => Self::Interface,
            AgentName::WorkflowDesigner => Self::Design,
            AgentName::WorkflowDeveloper => Self::Development,
            AgentName::WorkflowRunner => Self::Run,
        }
    }
}

/// Readiness flags carried by every selection result. Field names match the
/// selection schema so the orchestration loop can overlay them directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContext {
    pub is_workflow_design_approved: bool,
    pub is_workflow_build_approved: bool,
    pub do_we_have_enough_information_to_develop_workflow: bool,
    pub do_we_have_enough_information_to_design_workflow: bool,
    pub do_we_have_enough_information_to_run_workflow: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: Stage,
    pub to: Stage,
}
