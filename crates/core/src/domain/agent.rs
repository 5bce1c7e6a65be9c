use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of agents the selection agent may route to.
///
/// The wire names are the snake_case strings the selection schema uses; any
/// value outside this set is corrected to [`AgentName::default`] during
/// post-validation, never surfaced to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    #[default]
    UserUnderstanding,
    UserInterface,
    WorkflowDesigner,
    WorkflowDeveloper,
    WorkflowRunner,
}

pub const VALID_AGENTS: [AgentName; 5] = [
    AgentName::UserUnderstanding,
    AgentName::UserInterface,
    AgentName::WorkflowDesigner,
    AgentName::WorkflowDeveloper,
    AgentName::WorkflowRunner,
];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown agent name `{0}`")]
pub struct UnknownAgentError(pub String);

impl AgentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserUnderstanding => "user_understanding",
            Self::UserInterface => "user_interface",
            Self::WorkflowDesigner => "workflow_designer",
            Self::WorkflowDeveloper => "workflow_developer",
            Self::WorkflowRunner => "workflow_runner",
        }
    }

    /// Comma-joined wire names, used in correction reasons.
    pub fn valid_set() -> String {
        VALID_AGENTS.iter().map(AgentName::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl std::str::FromStr for AgentName {
    type Err = UnknownAgentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "user_understanding" => Ok(Self::UserUnderstanding),
            "user_interface" => Ok(Self::UserInterface),
            "workflow_designer" => Ok(Self::WorkflowDesigner),
            "workflow_developer" => Ok(Self::WorkflowDeveloper),
            "workflow_runner" => Ok(Self::WorkflowRunner),
            other => Err(UnknownAgentError(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentName, VALID_AGENTS};

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for agent in VALID_AGENTS {
            let parsed: AgentName = agent.as_str().parse().expect("wire name should parse");
            assert_eq!(parsed, agent);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("workflow_builder".parse::<AgentName>().is_err());
        assert!("".parse::<AgentName>().is_err());
    }

    #[test]
    fn default_agent_is_user_understanding() {
        assert_eq!(AgentName::default(), AgentName::UserUnderstanding);
    }

    #[test]
    fn valid_set_lists_every_agent() {
        let listed = AgentName::valid_set();
        for agent in VALID_AGENTS {
            assert!(listed.contains(agent.as_str()));
        }
    }
}
