pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;

pub use domain::agent::{AgentName, UnknownAgentError, VALID_AGENTS};
pub use domain::chat::{Chat, ChatId, MessageId, StoredMessage, User, UserId};
pub use domain::message::{ChatMessage, Role};
pub use domain::workflow::{Workflow, WorkflowStep};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{Stage, StageContext, StageFlow, StageTransitionError, TransitionOutcome};

pub use chrono;
