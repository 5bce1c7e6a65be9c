pub mod engine;
pub mod states;

pub use engine::{StageFlow, StageTransitionError};
pub use states::{Stage, StageContext, TransitionOutcome};
