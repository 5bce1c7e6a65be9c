//! Agent layer - the response contract between weave and its language model
//!
//! This crate is the core of the weave system. Every agent call sends a
//! conversation transcript to a model and gets back free-form text that is
//! *supposed* to be JSON matching a fixed schema, but is not guaranteed to
//! be. This crate deterministically recovers a typed result anyway:
//!
//! 1. **Invocation** (`llm`, `openai`) - prepend the agent's system prompt
//!    and call the inference collaborator; transport failures surface as
//!    opaque `InferenceError`s.
//! 2. **Normalization** (`schema`, `recovery`) - an ordered chain of
//!    recovery strategies (direct JSON, fence stripping, balanced-span
//!    extraction, line scraping, schema defaults) that always yields a
//!    fully-populated object. Parse failures never leave this layer.
//! 3. **Bounded retry** (`retry`) - up to a configured number of sequential
//!    attempts, each appending a corrective message to the caller-owned
//!    transcript; exhaustion degrades to a per-agent safe fallback or, for
//!    the free-text agent only, raises.
//! 4. **Agent definitions** (`agents`) - the four (prompt, schema,
//!    post-validation, exhaustion policy) tuples: requirement understanding,
//!    next-agent selection, workflow design, and the conversational
//!    interface.
//!
//! # Contract
//!
//! Structured call surfaces always return schema-complete values. Callers
//! never implement fallback parsing of their own.

pub mod agents;
pub mod llm;
pub mod openai;
pub mod recovery;
pub mod retry;
pub mod runtime;
pub mod schema;

pub use agents::{NextAgentDecision, UserUnderstanding};
pub use llm::{InferenceClient, InferenceError};
pub use retry::{AgentError, ExhaustionPolicy, RetryController};
pub use runtime::AgentRuntime;
