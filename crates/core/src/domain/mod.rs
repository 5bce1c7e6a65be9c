pub mod agent;
pub mod chat;
pub mod message;
pub mod workflow;
