use serde::{Deserialize, Serialize};

/// Conversation participant as understood by the model inference API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One entry of a conversation transcript.
///
/// A transcript is a `Vec<ChatMessage>` owned by the orchestration loop. It
/// is append-only during an agent run: retries push corrective assistant
/// messages onto it, nothing ever rewrites or removes prior entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, Role};

    #[test]
    fn roles_serialize_to_snake_case_wire_names() {
        let message = ChatMessage::assistant("ok");
        let json = serde_json::to_value(&message).expect("serialize message");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }

    #[test]
    fn role_wire_names_match_as_str() {
        for role in [Role::System, Role::User, Role::Assistant] {
            let encoded = serde_json::to_value(role).expect("serialize role");
            assert_eq!(encoded, role.as_str());
        }
    }
}
