//! Subset of Discord's interaction payloads the bot reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interaction type: endpoint health check.
pub const INTERACTION_PING: u8 = 1;
/// Interaction type: application command invocation.
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Command type: slash command.
pub const COMMAND_CHAT_INPUT: u8 = 1;
/// Command type: user context menu.
pub const COMMAND_USER: u8 = 2;
/// Command type: message context menu.
pub const COMMAND_MESSAGE: u8 = 3;

/// Response type: acknowledge a ping.
pub const RESPONSE_PONG: u8 = 1;
/// Response type: reply with a message.
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;

/// Message flag: only visible to the invoking user.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<CommandData>,
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Present when invoked in a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present when invoked outside a guild.
    #[serde(default)]
    pub user: Option<User>,
}

impl Interaction {
    /// The user who invoked the interaction.
    pub fn invoking_user(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(rename = "type", default = "default_command_type")]
    pub kind: u8,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub resolved: Resolved,
    /// Target user or message of a context-menu command.
    #[serde(default)]
    pub target_id: Option<String>,
}

fn default_command_type() -> u8 {
    COMMAND_CHAT_INPUT
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| v.as_str())
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(|v| v.as_bool())
    }
}

/// Finds an option by name.
pub fn find_option<'a>(options: &'a [CommandOption], name: &str) -> Option<&'a CommandOption> {
    options.iter().find(|o| o.name == name)
}

/// Entities referenced by the command's options, keyed by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default)]
    pub members: HashMap<String, Member>,
    #[serde(default)]
    pub attachments: HashMap<String, Attachment>,
    #[serde(default)]
    pub messages: HashMap<String, Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Guild member. Resolved members carry no `user`; it sits in
/// `Resolved::users` under the same id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub user: Option<User>,
    /// Guild-specific avatar hash.
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Body returned from the interactions endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// Public reply; this is the initial acknowledgement later edited
    /// through the interaction webhook.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(ResponseMessage {
                content: content.into(),
                flags: None,
            }),
        }
    }

    /// Reply only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(ResponseMessage {
                content: content.into(),
                flags: Some(FLAG_EPHEMERAL),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serialization() {
        let pong = serde_json::to_value(InteractionResponse::pong()).unwrap();
        assert_eq!(pong, serde_json::json!({ "type": 1 }));

        let reply = serde_json::to_value(InteractionResponse::ephemeral("nope")).unwrap();
        assert_eq!(
            reply,
            serde_json::json!({ "type": 4, "data": { "content": "nope", "flags": 64 } })
        );
    }

    #[test]
    fn test_invoking_user_prefers_member() {
        let interaction: Interaction = serde_json::from_value(serde_json::json!({
            "id": "1",
            "application_id": "2",
            "type": 2,
            "token": "t",
            "member": { "user": { "id": "10", "username": "guild" } },
        }))
        .unwrap();
        assert_eq!(interaction.invoking_user().unwrap().id, "10");

        let dm: Interaction = serde_json::from_value(serde_json::json!({
            "id": "1",
            "application_id": "2",
            "type": 2,
            "token": "t",
            "user": { "id": "11", "username": "dm" },
        }))
        .unwrap();
        assert_eq!(dm.invoking_user().unwrap().id, "11");
    }
}
