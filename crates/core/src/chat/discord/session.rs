//! `ChatSession` bound to one Discord interaction.

use async_trait::async_trait;

use super::client::DiscordClient;
use crate::chat::{ChatError, ChatSession};

/// Reports back through the webhook of a single interaction.
///
/// Interaction tokens stay valid for 15 minutes; the original response
/// can be edited or deleted through them for that long.
#[derive(Debug, Clone)]
pub struct DiscordSession {
    client: DiscordClient,
    interaction_token: String,
    user_id: String,
}

impl DiscordSession {
    pub fn new(
        client: DiscordClient,
        interaction_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            interaction_token: interaction_token.into(),
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl ChatSession for DiscordSession {
    fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }

    async fn update_status(&self, text: &str) -> Result<(), ChatError> {
        self.client
            .edit_original(&self.interaction_token, text)
            .await
    }

    async fn post_result(
        &self,
        text: &str,
        file: Vec<u8>,
        file_name: &str,
    ) -> Result<(), ChatError> {
        self.client
            .create_followup(&self.interaction_token, text, &file, file_name)
            .await
    }

    async fn retract_ack(&self) -> Result<(), ChatError> {
        self.client.delete_original(&self.interaction_token).await
    }
}
