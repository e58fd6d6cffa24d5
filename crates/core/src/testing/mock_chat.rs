//! Mock chat session for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::chat::{ChatError, ChatSession};

/// Something a session was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Status(String),
    Result {
        text: String,
        file_name: String,
        size: usize,
    },
    Retracted,
}

/// Mock implementation of the ChatSession trait.
///
/// Records every outbound call in order. Status updates can be made to
/// fail, which the pipeline must tolerate.
#[derive(Debug, Clone)]
pub struct MockChatSession {
    user: String,
    events: Arc<RwLock<Vec<ChatEvent>>>,
    fail_updates: Arc<RwLock<bool>>,
    fail_results: Arc<RwLock<bool>>,
}

impl MockChatSession {
    /// Create a session for the named submitter.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            events: Arc::new(RwLock::new(Vec::new())),
            fail_updates: Arc::new(RwLock::new(false)),
            fail_results: Arc::new(RwLock::new(false)),
        }
    }

    /// Get all recorded events.
    pub async fn events(&self) -> Vec<ChatEvent> {
        self.events.read().await.clone()
    }

    /// Texts passed to `update_status`, in order.
    pub async fn statuses(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Status(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The result post, if one was made.
    pub async fn result(&self) -> Option<ChatEvent> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| matches!(e, ChatEvent::Result { .. }))
            .cloned()
    }

    /// Whether the acknowledgement was retracted.
    pub async fn was_retracted(&self) -> bool {
        self.events.read().await.contains(&ChatEvent::Retracted)
    }

    /// Make status updates fail (they are still recorded).
    pub async fn set_fail_updates(&self, fail: bool) {
        *self.fail_updates.write().await = fail;
    }

    /// Make result posts fail (they are still recorded).
    pub async fn set_fail_results(&self, fail: bool) {
        *self.fail_results.write().await = fail;
    }
}

#[async_trait]
impl ChatSession for MockChatSession {
    fn mention(&self) -> String {
        format!("<@{}>", self.user)
    }

    async fn update_status(&self, text: &str) -> Result<(), ChatError> {
        self.events
            .write()
            .await
            .push(ChatEvent::Status(text.to_string()));
        if *self.fail_updates.read().await {
            return Err(ChatError::other("mock status failure"));
        }
        Ok(())
    }

    async fn post_result(
        &self,
        text: &str,
        file: Vec<u8>,
        file_name: &str,
    ) -> Result<(), ChatError> {
        self.events.write().await.push(ChatEvent::Result {
            text: text.to_string(),
            file_name: file_name.to_string(),
            size: file.len(),
        });
        if *self.fail_results.read().await {
            return Err(ChatError::other("mock upload failure"));
        }
        Ok(())
    }

    async fn retract_ack(&self) -> Result<(), ChatError> {
        self.events.write().await.push(ChatEvent::Retracted);
        Ok(())
    }
}
