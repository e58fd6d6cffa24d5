//! Trait definitions for the chat platform.

use async_trait::async_trait;

use super::error::ChatError;

/// Outbound half of one submission's conversation with its submitter.
///
/// The initial acknowledgement has already been posted when a session is
/// created; every call here edits, follows up on, or retracts it.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Mention string addressing the submitter.
    fn mention(&self) -> String;

    /// Replaces the text of the initial acknowledgement.
    async fn update_status(&self, text: &str) -> Result<(), ChatError>;

    /// Posts the final result with the rendered file attached.
    async fn post_result(
        &self,
        text: &str,
        file: Vec<u8>,
        file_name: &str,
    ) -> Result<(), ChatError>;

    /// Deletes the initial acknowledgement.
    async fn retract_ack(&self) -> Result<(), ChatError>;
}
