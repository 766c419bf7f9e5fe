//! Types for the chat transport seam.

use async_trait::async_trait;
use thiserror::Error;

/// Opaque message identifier assigned by the transport.
pub type MessageId = String;

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Errors from transport operations.
///
/// Transport failures never abort a search; callers log and move on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    #[error("Failed to edit message {0}")]
    EditFailed(MessageId),

    #[error("Failed to delete message {0}")]
    DeleteFailed(MessageId),

    #[error("Attachment rejected: {0}")]
    AttachmentRejected(String),
}

/// Trait for chat backends.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// Send a text message, returning its id for later edits.
    async fn send_message(&self, channel: &str, text: &str)
        -> Result<MessageId, TransportError>;

    /// Replace the text of a previously sent message.
    async fn edit_message(
        &self,
        channel: &str,
        message: &MessageId,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Delete a previously sent message.
    async fn delete_message(&self, channel: &str, message: &MessageId)
        -> Result<(), TransportError>;

    /// Send a message with a file attached.
    async fn send_attachment(
        &self,
        channel: &str,
        text: &str,
        attachment: Attachment,
    ) -> Result<MessageId, TransportError>;
}
