//! Mock chat transport for testing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{Attachment, ChatTransport, MessageId, TransportError};

/// A message recorded by the mock transport.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub id: MessageId,
    pub channel: String,
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// An edit recorded by the mock transport.
#[derive(Debug, Clone)]
pub struct EditedMessage {
    pub id: MessageId,
    pub channel: String,
    pub text: String,
}

/// Mock implementation of the `ChatTransport` trait.
///
/// Records every send/edit/delete for assertions and can simulate a
/// failing send.
#[derive(Default)]
pub struct MockTransport {
    counter: AtomicU64,
    sent: Mutex<Vec<SentMessage>>,
    edits: Mutex<Vec<EditedMessage>>,
    deleted: Mutex<Vec<MessageId>>,
    fail_next_send: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send fail with a transport error.
    pub fn fail_next_send(&self) {
        self.fail_next_send.store(true, Ordering::SeqCst);
    }

    /// All messages sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// All edits performed so far.
    pub fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().unwrap().clone()
    }

    /// All deleted message ids.
    pub fn deleted(&self) -> Vec<MessageId> {
        self.deleted.lock().unwrap().clone()
    }

    /// Text of the most recent send or edit, if any.
    pub fn last_text(&self) -> Option<String> {
        let edits = self.edits.lock().unwrap();
        if let Some(edit) = edits.last() {
            return Some(edit.text.clone());
        }
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }

    fn next_id(&self) -> MessageId {
        format!("msg-{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_message(
        &self,
        channel: &str,
        text: &str,
    ) -> Result<MessageId, TransportError> {
        if self.fail_next_send.swap(false, Ordering::SeqCst) {
            return Err(TransportError::SendFailed("injected failure".to_string()));
        }
        let id = self.next_id();
        self.sent.lock().unwrap().push(SentMessage {
            id: id.clone(),
            channel: channel.to_string(),
            text: text.to_string(),
            attachment: None,
        });
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: &str,
        message: &MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.edits.lock().unwrap().push(EditedMessage {
            id: message.clone(),
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        _channel: &str,
        message: &MessageId,
    ) -> Result<(), TransportError> {
        self.deleted.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn send_attachment(
        &self,
        channel: &str,
        text: &str,
        attachment: Attachment,
    ) -> Result<MessageId, TransportError> {
        if self.fail_next_send.swap(false, Ordering::SeqCst) {
            return Err(TransportError::SendFailed("injected failure".to_string()));
        }
        let id = self.next_id();
        self.sent.lock().unwrap().push(SentMessage {
            id: id.clone(),
            channel: channel.to_string(),
            text: text.to_string(),
            attachment: Some(attachment),
        });
        Ok(id)
    }
}
