//! Console chat transport.
//!
//! A local `ChatTransport` for running the bot without a chat network:
//! messages print to stdout with synthetic ids, attachments are saved
//! into a downloads directory.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use shufflebot_core::{Attachment, ChatTransport, MessageId, TransportError};

pub struct ConsoleTransport {
    downloads_dir: PathBuf,
    counter: AtomicU64,
}

impl ConsoleTransport {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> MessageId {
        format!("m{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Attachment path, prefixed with the message id so repeated downloads
    /// of the same file name never collide.
    fn attachment_path(&self, message_id: &str, file_name: &str) -> PathBuf {
        self.downloads_dir
            .join(format!("{}_{}", message_id, file_name))
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn send_message(
        &self,
        _channel: &str,
        text: &str,
    ) -> Result<MessageId, TransportError> {
        let id = self.next_id();
        println!("[{}] {}", id, text);
        Ok(id)
    }

    async fn edit_message(
        &self,
        _channel: &str,
        message: &MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        println!("[{} edited] {}", message, text);
        Ok(())
    }

    async fn delete_message(
        &self,
        _channel: &str,
        message: &MessageId,
    ) -> Result<(), TransportError> {
        println!("[{} deleted]", message);
        Ok(())
    }

    async fn send_attachment(
        &self,
        _channel: &str,
        text: &str,
        attachment: Attachment,
    ) -> Result<MessageId, TransportError> {
        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|e| TransportError::AttachmentRejected(e.to_string()))?;

        let id = self.next_id();
        let path = self.attachment_path(&id, &attachment.file_name);
        tokio::fs::write(&path, &attachment.bytes)
            .await
            .map_err(|e| TransportError::AttachmentRejected(e.to_string()))?;

        debug!("Attachment saved to {:?}", path);
        println!("[{}] {}\n[{}] 📎 saved to {}", id, text, id, path.display());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_message_ids_increment() {
        let dir = TempDir::new().unwrap();
        let transport = ConsoleTransport::new(dir.path());

        let first = transport.send_message("chan", "one").await.unwrap();
        let second = transport.send_message("chan", "two").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_attachment_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let transport = ConsoleTransport::new(dir.path());

        let id = transport
            .send_attachment(
                "chan",
                "here",
                Attachment {
                    file_name: "pic.jpg".to_string(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap();

        let path = dir.path().join(format!("{}_pic.jpg", id));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_same_file_name_does_not_collide() {
        let dir = TempDir::new().unwrap();
        let transport = ConsoleTransport::new(dir.path());

        let attachment = Attachment {
            file_name: "pic.jpg".to_string(),
            bytes: vec![1],
        };
        transport
            .send_attachment("chan", "a", attachment.clone())
            .await
            .unwrap();
        transport
            .send_attachment("chan", "b", attachment)
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
