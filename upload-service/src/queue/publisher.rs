use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[cfg(test)]
use mockall::automock;

use super::QueueError;

/// A named queue accepting opaque, base64-safe text messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Send one message. Returns only once the backend confirmed the send.
    async fn send_message(&self, message_text: &str) -> Result<(), QueueError>;
}

/// Encode an object reference as queue message text (base64 of the raw bytes)
pub fn encode_message(object_reference: &str) -> String {
    STANDARD.encode(object_reference.as_bytes())
}

/// Publish a reference to an uploaded object for downstream processing
pub async fn publish_object_reference(
    queue: &dyn MessageQueue,
    object_reference: &str,
) -> Result<(), QueueError> {
    queue.send_message(&encode_message(object_reference)).await?;

    tracing::info!(object = %object_reference, "Published object reference to processing queue");

    Ok(())
}
