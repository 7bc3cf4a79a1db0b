//! Photo processing queue

pub mod azure;
pub mod publisher;

pub use azure::AzureQueueClient;
pub use publisher::MessageQueue;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("queue service rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid queue endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("message text is not base64: {0}")]
    InvalidMessage(String),

    #[error("failed to build queue request: {0}")]
    Request(#[from] http::Error),

    #[error("failed to sign queue request: {0}")]
    Signing(String),
}
