// Storage module for Azure Blob Storage integration

pub mod blob_client;
pub mod sas;

pub use blob_client::BlobContainerClient;

use shared::crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("invalid blob endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to sign shared access signature: {0}")]
    Signing(#[from] CryptoError),
}
