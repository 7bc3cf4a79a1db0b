//! Cryptographic utilities for the event photo services
//!
//! Provides the HMAC-SHA256 primitives used by Azure Storage Shared Key
//! authorization and shared access signatures

pub mod signing;

pub use signing::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
