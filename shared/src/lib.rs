//! Shared utilities for the event photo backend services

// Re-export common dependencies
pub use thiserror;
pub use tracing;

pub mod crypto;
pub mod observability;
