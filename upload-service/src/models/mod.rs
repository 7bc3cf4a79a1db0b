use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-limited, create/write-only capability for one blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub object_name: String,
    /// Object URL carrying the SAS query; unusable after `expires_at`
    pub upload_url: String,
    /// Stable reference to the object, later handed to `POST /queue`
    pub object_url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSasQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSasResponse {
    pub upload_url: String,
    pub blob_url: String,
}

impl From<UploadGrant> for GenerateSasResponse {
    fn from(grant: UploadGrant) -> Self {
        Self {
            upload_url: grant.upload_url,
            blob_url: grant.object_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueRequest {
    pub blob_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnqueueResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
