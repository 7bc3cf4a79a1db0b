// Azure Blob Storage container client

use chrono::{DateTime, Duration, SubsecRound, Utc};
use shared::crypto::AccountKey;
use url::Url;

use super::sas::{BlobSas, BlobSasPermissions};
use super::StorageError;
use crate::config::StorageConfig;
use crate::models::UploadGrant;

/// Lifetime of an upload grant
pub const UPLOAD_GRANT_TTL_SECS: i64 = 60 * 60;

/// Handle on one blob container, able to mint upload URLs for blobs inside it.
///
/// Holds no mutable state; one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct BlobContainerClient {
    account_name: String,
    account_key: AccountKey,
    endpoint: String,
    container: String,
}

impl BlobContainerClient {
    pub fn new(storage: &StorageConfig, container: &str) -> Result<Self, StorageError> {
        Url::parse(&storage.blob_endpoint).map_err(|e| StorageError::InvalidEndpoint {
            endpoint: storage.blob_endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            account_name: storage.account_name.clone(),
            account_key: storage.account_key.clone(),
            endpoint: storage.blob_endpoint.trim_end_matches('/').to_string(),
            container: container.to_string(),
        })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Stable, non-expiring URL of a blob in this container
    pub fn blob_url(&self, blob_name: &str) -> Result<String, StorageError> {
        if blob_name.is_empty() {
            return Err(StorageError::InvalidObjectName(
                "object name must not be empty".to_string(),
            ));
        }

        Ok(format!(
            "{}/{}/{}",
            self.endpoint,
            self.container,
            encode_blob_path(blob_name)
        ))
    }

    /// Mint a create/write grant for `blob_name`, valid for one hour from now
    pub fn generate_upload_grant(&self, blob_name: &str) -> Result<UploadGrant, StorageError> {
        self.generate_upload_grant_at(blob_name, Utc::now())
    }

    /// Mint a grant as of `issued_at`. Expiry is exactly one hour after the
    /// issuance second, matching the second precision of the signed `se` field.
    pub fn generate_upload_grant_at(
        &self,
        blob_name: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<UploadGrant, StorageError> {
        let object_url = self.blob_url(blob_name)?;
        let expires_at = issued_at.trunc_subsecs(0) + Duration::seconds(UPLOAD_GRANT_TTL_SECS);

        let sas = BlobSas {
            account_name: &self.account_name,
            container: &self.container,
            blob_name,
            permissions: BlobSasPermissions::create_write(),
            expires_on: expires_at,
        };
        let query = sas.to_query(&self.account_key)?;

        tracing::debug!(
            container = %self.container,
            blob = %blob_name,
            expires_at = %expires_at,
            "Issued upload grant"
        );

        Ok(UploadGrant {
            object_name: blob_name.to_string(),
            upload_url: format!("{}?{}", object_url, query),
            object_url,
            expires_at,
        })
    }
}

/// Percent-encode each path segment of a blob name, keeping `/` separators
fn encode_blob_path(blob_name: &str) -> String {
    blob_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CONTAINER_NAME};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn client() -> BlobContainerClient {
        let config = Config::from_lookup(|name| match name {
            "AZURE_STORAGE_ACCOUNT_NAME" => Some("photosacct".to_string()),
            "AZURE_STORAGE_ACCOUNT_KEY" => Some("dGVzdC1hY2NvdW50LWtleQ==".to_string()),
            _ => None,
        })
        .unwrap();
        BlobContainerClient::new(&config.storage, CONTAINER_NAME).unwrap()
    }

    fn query_param(url: &str, name: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        parsed
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_blob_url() {
        let client = client();
        assert_eq!(
            client.blob_url("photo1.jpg").unwrap(),
            "https://photosacct.blob.core.windows.net/event-photos/photo1.jpg"
        );
        assert_eq!(
            client.blob_url("day 1/party #2.jpg").unwrap(),
            "https://photosacct.blob.core.windows.net/event-photos/day%201/party%20%232.jpg"
        );
        assert!(matches!(client.blob_url(""), Err(StorageError::InvalidObjectName(_))));
    }

    #[test]
    fn test_grant_expires_one_hour_after_issue() {
        let issued_at = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
            + Duration::milliseconds(250);
        let grant = client().generate_upload_grant_at("photo1.jpg", issued_at).unwrap();

        assert_eq!(
            grant.expires_at,
            Utc.with_ymd_and_hms(2026, 10, 18, 13, 0, 0).unwrap()
        );
        assert_eq!(
            query_param(&grant.upload_url, "se").as_deref(),
            Some("2026-10-18T13:00:00Z")
        );
    }

    #[test]
    fn test_grant_is_create_write_only() {
        let grant = client().generate_upload_grant("photo1.jpg").unwrap();
        let permissions = query_param(&grant.upload_url, "sp").unwrap();

        assert_eq!(permissions, "cw");
        for forbidden in ['r', 'l', 'd'] {
            assert!(!permissions.contains(forbidden));
        }
        assert_eq!(query_param(&grant.upload_url, "sr").as_deref(), Some("b"));
        assert!(query_param(&grant.upload_url, "sig").is_some());
    }

    #[test]
    fn test_grant_targets_its_object_url() {
        let grant = client().generate_upload_grant("photo1.jpg").unwrap();

        assert_eq!(grant.object_name, "photo1.jpg");
        assert!(grant.upload_url.starts_with(&format!("{}?", grant.object_url)));
        assert!(grant.expires_at > Utc::now());
    }

    #[test]
    fn test_empty_name_issues_no_grant() {
        assert!(matches!(
            client().generate_upload_grant(""),
            Err(StorageError::InvalidObjectName(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = Config::from_lookup(|name| match name {
            "AZURE_STORAGE_ACCOUNT_NAME" => Some("photosacct".to_string()),
            "AZURE_STORAGE_ACCOUNT_KEY" => Some("dGVzdC1hY2NvdW50LWtleQ==".to_string()),
            _ => None,
        })
        .unwrap();
        config.storage.blob_endpoint = "not a url".to_string();

        assert!(matches!(
            BlobContainerClient::new(&config.storage, CONTAINER_NAME),
            Err(StorageError::InvalidEndpoint { .. })
        ));
    }
}
