//! Blob service shared access signatures.
//!
//! Builds the query string of a service SAS scoped to a single blob, signed
//! with the storage account key.

use chrono::{DateTime, Utc};
use shared::crypto::{AccountKey, CryptoResult};

/// Signed storage service version (`sv`)
pub const SAS_VERSION: &str = "2022-11-02";

/// Signed resource (`sr`) for a single blob
const SIGNED_RESOURCE_BLOB: &str = "b";

/// Permissions a blob SAS may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobSasPermissions {
    pub read: bool,
    pub add: bool,
    pub create: bool,
    pub write: bool,
    pub delete: bool,
}

impl BlobSasPermissions {
    /// Create and write only: enough to upload, nothing to read back or remove
    pub fn create_write() -> Self {
        Self {
            create: true,
            write: true,
            ..Self::default()
        }
    }

    /// Render as the `sp` field. The service requires the canonical `racwd` order.
    pub fn as_sp(&self) -> String {
        [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
        ]
        .iter()
        .filter(|(granted, _)| *granted)
        .map(|(_, flag)| *flag)
        .collect()
    }
}

/// Format a timestamp the way SAS fields expect it
pub fn format_sas_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone)]
pub struct BlobSas<'a> {
    pub account_name: &'a str,
    pub container: &'a str,
    pub blob_name: &'a str,
    pub permissions: BlobSasPermissions,
    pub expires_on: DateTime<Utc>,
}

impl<'a> BlobSas<'a> {
    fn canonicalized_resource(&self) -> String {
        format!("/blob/{}/{}/{}", self.account_name, self.container, self.blob_name)
    }

    /// String-to-sign for service SAS versions 2020-12-06 and later
    pub fn string_to_sign(&self) -> String {
        let permissions = self.permissions.as_sp();
        let expiry = format_sas_time(&self.expires_on);
        let resource = self.canonicalized_resource();

        [
            permissions.as_str(), // sp
            "",                   // st
            expiry.as_str(),      // se
            resource.as_str(),
            "", // si
            "", // sip
            "", // spr
            SAS_VERSION,
            SIGNED_RESOURCE_BLOB,
            "", // snapshot time
            "", // ses
            "", // rscc
            "", // rscd
            "", // rsce
            "", // rscl
            "", // rsct
        ]
        .join("\n")
    }

    /// Sign and render the SAS query string (without the leading `?`)
    pub fn to_query(&self, key: &AccountKey) -> CryptoResult<String> {
        let signature = key.sign(&self.string_to_sign())?;

        Ok(format!(
            "sv={}&se={}&sr={}&sp={}&sig={}",
            SAS_VERSION,
            urlencoding::encode(&format_sas_time(&self.expires_on)),
            SIGNED_RESOURCE_BLOB,
            self.permissions.as_sp(),
            urlencoding::encode(&signature),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample(expires_on: DateTime<Utc>) -> BlobSas<'static> {
        BlobSas {
            account_name: "photosacct",
            container: "event-photos",
            blob_name: "photo1.jpg",
            permissions: BlobSasPermissions::create_write(),
            expires_on,
        }
    }

    #[test]
    fn test_permission_rendering() {
        assert_eq!(BlobSasPermissions::create_write().as_sp(), "cw");
        assert_eq!(BlobSasPermissions::default().as_sp(), "");

        let all = BlobSasPermissions {
            read: true,
            add: true,
            create: true,
            write: true,
            delete: true,
        };
        assert_eq!(all.as_sp(), "racwd");
    }

    #[test]
    fn test_string_to_sign_layout() {
        let expires = Utc.with_ymd_and_hms(2026, 10, 18, 13, 0, 0).unwrap();
        assert_eq!(
            sample(expires).string_to_sign(),
            "cw\n\n2026-10-18T13:00:00Z\n/blob/photosacct/event-photos/photo1.jpg\n\n\n\n2022-11-02\nb\n\n\n\n\n\n\n"
        );
    }

    #[test]
    fn test_signed_query() {
        let key = AccountKey::from_base64("dGVzdC1hY2NvdW50LWtleQ==").unwrap();
        let expires = Utc.with_ymd_and_hms(2026, 10, 18, 13, 0, 0).unwrap();

        assert_eq!(
            sample(expires).to_query(&key).unwrap(),
            "sv=2022-11-02&se=2026-10-18T13%3A00%3A00Z&sr=b&sp=cw\
             &sig=T%2BFSq%2Fm5dm8QMxM3MVIXBywFWzU3cIvPj9q4%2FMDe200%3D"
        );
    }
}
