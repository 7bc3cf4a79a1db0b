//! HMAC-SHA256 signing with storage account keys

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{CryptoError, CryptoResult};

type HmacSha256 = Hmac<Sha256>;

/// Compute a raw HMAC-SHA256 over `message`
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CryptoError::Signing(format!("HMAC key rejected: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// A decoded storage account access key.
///
/// Azure hands out account keys base64 encoded; signatures are computed over
/// the decoded bytes and emitted base64 encoded again.
#[derive(Clone)]
pub struct AccountKey {
    bytes: Vec<u8>,
}

impl AccountKey {
    /// Decode a base64 account key as found in the portal or connection string
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(CryptoError::InvalidKey("account key is empty".to_string()));
        }

        let bytes = STANDARD
            .decode(trimmed)
            .map_err(|e| CryptoError::InvalidKey(format!("account key is not valid base64: {}", e)))?;

        Ok(Self { bytes })
    }

    /// Re-encode the key in the base64 form request signers expect
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Sign a UTF-8 string-to-sign, returning the base64 signature
    pub fn sign(&self, string_to_sign: &str) -> CryptoResult<String> {
        let mac = hmac_sha256(&self.bytes, string_to_sign.as_bytes())?;
        Ok(STANDARD.encode(mac))
    }
}

// Never print key material
impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            STANDARD.encode(mac),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
    }

    #[test]
    fn test_account_key_signs_over_decoded_bytes() {
        // "SmVmZQ==" is base64 for "Jefe"
        let key = AccountKey::from_base64("SmVmZQ==").unwrap();
        assert_eq!(
            key.sign("what do ya want for nothing?").unwrap(),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
    }

    #[test]
    fn test_account_key_base64_round_trip() {
        let key = AccountKey::from_base64(" dGVzdC1hY2NvdW50LWtleQ== ").unwrap();
        assert_eq!(key.to_base64(), "dGVzdC1hY2NvdW50LWtleQ==");
    }

    #[test]
    fn test_invalid_account_keys() {
        assert!(matches!(AccountKey::from_base64(""), Err(CryptoError::InvalidKey(_))));
        assert!(matches!(AccountKey::from_base64("not base64!"), Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = AccountKey::from_base64("SmVmZQ==").unwrap();
        assert_eq!(format!("{:?}", key), "AccountKey(<redacted>)");
    }
}
