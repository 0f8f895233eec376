//! Canonical CBOR encoding and state fingerprints.
//!
//! Records are encoded with CBOR in struct-field order, with permission
//! sets in first-seen order. The same record always produces the same
//! bytes, so the Blake3 fingerprint of those bytes can be compared across
//! reads to detect drift.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Domain separator for state fingerprints.
const FINGERPRINT_DOMAIN: &[u8] = b"playgrant-state-v0:";

/// Blake3 fingerprint of a record's canonical bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Encode a value to canonical CBOR bytes.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(buf)
}

/// Decode a value from canonical CBOR bytes.
pub fn from_canonical_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Fingerprint a value: `Blake3(domain || canonical_bytes(value))`.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<Fingerprint> {
    let bytes = canonical_bytes(value)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update(&bytes);
    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionSet;
    use crate::record::GrantRecord;

    fn record(tokens: &[&str]) -> GrantRecord {
        GrantRecord {
            developer_id: "D".into(),
            user_id: "u@x.io".into(),
            app_id: "A".into(),
            permissions: PermissionSet::from_tokens(tokens.iter().copied()),
            expanded_permissions: PermissionSet::from_tokens(tokens.iter().copied()),
        }
    }

    #[test]
    fn test_canonical_bytes_roundtrip() {
        let original = record(&["CAN_VIEW_APP_QUALITY"]);
        let bytes = canonical_bytes(&original).unwrap();
        let back: GrantRecord = from_canonical_bytes(&bytes).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(&record(&["X", "Y"])).unwrap();
        let b = fingerprint(&record(&["X", "Y"])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = fingerprint(&record(&["X"])).unwrap();
        let b = fingerprint(&record(&["X", "Y"])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(from_canonical_bytes::<GrantRecord>(&[0xff, 0x00]).is_err());
    }
}
