//! Hashing primitives for the notary ledger
//!
//! Every digest in the ledger is the lowercase hex SHA-256 of a value's
//! canonical JSON encoding: the value is lowered to a `serde_json::Value`,
//! object keys are sorted at every depth, and the result is written without
//! whitespace. Two logically equal values always produce the same bytes.

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Canonical byte encoding of `value` used as hash input.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = canonicalize(serde_json::to_value(value)?);
    Ok(serde_json::to_vec(&value)?)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Digest of the canonical encoding of `value`.
pub fn digest<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// True when `s` looks like a digest produced by [`digest`].
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HEX_DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_ignores_object_key_order() {
        let a = json!({"type": "funding", "loanId": 7});
        let b = json!({"loanId": 7, "type": "funding"});
        assert_eq!(digest(&a).unwrap(), digest(&b).unwrap());
    }

    #[test]
    fn test_is_hex_digest() {
        assert!(is_hex_digest(&sha256_hex(b"")));
        assert!(!is_hex_digest("0"));
        assert!(!is_hex_digest(&"g".repeat(HEX_DIGEST_LEN)));
    }
}
