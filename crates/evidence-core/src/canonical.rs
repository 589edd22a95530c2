//! # Canonical Serialization: securesystemslib Canonical JSON
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that feed key-identifier digests.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which rejects floats and
//! then emits the canonical encoding below. A key ID computed from any other
//! rendering would silently disagree with every other in-toto tool.
//!
//! ## Encoding Rules
//!
//! The output matches the OLPC canonical JSON dialect used by
//! securesystemslib (`cjson.EncodeCanonical` in Go, `encode_canonical` in
//! Python):
//!
//! 1. **Objects**: keys sorted by their UTF-8 bytes, no whitespace.
//! 2. **Strings**: only `\` and `"` are escaped. Every other byte, including
//!    newlines inside PEM blocks, is emitted verbatim. This is where the
//!    dialect departs from RFC 8785, and why `serde_jcs` cannot be used here.
//! 3. **Numbers**: integers only. Floats are rejected.
//! 4. **Arrays**: elements in order, comma separated.
//! 5. `true`, `false`, `null`: literal.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by securesystemslib canonical JSON encoding.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted; there is no insignificant whitespace.
/// - Numbers are integers, never floats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if the
    /// value cannot be represented as JSON at all.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let mut out = Vec::new();
        encode_canonical(&value, &mut out)?;
        Ok(Self(out))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn encode_canonical(value: &Value, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                return Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ));
            }
        }
        Value::String(s) => encode_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                encode_canonical(item, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            out.push(b'{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                encode_string(k, out);
                out.push(b':');
                encode_canonical(v, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn encode_string(s: &str, out: &mut Vec<u8>) {
    out.push(b'"');
    for b in s.bytes() {
        if b == b'\\' || b == b'"' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_str(value: &Value) -> String {
        let cb = CanonicalBytes::new(value).expect("should canonicalize");
        String::from_utf8(cb.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let data = serde_json::json!({"z": 1, "m": 2, "a": 3});
        assert_eq!(canonical_str(&data), r#"{"a":3,"m":2,"z":1}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        assert_eq!(
            canonical_str(&data),
            r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn test_newline_emitted_verbatim() {
        let data = serde_json::json!({"public": "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"});
        assert_eq!(
            canonical_str(&data),
            "{\"public\":\"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\"}"
        );
    }

    #[test]
    fn test_quote_and_backslash_escaped() {
        let data = serde_json::json!({"k": "a\"b\\c"});
        assert_eq!(canonical_str(&data), r#"{"k":"a\"b\\c"}"#);
    }

    #[test]
    fn test_key_order_is_bytewise() {
        // "keyid_hash_algorithms" < "keytype" < "keyval" < "scheme"
        let data = serde_json::json!({
            "scheme": "ed25519",
            "keyval": {"public": "ab"},
            "keytype": "ed25519",
            "keyid_hash_algorithms": ["sha256", "sha512"]
        });
        assert_eq!(
            canonical_str(&data),
            r#"{"keyid_hash_algorithms":["sha256","sha512"],"keytype":"ed25519","keyval":{"public":"ab"},"scheme":"ed25519"}"#
        );
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"amount": 1.5});
        match CanonicalBytes::new(&data).unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("Expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.25}]}});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_scalars() {
        let data = serde_json::json!({"flag": true, "other": false, "none": null, "n": -42});
        assert_eq!(
            canonical_str(&data),
            r#"{"flag":true,"n":-42,"none":null,"other":false}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(canonical_str(&serde_json::json!({})), "{}");
        assert_eq!(canonical_str(&serde_json::json!([])), "[]");
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"name": "\u{00e9}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), "{\"name\":\"\u{00e9}\"}".as_bytes());
        assert!(!cb.is_empty());
    }
}
