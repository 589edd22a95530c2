//! # Pre-Authentication Encoding
//!
//! DSSE signs `PAE(payloadType, payload)`, never the payload alone:
//!
//! ```text
//! "DSSEv1" SP LEN(type) SP type SP LEN(payload) SP payload
//! ```
//!
//! `LEN` is the ASCII decimal byte length with no leading zeros and `SP` is
//! a single 0x20. Binding the type into the signed bytes prevents a
//! signature over one payload type from being replayed under another.

/// Literal prefix of every DSSE v1 encoding.
pub const PAE_PREFIX: &str = "DSSEv1";

/// Encode `payload_type` and `payload` for signing or verification.
pub fn pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let type_len = payload_type.len().to_string();
    let payload_len = payload.len().to_string();

    let mut out = Vec::with_capacity(
        PAE_PREFIX.len() + type_len.len() + payload_type.len() + payload_len.len() + payload.len() + 4,
    );
    out.extend_from_slice(PAE_PREFIX.as_bytes());
    out.push(b' ');
    out.extend_from_slice(type_len.as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload_type.as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload_len.as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn matches_published_vector() {
        assert_eq!(
            pae("http://example.com/HelloWorld", b"hello world"),
            b"DSSEv1 29 http://example.com/HelloWorld 11 hello world".to_vec()
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(pae("", b""), b"DSSEv1 0  0 ".to_vec());
    }

    #[test]
    fn lengths_count_bytes_not_chars() {
        let encoded = pae("ü", "ß".as_bytes());
        assert_eq!(encoded, "DSSEv1 2 ü 2 ß".as_bytes().to_vec());
    }

    #[test]
    fn binary_payload_is_copied_verbatim() {
        let payload = [0u8, 0xff, b' ', b'\n'];
        let encoded = pae("t", &payload);
        assert!(encoded.ends_with(&payload));
        assert!(encoded.starts_with(b"DSSEv1 1 t 4 "));
    }

    proptest! {
        /// Distinct (type, payload) pairs never share an encoding.
        #[test]
        fn pae_is_injective(
            t1 in ".{0,16}",
            p1 in proptest::collection::vec(any::<u8>(), 0..32),
            t2 in ".{0,16}",
            p2 in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            prop_assume!((t1.as_str(), p1.as_slice()) != (t2.as_str(), p2.as_slice()));
            prop_assert_ne!(pae(&t1, &p1), pae(&t2, &p2));
        }

        /// Moving bytes between the type and the payload changes the encoding.
        #[test]
        fn boundary_shift_changes_encoding(s in "[a-z ]{2,24}", split in 1usize..24) {
            let split = split.min(s.len() - 1);
            let (a, b) = s.split_at(split);
            let (c, d) = s.split_at(split - 1);
            prop_assert_ne!(pae(a, b.as_bytes()), pae(c, d.as_bytes()));
        }
    }
}
