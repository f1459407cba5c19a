//! Computes the response to a `login_sid.lua` challenge.
//!
//! The router expects `<challenge>-<md5>` where the digest is taken over the
//! UTF-16LE encoding (no byte-order mark) of `<challenge>-<password>`.

use crypto::digest::Digest;
use crypto::md5::Md5;

use crate::protocol::{Challenge, Newtype};

/// Produces the lowercase hex MD5 digest of `challenge-password`.
pub fn digest(challenge: &Challenge, password: &str) -> String {
    let data = format!("{}-{}", challenge.as_slice(), password);
    let bytes: Vec<u8> = data.encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect();
    let mut md5 = Md5::new();
    md5.input(&bytes);
    md5.result_str()
}

/// Full login response to submit back to the router.
pub fn response(challenge: &Challenge, password: &str) -> String {
    format!("{}-{}", challenge.as_slice(), digest(challenge, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_matches_the_recorded_digest() {
        let challenge = Challenge::from_slice(CHALLENGE);
        assert_eq!(digest(&challenge, PASSWORD), DIGEST);
    }

    #[test]
    fn it_prefixes_the_response_with_the_challenge() {
        let challenge = Challenge::from_slice(CHALLENGE);
        assert_eq!(response(&challenge, PASSWORD), format!("{}-{}", CHALLENGE, DIGEST));
    }

    #[test]
    fn it_encodes_non_ascii_passwords_as_utf16() {
        let challenge = Challenge::from_slice("1234567z");
        assert_eq!(response(&challenge, "äbc"), "1234567z-9e224a41eeefa284df7bb0f26c2913e2");
    }

    #[test]
    fn it_is_deterministic() {
        let challenge = Challenge::from_slice(CHALLENGE);
        assert_eq!(digest(&challenge, PASSWORD), digest(&challenge, PASSWORD));
        assert!(digest(&challenge, "Secret") != digest(&challenge, PASSWORD));
    }

    const CHALLENGE: &'static str = "1234567z-abc";
    const PASSWORD:  &'static str = "secret";
    const DIGEST:    &'static str = "194a01c85cca0ca61411b073e8da1202";
}
