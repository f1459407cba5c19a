//! Opaque token types exchanged with the router.
//!
//! None of these values are interpreted locally - they are handed back to the
//! router exactly as received.

use std::fmt;

/// Common interface for string-backed protocol values.
pub trait Newtype {
    fn new(value: String) -> Self;
    fn as_slice(&self) -> &str;

    fn from_slice(value: &str) -> Self where Self: Sized {
        Self::new(value.to_string())
    }
}

macro_rules! newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
        #[derive(serde::Deserialize, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl Newtype for $name {
            fn new(value: String) -> $name {
                $name(value)
            }

            fn as_slice(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    /// Session identifier issued by `login_sid.lua`.  Passed as the `sid`
    /// form field on every authenticated call.
    SessionId
);

newtype!(
    /// Server-issued nonce, consumed by a single login attempt.
    Challenge
);

newtype!(
    /// Identifier of a configured phone line (`uid` in the web UI).
    PhoneLineId
);

/// The sixteen-zero session id the router uses for "no session".
pub const ZERO_SESSION_ID: &str = "0000000000000000";

impl SessionId {
    pub fn zero() -> SessionId {
        SessionId::from_slice(ZERO_SESSION_ID)
    }

    /// True for the zero sentinel, which must never be used as a credential.
    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_SESSION_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_recognizes_the_zero_sentinel() {
        assert!(SessionId::zero().is_zero());
        assert!(SessionId::from_slice(ZERO_SESSION_ID).is_zero());
        assert!(!SessionId::from_slice("8d9f8c29b6e7e5a3").is_zero());
        assert!(!SessionId::from_slice("").is_zero());
    }

    #[test]
    fn it_serializes_as_a_plain_string() {
        let uid = PhoneLineId::from_slice("7");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"7\"");
        let back: PhoneLineId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, uid);
        assert_eq!(back.to_string(), "7");
    }
}
