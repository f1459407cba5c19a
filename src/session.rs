//! The `SessionInfo` document returned by `login_sid.lua`.
//!
//! ```xml
//! <SessionInfo>
//!   <SID>0000000000000000</SID>
//!   <Challenge>1234567z</Challenge>
//!   <BlockTime>0</BlockTime>
//!   <Rights><Name>Dial</Name><Access>2</Access>...</Rights>
//!   <Users><User last="1">fritz1234</User></Users>
//! </SessionInfo>
//! ```

use std::collections::BTreeMap;
use std::io::BufRead;

use chrono::Duration;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::protocol::{Challenge, SessionId};

/// Session state as reported by the router.  A value with a non-zero `sid`
/// is proof of a successful login; the `sid` is the bearer token for every
/// later call.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SessionInfo {
    #[serde(rename = "SID")]
    pub sid:        SessionId,
    #[serde(rename = "Challenge")]
    pub challenge:  Challenge,
    #[serde(rename = "BlockTime", default)]
    pub block_time: i64,
    #[serde(rename = "Rights", default)]
    pub rights:     Rights,
    #[serde(rename = "Users", default)]
    pub users:      Users,
}

impl SessionInfo {
    /// Seconds the router refuses further login attempts for.
    pub fn block_time(&self) -> Duration {
        Duration::try_seconds(self.block_time).unwrap_or(Duration::MAX)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.sid.is_zero()
    }

    /// The account the router marks as most recently used, if any.
    pub fn last_user(&self) -> Option<&str> {
        self.users.users.iter()
            .find(|user| user.last == Some(1))
            .map(|user| user.name.as_str())
    }
}

/// Permission name to access level.
///
/// On the wire this is a pair of interleaved sequences - `<Name>` and
/// `<Access>` - which must be of equal length.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Rights(pub BTreeMap<String, i32>);

impl Rights {
    pub fn get(&self, name: &str) -> Option<i32> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, i32>> for Rights {
    fn from(map: BTreeMap<String, i32>) -> Rights {
        Rights(map)
    }
}

#[derive(Deserialize)]
struct RightsEntries {
    #[serde(rename = "Name", default)]
    names:  Vec<String>,
    #[serde(rename = "Access", default)]
    access: Vec<i32>,
}

impl<'de> Deserialize<'de> for Rights {
    fn deserialize<D>(deserializer: D) -> Result<Rights, D::Error>
        where D: Deserializer<'de> {
        let RightsEntries { names, access } = RightsEntries::deserialize(deserializer)?;
        if names.len() != access.len() {
            return Err(de::Error::custom(format!(
                "unbalanced map entries ({} names, {} access levels)",
                names.len(), access.len())));
        }
        Ok(Rights(names.into_iter().zip(access).collect()))
    }
}

impl Serialize for Rights {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
        let mut entries = serializer.serialize_struct("Rights", self.0.len() * 2)?;
        for (name, access) in &self.0 {
            entries.serialize_field("Name", name)?;
            entries.serialize_field("Access", access)?;
        }
        entries.end()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct Users {
    #[serde(rename = "User", default)]
    pub users: Vec<SessionUser>,
}

/// An account known to the router.  `last` is `Some(1)` for the account that
/// logged in most recently.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct SessionUser {
    #[serde(rename = "@last", default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u8>,
    #[serde(rename = "$text", default)]
    pub name: String,
}

/// Decodes a `SessionInfo` document.
pub fn decode<R: BufRead>(reader: R) -> Result<SessionInfo, quick_xml::DeError> {
    quick_xml::de::from_reader(reader)
}
