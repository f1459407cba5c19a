//! Payloads of the phone-line pages (`fon_num_list.lua`, `sip_edit`).

use serde::Deserialize;

use crate::protocol::PhoneLineId;

/// A configured phone number.  The list page only fills in a subset of the
/// fields; the `sip_edit` page fills in the rest.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneNumber {
    pub uid:          PhoneLineId,
    pub number:       String,
    #[serde(rename = "type")]
    pub kind:         String,
    #[serde(alias = "providerid")]
    pub provider_id:  String,
    #[serde(alias = "areacode")]
    pub area_code:    String,
    #[serde(alias = "localnumber")]
    pub local_number: String,
    pub sip:          SipCredentials,
}

impl PhoneNumber {
    pub fn is_sip(&self) -> bool {
        self.kind == "sip"
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SipCredentials {
    pub username: String,
    pub password: String,
}

/// Reply to a `sip_edit` form submission.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateResult {
    pub data: UpdateData,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateData {
    /// `ok`, `valerror`, or something unexpected.
    pub apply:    String,
    pub redirect: Redirect,
    #[serde(rename = "valerror")]
    pub val_error: ValError,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Redirect {
    pub back: serde_json::Value,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValError {
    pub ok:     serde_json::Value,
    pub tomark: serde_json::Value,
    pub result: serde_json::Value,
    pub alert:  String,
}
