//! High level methods for logging in to the router and driving the
//! administrative pages of its web interface.

use std::io::{self, BufReader, Read};

use log::{debug, info, warn};
use url::Url;

use crate::challenge;
use crate::embedded;
use crate::error::ApiError;
use crate::phone::{PhoneNumber, UpdateResult};
use crate::protocol::{Newtype, PhoneLineId, SessionId};
use crate::session::{self, SessionInfo};
use crate::transport::{Body, HttpTransport, Transport};
use crate::upload::{self, CertificateForm};

const SESSION_PATH:      &str = "login_sid.lua";
const CERTIFICATE_PATH:  &str = "cgi-bin/firmwarecfg";
const PHONE_LIST_PATH:   &str = "fon_num/fon_num_list.lua";
const DATA_PATH:         &str = "data.lua";

const PHONE_LIST_PREFIX:   &str = "var gFonNums = ";
const PHONE_LIST_SUFFIX:   &str = ";";
const PHONE_DETAIL_PREFIX: &str = "const g_fondata = [";
const PHONE_DETAIL_SUFFIX: &str = "];";

/// Interface to one router's web management UI.
pub struct FritzboxClient<T = HttpTransport> {
    base_url:  Url,
    transport: T,
}

impl FritzboxClient<HttpTransport> {
    /// `host` may be a full URL (`https://192.168.178.1`) or a bare host name
    /// (`fritz.box`), which is reached over plain http.
    pub fn new(host: &str) -> Result<FritzboxClient<HttpTransport>, ApiError> {
        let base_url = parse_base_url(host)?;
        Ok(FritzboxClient::with_transport(base_url, HttpTransport::new()))
    }
}

impl<T: Transport> FritzboxClient<T> {
    pub fn with_transport(base_url: Url, transport: T) -> FritzboxClient<T> {
        FritzboxClient {
            base_url: base_url,
            transport: transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Logs in with the challenge-response scheme of `login_sid.lua`.
    ///
    /// The returned `SessionInfo` always carries a non-zero `sid`.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionInfo, ApiError> {
        let anonymous = self.session_info()?;
        let response = challenge::response(&anonymous.challenge, password);
        let info = self.challenge_response_login(&anonymous.sid, username, &response)?;
        if info.sid.is_zero() {
            warn!("login as {} rejected (block time {}s)", username, info.block_time);
            return Err(ApiError::LoginFailed);
        }
        info!("logged in as {}", username);
        Ok(info)
    }

    fn session_info(&self) -> Result<SessionInfo, ApiError> {
        let url = self.endpoint(SESSION_PATH)?;
        let body = self.transport.get(url)?;
        decode_session(body)
    }

    fn challenge_response_login(&self, sid: &SessionId, username: &str, response: &str
                                ) -> Result<SessionInfo, ApiError> {
        let mut url = self.endpoint(SESSION_PATH)?;
        url.query_pairs_mut()
            .append_pair("sid", sid.as_slice())
            .append_pair("username", username)
            .append_pair("response", response);
        let body = self.transport.get(url)?;
        decode_session(body)
    }

    /// Uploads a new TLS certificate.  `certificate` and `key` are sent as one
    /// PEM file, certificate first.  On success returns the router's status
    /// message.
    pub fn update_tls_certificate<C, K>(&self, sid: &SessionId, key_password: &str,
                                        mut certificate: C, mut key: K
                                        ) -> Result<String, ApiError>
        where C: Read, K: Read {
        let mut file = Vec::new();
        certificate.read_to_end(&mut file)?;
        key.read_to_end(&mut file)?;

        let form = CertificateForm {
            sid:      sid.clone(),
            password: key_password.to_string(),
            file:     file,
        };
        let url = self.endpoint(CERTIFICATE_PATH)?;
        let mut body = self.transport.post_certificate(url, form)?;
        let mut page = Vec::new();
        body.read_to_end(&mut page)?;

        let outcome = upload::parse_outcome(&String::from_utf8_lossy(&page))?;
        debug!("certificate upload outcome: {:?}", outcome);
        outcome.into_result()
    }

    pub fn list_phone_numbers(&self, sid: &SessionId) -> Result<Vec<PhoneNumber>, ApiError> {
        let url = self.endpoint(PHONE_LIST_PATH)?;
        let body = self.transport.post_form(url, &[
            ("xhr", "1"),
            ("sid", sid.as_slice()),
        ])?;
        let numbers: Vec<PhoneNumber> = extract_embedded(body, PHONE_LIST_PREFIX, PHONE_LIST_SUFFIX)?;
        debug!("found {} phone numbers", numbers.len());
        Ok(numbers)
    }

    pub fn get_phone_number(&self, sid: &SessionId, uid: &PhoneLineId
                            ) -> Result<PhoneNumber, ApiError> {
        let url = self.endpoint(DATA_PATH)?;
        let body = self.transport.post_form(url, &[
            ("xhr",  "1"),
            ("uid",  uid.as_slice()),
            ("sid",  sid.as_slice()),
            ("page", "sip_edit"),
        ])?;
        extract_embedded(body, PHONE_DETAIL_PREFIX, PHONE_DETAIL_SUFFIX)
    }

    /// Deactivates a SIP line.  Disabling a line that is already disabled
    /// succeeds as well.
    pub fn disable_sip(&self, sid: &SessionId, uid: &PhoneLineId) -> Result<(), ApiError> {
        self.apply_sip_edit(&[
            ("xhr",   "1"),
            ("isnew", "0"),
            ("uid",   uid.as_slice()),
            ("sid",   sid.as_slice()),
            ("page",  "sip_edit"),
            ("apply", ""),
        ])
    }

    /// Activates a SIP line, re-submitting the provider, number and
    /// credentials from the line's `sip_edit` data.
    pub fn enable_sip(&self, sid: &SessionId, uid: &PhoneLineId, line: &PhoneNumber
                      ) -> Result<(), ApiError> {
        self.apply_sip_edit(&[
            ("xhr",            "1"),
            ("isnew",          "0"),
            ("sipactive",      "on"),
            ("sipprovider",    &line.provider_id),
            ("numberinput1_1", &line.area_code),
            ("numberinput2_1", &line.local_number),
            ("username",       &line.sip.username),
            ("password",       &line.sip.password),
            ("uid",            uid.as_slice()),
            ("sid",            sid.as_slice()),
            ("page",           "sip_edit"),
            ("apply",          ""),
        ])
    }

    fn apply_sip_edit(&self, fields: &[(&str, &str)]) -> Result<(), ApiError> {
        let url = self.endpoint(DATA_PATH)?;
        let body = self.transport.post_form(url, fields)?;
        let mut reader = BufReader::new(body);
        let decoded: Result<UpdateResult, _> = serde_json::from_reader(&mut reader);
        drain(&mut reader);
        let result = decoded
            .map_err(|source| ApiError::JsonDecode { endpoint: DATA_PATH, source })?;
        match result.data.apply.as_str() {
            "ok"       => Ok(()),
            "valerror" => Err(ApiError::Application(result.data.val_error.alert)),
            other      => Err(ApiError::UnrecognizedResponse(other.to_string())),
        }
    }

    /// Appends `path` to the base URL's path.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }
}

fn parse_base_url(host: &str) -> Result<Url, ApiError> {
    if host.contains("://") {
        Ok(Url::parse(host)?)
    }
    else {
        Ok(Url::parse(&format!("http://{}/", host))?)
    }
}

fn decode_session(body: Body) -> Result<SessionInfo, ApiError> {
    let mut reader = BufReader::new(body);
    let decoded = session::decode(&mut reader)
        .map_err(|source| ApiError::XmlDecode { endpoint: SESSION_PATH, source });
    drain(&mut reader);
    decoded
}

fn extract_embedded<V>(body: Body, prefix: &str, suffix: &str) -> Result<V, ApiError>
    where V: serde::de::DeserializeOwned {
    let mut reader = BufReader::new(body);
    let extracted = embedded::extract(&mut reader, prefix, suffix);
    drain(&mut reader);
    extracted
}

/// Reads the rest of a response so the connection can be reused.
fn drain<R: Read>(reader: &mut R) {
    if let Err(err) = io::copy(reader, &mut io::sink()) {
        debug!("error draining response body: {}", err);
    }
}
