//! Library interface to the web management UI of AVM FRITZ!Box routers.
//!
//! The router has no formal API for the operations covered here.  This crate
//! logs in through the `login_sid.lua` challenge-response scheme and then
//! drives the pages the browser UI uses, pulling the data it needs out of
//! HTML and script responses:
//!
//! - replacing the router's TLS certificate
//! - listing phone numbers and reading a line's SIP settings
//! - enabling and disabling SIP lines
//!
//! ```no_run
//! use fritzbox_client::FritzboxClient;
//!
//! let client = FritzboxClient::new("fritz.box")?;
//! let session = client.login("fritz1234", "secret")?;
//! for number in client.list_phone_numbers(&session.sid)? {
//!     println!("{} ({})", number.number, number.kind);
//! }
//! # Ok::<(), fritzbox_client::ApiError>(())
//! ```

pub use self::client::FritzboxClient;
pub use self::error::ApiError;
pub use self::phone::{PhoneNumber, SipCredentials};
pub use self::protocol::{Challenge, Newtype, PhoneLineId, SessionId};
pub use self::session::{Rights, SessionInfo, SessionUser};
pub use self::transport::{HttpTransport, Transport};
pub use self::upload::UploadOutcome;

pub mod challenge;
pub mod client;
pub mod embedded;
pub mod error;
pub mod phone;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod upload;
