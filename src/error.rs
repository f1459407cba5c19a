//! Errors that may occur while talking to the router's web interface.

use std::io;

use thiserror::Error;

/// Enumerates the possible errors that may occur while logging in, decoding a
/// response, or carrying out an administrative operation.  No operation is
/// retried; every variant aborts the call that produced it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error connecting to router: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error reading response from router: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid router address: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid router address: {0} cannot be used as a base URL")]
    InvalidBaseUrl(String),

    #[error("Error decoding XML response from {endpoint}: {source}")]
    XmlDecode {
        endpoint: &'static str,
        source:   quick_xml::DeError,
    },

    #[error("Error decoding JSON response from {endpoint}: {source}")]
    JsonDecode {
        endpoint: &'static str,
        source:   serde_json::Error,
    },

    #[error("login failed")]
    LoginFailed,

    #[error("could not find embedded json between {prefix:?} and {suffix:?}")]
    PayloadNotFound {
        prefix: String,
        suffix: String,
    },

    #[error("malformed embedded json between {prefix:?} and {suffix:?}: {source}")]
    PayloadMalformed {
        prefix: String,
        suffix: String,
        source: serde_json::Error,
    },

    #[error("unable to find {0} in document")]
    ElementNotFound(&'static str),

    #[error("unable to parse post-update script")]
    ScriptUnparsable,

    #[error("{0}")]
    Application(String),

    #[error("unknown error while processing response (apply = {0:?})")]
    UnrecognizedResponse(String),
}
