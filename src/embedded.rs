//! Extraction of JSON values that the web UI embeds in script or page text,
//! e.g. `var gFonNums = [...];`.
//!
//! The value must sit on a single line that starts with a known prefix and
//! ends with a known suffix.  Only the first such line is decoded.

use std::io::{BufRead, Read};

use log::warn;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Longest line that will be scanned.  Scanning stops at a longer line.
pub const MAX_LINE_LENGTH: usize = 256 * 1024;

/// Scans `reader` line by line and decodes the text between `prefix` and
/// `suffix` on the first matching line.
///
/// The reader is left positioned after the matching line; callers that reuse
/// the underlying connection should drain it.
pub fn extract<T, R>(reader: &mut R, prefix: &str, suffix: &str) -> Result<T, ApiError>
    where T: DeserializeOwned, R: BufRead {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.by_ref()
            .take(MAX_LINE_LENGTH as u64 + 1)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        else if buf.len() > MAX_LINE_LENGTH {
            warn!("giving up on response line longer than {} bytes", MAX_LINE_LENGTH);
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if let Some(inner) = strip_delimiters(&line, prefix, suffix) {
            return serde_json::from_str(inner).map_err(|source| ApiError::PayloadMalformed {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
                source,
            });
        }
    }
    Err(ApiError::PayloadNotFound {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
    })
}

fn strip_delimiters<'a>(line: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    if line.len() < prefix.len() + suffix.len() {
        return None;
    }
    line.strip_prefix(prefix)?.strip_suffix(suffix)
}
