//! Certificate upload to `cgi-bin/firmwarecfg` and interpretation of the HTML
//! page the router answers with.
//!
//! The upload endpoint always answers 200.  Whether the upload worked is only
//! visible in the page: a status paragraph inside `mainform`, and a module
//! script that calls `postUpload.redirect(<delay>);`.  An empty delay means
//! the upload was accepted.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ApiError;
use crate::protocol::SessionId;

/// Name of the file part the router expects.
pub const CERTIFICATE_FILE_NAME: &str = "BoxCert.pem";

static MESSAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("form[name=mainform] > p").expect("valid selector")
});

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type=module]").expect("valid selector")
});

static REDIRECT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"postUpload\.redirect\(([0-9]*)\);").expect("valid regex")
});

/// Fields of the certificate import form.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CertificateForm {
    pub sid:      SessionId,
    /// Password protecting the private key, empty for an unencrypted key.
    pub password: String,
    /// Certificate followed by key, PEM encoded.
    pub file:     Vec<u8>,
}

/// What the status page says about an upload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UploadOutcome {
    pub message:        String,
    pub redirect_delay: Option<u64>,
}

impl UploadOutcome {
    /// An upload is treated as failed whenever the page schedules a redirect
    /// with a delay, whatever the delay is.
    pub fn into_result(self) -> Result<String, ApiError> {
        match self.redirect_delay {
            Some(_) => Err(ApiError::Application(format!(
                "failed to update TLS certificate: {}", self.message))),
            None    => Ok(self.message),
        }
    }
}

/// Locates the status message and redirect delay in an upload result page.
pub fn parse_outcome(html: &str) -> Result<UploadOutcome, ApiError> {
    let document = Html::parse_document(html);

    let message = document.select(&MESSAGE_SELECTOR).next()
        .map(|node| inner_text(node).trim().to_string())
        .ok_or(ApiError::ElementNotFound("status message"))?;

    let script = document.select(&SCRIPT_SELECTOR).next()
        .map(inner_text)
        .ok_or(ApiError::ElementNotFound("completion script"))?;

    let delay = REDIRECT_CALL.captures(&script)
        .and_then(|captures| captures.get(1))
        .ok_or(ApiError::ScriptUnparsable)?
        .as_str();

    let redirect_delay = if delay.is_empty() {
        None
    }
    else {
        Some(delay.parse().unwrap_or(u64::MAX))
    };
    Ok(UploadOutcome { message, redirect_delay })
}

fn inner_text(node: ElementRef) -> String {
    node.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(message: &str, script: &str) -> String {
        format!(r#"<!DOCTYPE html>
<html><head><title>FRITZ!Box</title>
<script type="text/javascript">var postUpload = {{}};</script>
<script type="module">{}</script>
</head><body>
<form name="mainform" method="POST" action="/">
<div><p>not the status</p></div>
<p>{}</p>
</form>
</body></html>"#, script, message)
    }

    #[test]
    fn it_accepts_an_upload_without_redirect_delay() {
        let html = page("Das Zertifikat wurde <b>erfolgreich</b> importiert.",
                        "import postUpload from './upload.js'; postUpload.redirect();");
        let outcome = parse_outcome(&html).unwrap();
        assert_eq!(outcome.redirect_delay, None);
        assert_eq!(outcome.into_result().unwrap(), "Das Zertifikat wurde erfolgreich importiert.");
    }

    #[test]
    fn it_rejects_an_upload_with_redirect_delay() {
        let html = page("Fehler beim Import.", "postUpload.redirect(5);");
        let outcome = parse_outcome(&html).unwrap();
        assert_eq!(outcome.redirect_delay, Some(5));
        match outcome.into_result() {
            Err(ApiError::Application(msg)) => {
                assert_eq!(msg, "failed to update TLS certificate: Fehler beim Import.");
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn it_treats_a_zero_delay_as_failure() {
        let html = page("Fehler beim Import.", "postUpload.redirect(0);");
        assert!(parse_outcome(&html).unwrap().into_result().is_err());
    }

    #[test]
    fn it_requires_the_status_message() {
        let html = r#"<html><body><form name="other"><p>hi</p></form>
<script type="module">postUpload.redirect();</script></body></html>"#;
        match parse_outcome(html) {
            Err(ApiError::ElementNotFound(what)) => assert_eq!(what, "status message"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn it_requires_the_module_script() {
        let html = r#"<html><body><form name="mainform"><p>ok</p></form>
<script>postUpload.redirect();</script></body></html>"#;
        match parse_outcome(html) {
            Err(ApiError::ElementNotFound(what)) => assert_eq!(what, "completion script"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn it_rejects_an_unexpected_redirect_call() {
        let html = page("ok", "postUpload.redirect(5, 10);");
        assert!(matches!(parse_outcome(&html), Err(ApiError::ScriptUnparsable)));
        let html = page("ok", "window.location = '/';");
        assert!(matches!(parse_outcome(&html), Err(ApiError::ScriptUnparsable)));
    }
}
