//! Low-level HTTP access to the router.
//!
//! Everything above this module talks to a `Transport`, so the protocol logic
//! can be exercised against canned responses.

use std::io::Read;

use log::debug;
use reqwest::blocking::{multipart, Client};
use url::Url;

use crate::error::ApiError;
use crate::protocol::Newtype;
use crate::upload::{CertificateForm, CERTIFICATE_FILE_NAME};

/// A response body.  Callers read it to the end before issuing the next
/// request.
pub type Body = Box<dyn Read>;

pub trait Transport {
    fn get(&self, url: Url) -> Result<Body, ApiError>;

    /// Posts `application/x-www-form-urlencoded` fields in the given order.
    fn post_form(&self, url: Url, fields: &[(&str, &str)]) -> Result<Body, ApiError>;

    fn post_certificate(&self, url: Url, form: CertificateForm) -> Result<Body, ApiError>;
}

/// Blocking reqwest client.  Non-2xx responses are reported as errors.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> HttpTransport {
        HttpTransport { client: Client::new() }
    }

    pub fn with_client(client: Client) -> HttpTransport {
        HttpTransport { client: client }
    }
}

impl Default for HttpTransport {
    fn default() -> HttpTransport {
        HttpTransport::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: Url) -> Result<Body, ApiError> {
        debug!("GET {}", url.path());
        let res = self.client.get(url).send()?.error_for_status()?;
        Ok(Box::new(res))
    }

    fn post_form(&self, url: Url, fields: &[(&str, &str)]) -> Result<Body, ApiError> {
        debug!("POST {}", url.path());
        let res = self.client.post(url).form(fields).send()?.error_for_status()?;
        Ok(Box::new(res))
    }

    fn post_certificate(&self, url: Url, form: CertificateForm) -> Result<Body, ApiError> {
        debug!("POST {} (multipart)", url.path());
        let CertificateForm { sid, password, file } = form;
        let file = multipart::Part::bytes(file).file_name(CERTIFICATE_FILE_NAME);
        let form = multipart::Form::new()
            .text("sid", sid.as_slice().to_string())
            .text("BoxCertPassword", password)
            .part("BoxCertImportFile", file);
        let res = self.client.post(url).multipart(form).send()?.error_for_status()?;
        Ok(Box::new(res))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory transport that replays canned bodies and records requests.

    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    pub enum Request {
        Get(Url),
        Form(Url, Vec<(String, String)>),
        Certificate(Url, CertificateForm),
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<&'static [u8]>>,
        requests:  RefCell<Vec<Request>>,
        unread:    Rc<Cell<usize>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: &[&'static str]) -> ScriptedTransport {
            let bodies: Vec<&'static [u8]> = responses.iter().map(|r| r.as_bytes()).collect();
            ScriptedTransport::with_bodies(&bodies)
        }

        /// Replays raw bodies, which need not be valid UTF-8.
        pub fn with_bodies(responses: &[&'static [u8]]) -> ScriptedTransport {
            ScriptedTransport {
                responses: RefCell::new(responses.iter().cloned().collect()),
                requests:  RefCell::new(Vec::new()),
                unread:    Rc::new(Cell::new(0)),
            }
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }

        /// Bytes of handed-out bodies that nobody has read yet.
        pub fn unread(&self) -> usize {
            self.unread.get()
        }

        fn respond(&self, request: Request) -> Result<Body, ApiError> {
            self.requests.borrow_mut().push(request);
            let body = self.responses.borrow_mut().pop_front()
                .expect("no scripted response left");
            self.unread.set(self.unread.get() + body.len());
            Ok(Box::new(ScriptedBody { rest: body, unread: self.unread.clone() }))
        }
    }

    struct ScriptedBody {
        rest:   &'static [u8],
        unread: Rc<Cell<usize>>,
    }

    impl Read for ScriptedBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.rest.read(buf)?;
            self.unread.set(self.unread.get() - n);
            Ok(n)
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: Url) -> Result<Body, ApiError> {
            self.respond(Request::Get(url))
        }

        fn post_form(&self, url: Url, fields: &[(&str, &str)]) -> Result<Body, ApiError> {
            let fields = fields.iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.respond(Request::Form(url, fields))
        }

        fn post_certificate(&self, url: Url, form: CertificateForm) -> Result<Body, ApiError> {
            self.respond(Request::Certificate(url, form))
        }
    }
}
