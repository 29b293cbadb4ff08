//! # HTTP Transport
//!
//! Every remote call made during a scan goes through [`HttpTransport`].
//! Runners and clients only see [`HttpResponse`] or a classified
//! [`TransportError`], never the error type of the underlying library, so a
//! stub transport can stand in for the network in tests.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// A failed exchange, classified by where it broke. Each variant carries the
/// full chain of causes as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("TLS negotiation failed: {0}")]
    Tls(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        let chain = error_chain(&err);
        let lowered = chain.to_lowercase();

        if err.is_timeout() {
            TransportError::Timeout(chain)
        } else if lowered.contains("certificate") || lowered.contains("tls") {
            TransportError::Tls(chain)
        } else if err.is_connect() {
            TransportError::Connect(chain)
        } else {
            TransportError::Request(chain)
        }
    }
}

/// Joins an error with all of its sources, outermost first.
fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// An outgoing GET. The timeout is mandatory so no request can block forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub auth: Option<BasicAuth>,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            auth: None,
            verify_tls: true,
            timeout,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn basic_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Value of the query parameter `key`, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by `reqwest` with rustls.
///
/// Holds two clients because certificate verification is fixed when a
/// client is built, while sources choose it per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    verifying: Client,
    insecure: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let build = |accept_invalid: bool| {
            Client::builder()
                .use_rustls_tls()
                .danger_accept_invalid_certs(accept_invalid)
                .build()
                .map_err(TransportError::from_reqwest)
        };

        Ok(Self {
            verifying: build(false)?,
            insecure: build(true)?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = if request.verify_tls {
            &self.verifying
        } else {
            &self.insecure
        };

        let mut builder = client
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout);
        if let Some(auth) = &request.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        debug!("GET {}", request.url);
        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::from_reqwest)?;
        debug!("GET {} -> {}", request.url, status);

        Ok(HttpResponse { status, body })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
