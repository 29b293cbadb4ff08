//! # Satellite API
//!
//! Clients for the Satellite systems-management HTTP API.
//!
//! Every release line is reached through the same [`SatelliteApi`] capability
//! set. Which concrete client serves a source is decided from the configured
//! Satellite version and the API version the server reports on its status
//! endpoint; that decision lives in the core registry, which hands back a
//! [`SatelliteClient`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use surveyr_common::credential::{CredentialId, CredentialStore};
use surveyr_common::source::Source;

use crate::http::{BasicAuth, HttpRequest, HttpResponse, HttpTransport, TransportError};

mod six;

pub use six::{SatelliteSixV1, SatelliteSixV2};

pub const STATUS_PATH: &str = "/api/status";
pub const PER_PAGE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SatelliteError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("unexpected response from {path}: {reason}")]
    Payload { path: String, reason: String },
    #[error("source '{0}' has no host to connect to")]
    NoHost(String),
    #[error("source '{0}' has no credential")]
    NoCredential(String),
    #[error("credential {0} could not be resolved")]
    UnresolvedCredential(CredentialId),
}

/// One managed system as reported by Satellite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Everything needed to talk to one Satellite server.
#[derive(Clone)]
pub struct SatelliteSession {
    host: String,
    port: u16,
    auth: BasicAuth,
    verify_tls: bool,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for SatelliteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SatelliteSession")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth", &self.auth)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SatelliteSession {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        auth: BasicAuth,
        verify_tls: bool,
        timeout: Duration,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            auth,
            verify_tls,
            timeout,
            transport,
        }
    }

    /// Binds a session to the first host and first credential of `source`.
    pub fn for_source(
        source: &Source,
        credentials: &dyn CredentialStore,
        transport: Arc<dyn HttpTransport>,
        timeout: Duration,
    ) -> Result<Self, SatelliteError> {
        let host = source
            .primary_host()
            .ok_or_else(|| SatelliteError::NoHost(source.name.clone()))?;
        let id = *source
            .credentials
            .first()
            .ok_or_else(|| SatelliteError::NoCredential(source.name.clone()))?;
        let credential = credentials
            .resolve(id)
            .ok_or(SatelliteError::UnresolvedCredential(id))?;

        let auth = BasicAuth {
            username: credential.username,
            password: credential.password,
        };
        Ok(Self::new(
            host,
            source.port,
            auth,
            source.options.ssl_cert_verify,
            timeout,
            transport,
        ))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}:{}{}", self.host, self.port, path)
    }

    pub fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(self.url(path), self.timeout)
            .basic_auth(self.auth.clone())
            .verify_tls(self.verify_tls)
    }

    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.transport.get(request).await
    }

    /// GETs `path` and decodes the body, treating anything but 200 as an error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, u64)],
    ) -> Result<T, SatelliteError> {
        let request = query
            .iter()
            .fold(self.request(path), |req, (key, value)| req.query(key, value));

        let response = self.send(&request).await?;
        if !response.is_ok() {
            return Err(SatelliteError::Status {
                path: path.to_owned(),
                status: response.status,
            });
        }
        decode(path, &response.body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, SatelliteError> {
    serde_json::from_str(body).map_err(|e| SatelliteError::Payload {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// Probes the status endpoint.
///
/// Returns the HTTP status and, for a 200 response, the `api_version` the
/// server reports. A missing or non-integer version is `None`.
pub async fn status(session: &SatelliteSession) -> Result<(u16, Option<u32>), SatelliteError> {
    let response = session.send(&session.request(STATUS_PATH)).await?;
    debug!("status probe of {} returned {}", session.host(), response.status);

    if !response.is_ok() {
        return Ok((response.status, None));
    }

    let body: Value = decode(STATUS_PATH, &response.body)?;
    let api_version = body
        .get("api_version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok());

    Ok((response.status, api_version))
}

/// The fixed capability set every Satellite client offers.
#[async_trait]
pub trait SatelliteApi: Send + Sync {
    async fn status(&self) -> Result<(u16, Option<u32>), SatelliteError>;

    /// Number of systems the server manages.
    async fn host_count(&self) -> Result<u64, SatelliteError>;

    /// Every managed system.
    async fn hosts(&self) -> Result<Vec<HostRecord>, SatelliteError>;
}

/// Concrete client families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientKind {
    SixV1,
    SixV2,
}

impl ClientKind {
    pub fn bind(self, session: SatelliteSession) -> SatelliteClient {
        match self {
            ClientKind::SixV1 => SatelliteClient::SixV1(SatelliteSixV1::new(session)),
            ClientKind::SixV2 => SatelliteClient::SixV2(SatelliteSixV2::new(session)),
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::SixV1 => f.write_str("satellite 6 (api v1)"),
            ClientKind::SixV2 => f.write_str("satellite 6 (api v2)"),
        }
    }
}

/// A client bound to a session, one variant per [`ClientKind`].
#[derive(Debug, Clone)]
pub enum SatelliteClient {
    SixV1(SatelliteSixV1),
    SixV2(SatelliteSixV2),
}

impl SatelliteClient {
    pub fn kind(&self) -> ClientKind {
        match self {
            SatelliteClient::SixV1(_) => ClientKind::SixV1,
            SatelliteClient::SixV2(_) => ClientKind::SixV2,
        }
    }

    fn api(&self) -> &dyn SatelliteApi {
        match self {
            SatelliteClient::SixV1(client) => client,
            SatelliteClient::SixV2(client) => client,
        }
    }
}

#[async_trait]
impl SatelliteApi for SatelliteClient {
    async fn status(&self) -> Result<(u16, Option<u32>), SatelliteError> {
        self.api().status().await
    }

    async fn host_count(&self) -> Result<u64, SatelliteError> {
        self.api().host_count().await
    }

    async fn hosts(&self) -> Result<Vec<HostRecord>, SatelliteError> {
        self.api().hosts().await
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default)]
    total: u64,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Reads the `total` of a paginated collection from its first page.
async fn collection_total(session: &SatelliteSession, path: &str) -> Result<u64, SatelliteError> {
    let page: Page<Value> = session
        .get_json(path, &[("page", 1), ("per_page", PER_PAGE)])
        .await?;
    Ok(page.total)
}

/// Walks a paginated collection until `total` items arrived or a short page
/// ends it. The first page's `total` fixes how many pages may be requested.
async fn collect_pages<T: DeserializeOwned>(
    session: &SatelliteSession,
    path: &str,
) -> Result<Vec<T>, SatelliteError> {
    let mut items = Vec::new();
    let mut page_number: u64 = 1;
    let mut last_page: Option<u64> = None;

    loop {
        let page: Page<T> = session
            .get_json(path, &[("page", page_number), ("per_page", PER_PAGE)])
            .await?;
        let last_page = *last_page.get_or_insert(page.total.div_ceil(PER_PAGE));
        let received = page.results.len() as u64;

        items.extend(page.results);
        if received < PER_PAGE || items.len() as u64 >= page.total {
            break;
        }
        if page_number >= last_page {
            return Err(SatelliteError::Payload {
                path: path.to_owned(),
                reason: format!("more than the {last_page} pages announced"),
            });
        }
        page_number += 1;
    }

    debug!("collected {} items from {}", items.len(), path);
    Ok(items)
}


// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
