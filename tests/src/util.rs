use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use surveyr_common::config::Config;
use surveyr_common::credential::{Credential, InMemoryCredentials};
use surveyr_common::source::{Source, SourceDraft};
use surveyr_core::connect::ConnectTaskRunner;
use surveyr_core::registry::ClientRegistry;
use surveyr_core::validation::SourceValidator;
use surveyr_protocols::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub const SAT_HOST: &str = "sat.example.com";

/// Transport stub that records every request and answers by URL path.
#[derive(Default)]
pub struct RecordingTransport {
    routes: HashMap<String, Result<HttpResponse, TransportError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn json(mut self, path: &str, body: Value) -> Self {
        self.routes
            .insert(path.to_owned(), Ok(HttpResponse::new(200, body.to_string())));
        self
    }

    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.routes
            .insert(path.to_owned(), Ok(HttpResponse::new(status, "")));
        self
    }

    pub fn error(mut self, path: &str, err: TransportError) -> Self {
        self.routes.insert(path.to_owned(), Err(err));
        self
    }

    /// A Satellite 6 server reporting `api_version` and two hosts.
    pub fn satellite(api_version: u32) -> Self {
        let hosts = json!({"total": 2, "results": [{"name": "rhel-1"}, {"name": "rhel-2"}]});
        RecordingTransport::default()
            .json("/api/status", json!({"api_version": api_version}))
            .json("/api/v2/hosts", hosts.clone())
            .json(
                "/katello/api/v2/organizations",
                json!({"total": 1, "results": [{"id": 1}]}),
            )
            .json("/katello/api/v2/organizations/1/systems", hosts)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().iter().map(|r| path_of(&r.url)).collect()
    }
}

fn path_of(url: &str) -> String {
    let without_scheme = url.trim_start_matches("https://");
    without_scheme
        .find('/')
        .map(|idx| without_scheme[idx..].to_owned())
        .unwrap_or_default()
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.routes
            .get(&path_of(&request.url))
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}

pub fn credentials() -> InMemoryCredentials {
    [
        Credential {
            id: 1,
            name: "sat-admin".into(),
            username: "admin".into(),
            password: "redhat".into(),
        },
        Credential {
            id: 2,
            name: "root".into(),
            username: "root".into(),
            password: "toor".into(),
        },
    ]
    .into_iter()
    .collect()
}

pub fn validator() -> SourceValidator {
    SourceValidator::new(Arc::new(credentials()), &Config::default())
}

pub fn draft(value: Value) -> SourceDraft {
    serde_json::from_value(value).unwrap()
}

pub fn no_names() -> HashSet<String> {
    HashSet::new()
}

/// A valid Satellite source; `version` of `None` leaves the option unset.
pub fn satellite_source(version: Option<&str>) -> Source {
    let mut value = json!({
        "name": "satellite",
        "hosts": [SAT_HOST],
        "port": 443,
        "credentials": [1],
    });
    if let Some(version) = version {
        value["options"] = json!({"satellite_version": version});
    }
    validator().validate(&draft(value), &no_names()).unwrap()
}

pub fn connect_runner(transport: Arc<RecordingTransport>) -> ConnectTaskRunner {
    ConnectTaskRunner::new(
        Arc::new(ClientRegistry::default()),
        Arc::new(credentials()),
        transport,
        &Config::default(),
    )
}
