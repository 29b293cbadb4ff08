//! # Source Validation
//!
//! [`SourceValidator`] is the single gate between a client-supplied
//! [`SourceDraft`] and a [`Source`]. Creation, full update and partial update
//! all run the same field rules; they differ only in which record the draft
//! is compared against.
//!
//! Errors are collected per field. Within `hosts`, every invalid entry gets
//! its own message, in input order, so a list with N bad entries yields N
//! messages.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use surveyr_common::config::Config;
use surveyr_common::credential::{CredentialId, CredentialStore};
use surveyr_common::network::HostPattern;
use surveyr_common::source::{SatelliteVersion, Source, SourceDraft, SourceOptions};

pub const NAME: &str = "name";
pub const HOSTS: &str = "hosts";
pub const PORT: &str = "port";
pub const CREDENTIALS: &str = "credentials";
pub const OPTIONS: &str = "options";

const REQUIRED: &str = "This field is required.";

/// Field-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("invalid source: {}", summarize(.fields))]
pub struct ValidationErrors {
    #[serde(flatten)]
    fields: BTreeMap<&'static str, Vec<String>>,
}

fn summarize(fields: &BTreeMap<&'static str, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for `field`, empty when the field passed.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        self.fields.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    /// Records the outcome of one field check, keeping the value on success.
    fn take<T>(&mut self, field: &'static str, result: Result<T, Vec<String>>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(messages) => {
                messages.into_iter().for_each(|m| self.add(field, m));
                None
            }
        }
    }
}

type FieldResult<T> = Result<T, Vec<String>>;

fn fail<T>(message: impl Into<String>) -> FieldResult<T> {
    Err(vec![message.into()])
}

pub struct SourceValidator {
    credentials: Arc<dyn CredentialStore>,
    max_name_len: usize,
    max_hosts_per_pattern: u64,
}

impl SourceValidator {
    pub fn new(credentials: Arc<dyn CredentialStore>, config: &Config) -> Self {
        Self {
            credentials,
            max_name_len: config.max_name_len,
            max_hosts_per_pattern: config.max_hosts_per_pattern,
        }
    }

    /// Validates a new source. `existing_names` holds the names of every
    /// stored source; name comparison is case-sensitive.
    pub fn validate(
        &self,
        draft: &SourceDraft,
        existing_names: &HashSet<String>,
    ) -> Result<Source, ValidationErrors> {
        self.check(draft, |name| existing_names.contains(name))
    }

    /// Validates a full replacement of `current`. Keeping its own name is
    /// not a conflict.
    pub fn validate_update(
        &self,
        current: &Source,
        draft: &SourceDraft,
        existing_names: &HashSet<String>,
    ) -> Result<Source, ValidationErrors> {
        self.check(draft, |name| {
            name != current.name && existing_names.contains(name)
        })
    }

    /// Overlays `patch` onto `current` and validates the result.
    pub fn validate_partial_update(
        &self,
        current: &Source,
        patch: &SourceDraft,
        existing_names: &HashSet<String>,
    ) -> Result<Source, ValidationErrors> {
        let merged = current.to_draft().merged_with(patch);
        self.validate_update(current, &merged, existing_names)
    }

    fn check(
        &self,
        draft: &SourceDraft,
        is_taken: impl Fn(&str) -> bool,
    ) -> Result<Source, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = errors.take(NAME, self.check_name(draft.name.as_ref(), &is_taken));
        let hosts = errors.take(HOSTS, self.check_hosts(draft.hosts.as_ref()));
        let port = errors.take(PORT, check_port(draft.port.as_ref()));
        let credentials = errors.take(CREDENTIALS, self.check_credentials(draft.credentials.as_ref()));
        let options = errors.take(OPTIONS, check_options(draft.options.as_ref()));

        match (name, hosts, port, credentials, options) {
            (Some(name), Some(hosts), Some(port), Some(credentials), Some(options)) => Ok(Source {
                name,
                hosts,
                port,
                credentials,
                options,
            }),
            _ => {
                debug!("source rejected: {}", errors);
                Err(errors)
            }
        }
    }

    fn check_name(
        &self,
        value: Option<&Value>,
        is_taken: &impl Fn(&str) -> bool,
    ) -> FieldResult<String> {
        let name = match value {
            None | Some(Value::Null) => return fail(REQUIRED),
            Some(Value::String(name)) => name,
            Some(_) => return fail("Not a valid string."),
        };

        if name.chars().any(char::is_control) {
            return fail("Source name must not contain unprintable characters.");
        }
        if name.trim().is_empty() {
            return fail("This field may not be blank.");
        }
        if name.chars().count() > self.max_name_len {
            return fail(format!(
                "Ensure this field has no more than {} characters.",
                self.max_name_len
            ));
        }
        if is_taken(name) {
            return fail(format!("A source named '{name}' already exists."));
        }
        Ok(name.clone())
    }

    fn check_hosts(&self, value: Option<&Value>) -> FieldResult<Vec<HostPattern>> {
        let entries = match value {
            None | Some(Value::Null) => return fail(REQUIRED),
            Some(Value::Array(entries)) => entries,
            Some(_) => return fail("Expected a list of host specifications."),
        };
        if entries.is_empty() {
            return fail("At least one host is required.");
        }

        let mut patterns = Vec::with_capacity(entries.len());
        let mut messages = Vec::new();

        for entry in entries {
            let Some(token) = entry.as_str() else {
                messages.push(format!("{entry}: host must be a string"));
                continue;
            };
            match HostPattern::parse(token) {
                Ok(pattern) if pattern.cardinality() > self.max_hosts_per_pattern => {
                    messages.push(format!(
                        "{token}: denotes {} hosts, more than the limit of {}",
                        pattern.cardinality(),
                        self.max_hosts_per_pattern
                    ));
                }
                Ok(pattern) => patterns.push(pattern),
                Err(err) => messages.push(format!("{token}: {err}")),
            }
        }

        if messages.is_empty() {
            Ok(patterns)
        } else {
            Err(messages)
        }
    }

    fn check_credentials(&self, value: Option<&Value>) -> FieldResult<Vec<CredentialId>> {
        let entries = match value {
            None | Some(Value::Null) => return fail(REQUIRED),
            Some(Value::Array(entries)) => entries,
            Some(_) => return fail("Expected a list of credential ids."),
        };
        if entries.is_empty() {
            return fail("At least one credential is required.");
        }

        let mut ids: Vec<CredentialId> = Vec::with_capacity(entries.len());
        let mut messages = Vec::new();

        for entry in entries {
            match credential_id(entry) {
                None => messages.push(format!("{entry} is not a valid credential id.")),
                Some(id) if self.credentials.resolve(id).is_none() => {
                    messages.push(format!("Credential {id} does not exist."));
                }
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
            }
        }

        if messages.is_empty() {
            Ok(ids)
        } else {
            Err(messages)
        }
    }
}

/// Accepts integers and decimal strings, like a form field would.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn credential_id(value: &Value) -> Option<CredentialId> {
    integer(value).and_then(|id| CredentialId::try_from(id).ok())
}

fn check_port(value: Option<&Value>) -> FieldResult<u16> {
    let value = match value {
        None | Some(Value::Null) => return fail(REQUIRED),
        Some(value) => value,
    };

    let Some(port) = integer(value) else {
        return fail("A valid integer is required.");
    };
    match u16::try_from(port) {
        Ok(port) if port != 0 => Ok(port),
        _ => fail("Ensure this value is between 1 and 65535."),
    }
}

fn check_options(value: Option<&Value>) -> FieldResult<SourceOptions> {
    let map: &Map<String, Value> = match value {
        None | Some(Value::Null) => return Ok(SourceOptions::default()),
        Some(Value::Object(map)) => map,
        Some(_) => return fail("Expected an object."),
    };

    let mut options = SourceOptions::default();
    let mut messages = Vec::new();

    for (key, value) in map {
        match (key.as_str(), value) {
            ("satellite_version", Value::Null) => {}
            ("satellite_version", Value::String(raw)) => match raw.parse::<SatelliteVersion>() {
                Ok(version) => options.satellite_version = Some(version),
                Err(err) => messages.push(format!(
                    "{err}, expected one of {}.",
                    SatelliteVersion::ALL.map(|v| v.as_str()).join(", ")
                )),
            },
            ("satellite_version", _) => messages.push("satellite_version must be a string.".into()),
            ("ssl_cert_verify", Value::Bool(verify)) => options.ssl_cert_verify = *verify,
            ("ssl_cert_verify", _) => messages.push("ssl_cert_verify must be true or false.".into()),
            (other, _) => messages.push(format!("Unknown option '{other}'.")),
        }
    }

    if messages.is_empty() {
        Ok(options)
    } else {
        Err(messages)
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
