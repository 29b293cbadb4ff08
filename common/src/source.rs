//! # Scan Sources
//!
//! A [`Source`] is the validated form of a scan target: a unique name, the
//! host patterns to reach, the port to use and the credentials to try.
//!
//! Sources are never built directly from user input. Input arrives as a
//! [`SourceDraft`] whose fields are untyped JSON, and only the validator in
//! `surveyr-core` turns a draft into a `Source`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::credential::CredentialId;
use crate::network::HostPattern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown satellite version '{0}'")]
pub struct UnknownSatelliteVersion(pub String);

/// Release line of the Satellite server behind a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SatelliteVersion {
    /// Satellite 5. Recognized so it can be refused with a clear message.
    Five,
    SixTwo,
    SixThree,
}

impl SatelliteVersion {
    pub const ALL: [SatelliteVersion; 3] = [Self::Five, Self::SixTwo, Self::SixThree];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Five => "5",
            Self::SixTwo => "6.2",
            Self::SixThree => "6.3",
        }
    }
}

impl fmt::Display for SatelliteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SatelliteVersion {
    type Err = UnknownSatelliteVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownSatelliteVersion(s.to_owned()))
    }
}

impl Serialize for SatelliteVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SatelliteVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOptions {
    pub satellite_version: Option<SatelliteVersion>,
    pub ssl_cert_verify: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            satellite_version: None,
            ssl_cert_verify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: String,
    /// Kept in input order so errors and probes refer to the first entry.
    pub hosts: Vec<HostPattern>,
    pub port: u16,
    /// Distinct ids in first-seen order.
    pub credentials: Vec<CredentialId>,
    pub options: SourceOptions,
}

impl Source {
    /// Turns the source back into the draft it could have been validated from.
    pub fn to_draft(&self) -> SourceDraft {
        let mut options = Map::new();
        if let Some(version) = self.options.satellite_version {
            options.insert("satellite_version".into(), json!(version.as_str()));
        }
        options.insert("ssl_cert_verify".into(), json!(self.options.ssl_cert_verify));

        SourceDraft {
            name: Some(json!(self.name)),
            hosts: Some(Value::Array(
                self.hosts.iter().map(|h| json!(h.as_str())).collect(),
            )),
            port: Some(json!(self.port)),
            credentials: Some(json!(self.credentials)),
            options: Some(Value::Object(options)),
        }
    }

    /// First concrete host of the first pattern, the address probes go to.
    pub fn primary_host(&self) -> Option<String> {
        self.hosts.first().and_then(|pattern| pattern.expand().next())
    }
}

/// Candidate source as received from a client. Any field may be missing or
/// hold the wrong JSON type; the validator reports those per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl SourceDraft {
    /// Overlays every field present in `patch` onto `self`.
    pub fn merged_with(mut self, patch: &SourceDraft) -> SourceDraft {
        let overlay = |field: &mut Option<Value>, value: &Option<Value>| {
            if value.is_some() {
                field.clone_from(value);
            }
        };

        overlay(&mut self.name, &patch.name);
        overlay(&mut self.hosts, &patch.hosts);
        overlay(&mut self.port, &patch.port);
        overlay(&mut self.credentials, &patch.credentials);
        overlay(&mut self.options, &patch.options);
        self
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
