//! Inventory files: the credentials and source drafts a run works on.
//!
//! ```json
//! {
//!   "credentials": [{"id": 1, "name": "sat", "username": "admin", "password": "..."}],
//!   "sources": [{"name": "lab", "hosts": ["sat.lab"], "port": 443, "credentials": [1],
//!                "options": {"satellite_version": "6.3"}}]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use surveyr_common::credential::{Credential, InMemoryCredentials};
use surveyr_common::source::{Source, SourceDraft};
use surveyr_core::validation::{SourceValidator, ValidationErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub credentials: Vec<Credential>,
    pub sources: Vec<SourceDraft>,
}

/// Validation result of one inventory entry, labelled for display.
pub struct Checked {
    pub label: String,
    pub result: Result<Source, ValidationErrors>,
}

impl Inventory {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read inventory {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid inventory {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn credential_store(&self) -> InMemoryCredentials {
        self.credentials.iter().cloned().collect()
    }

    /// Validates sources in file order. Each accepted name counts as
    /// existing for the sources after it.
    pub fn validate_all(&self, validator: &SourceValidator) -> Vec<Checked> {
        let mut names: HashSet<String> = HashSet::new();

        self.sources
            .iter()
            .enumerate()
            .map(|(idx, draft)| {
                let result = validator.validate(draft, &names);
                if let Ok(source) = &result {
                    names.insert(source.name.clone());
                }
                Checked {
                    label: label(idx, draft),
                    result,
                }
            })
            .collect()
    }
}

fn label(idx: usize, draft: &SourceDraft) -> String {
    match &draft.name {
        Some(Value::String(name)) if !name.trim().is_empty() => format!("source '{}'", name.escape_debug()),
        _ => format!("source #{}", idx + 1),
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
