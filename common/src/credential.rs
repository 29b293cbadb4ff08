//! Credentials referenced by sources.
//!
//! Secrets are owned elsewhere; this crate only needs to know that an id
//! resolves and, for the connect phase, which username and password to send.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type CredentialId = u64;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Lookup of credentials by id.
pub trait CredentialStore: Send + Sync {
    fn resolve(&self, id: CredentialId) -> Option<Credential>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    by_id: HashMap<CredentialId, Credential>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `credential`, replacing any previous one with the same id.
    pub fn insert(&mut self, credential: Credential) {
        self.by_id.insert(credential.id, credential);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Credential> for InMemoryCredentials {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        let mut store = Self::new();
        iter.into_iter().for_each(|c| store.insert(c));
        store
    }
}

impl CredentialStore for InMemoryCredentials {
    fn resolve(&self, id: CredentialId) -> Option<Credential> {
        self.by_id.get(&id).cloned()
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
