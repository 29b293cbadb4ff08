//! Maps a Satellite release and the API version it reports to the client
//! that speaks it.

use std::collections::HashMap;

use surveyr_common::source::SatelliteVersion;
use surveyr_protocols::satellite::{ClientKind, SatelliteClient, SatelliteSession};

/// Lookup table of supported `(release, api version)` pairs.
///
/// Built once, then shared read-only between runners. Satellite 5 never
/// resolves, whatever has been registered for it.
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    entries: HashMap<(SatelliteVersion, u32), ClientKind>,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::empty()
            .with_entry(SatelliteVersion::SixTwo, 1, ClientKind::SixV1)
            .with_entry(SatelliteVersion::SixTwo, 2, ClientKind::SixV2)
            .with_entry(SatelliteVersion::SixThree, 2, ClientKind::SixV2)
    }
}

impl ClientRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, version: SatelliteVersion, api_version: u32, kind: ClientKind) -> Self {
        self.entries.insert((version, api_version), kind);
        self
    }

    pub fn lookup(&self, version: SatelliteVersion, api_version: Option<u32>) -> Option<ClientKind> {
        if version == SatelliteVersion::Five {
            return None;
        }
        self.entries.get(&(version, api_version?)).copied()
    }

    /// Binds `session` to the client for the pair, or `None` if unsupported.
    pub fn resolve(
        &self,
        version: SatelliteVersion,
        api_version: Option<u32>,
        session: SatelliteSession,
    ) -> Option<SatelliteClient> {
        self.lookup(version, api_version).map(|kind| kind.bind(session))
    }

    /// Registered pairs, sorted.
    pub fn entries(&self) -> Vec<(SatelliteVersion, u32, ClientKind)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(&(version, api), &kind)| (version, api, kind))
            .collect();
        entries.sort_by_key(|&(version, api, _)| (version, api));
        entries
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
