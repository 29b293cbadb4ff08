//! Satellite 6 clients.
//!
//! Satellite 6.2 still serves the Katello v1-era layout where systems hang
//! off organizations. Satellite 6.2 and 6.3 with API v2 expose a flat host
//! collection.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{
    HostRecord, SatelliteApi, SatelliteError, SatelliteSession, collect_pages, collection_total,
};

pub const ORGS_PATH: &str = "/katello/api/v2/organizations";
pub const HOSTS_V2_PATH: &str = "/api/v2/hosts";

fn systems_path(org_id: u64) -> String {
    format!("{ORGS_PATH}/{org_id}/systems")
}

#[derive(Debug, Deserialize)]
struct Organization {
    id: u64,
}

/// Satellite 6.2 speaking API v1.
#[derive(Debug, Clone)]
pub struct SatelliteSixV1 {
    session: SatelliteSession,
}

impl SatelliteSixV1 {
    pub fn new(session: SatelliteSession) -> Self {
        Self { session }
    }

    async fn organizations(&self) -> Result<Vec<Organization>, SatelliteError> {
        collect_pages(&self.session, ORGS_PATH).await
    }
}

#[async_trait]
impl SatelliteApi for SatelliteSixV1 {
    async fn status(&self) -> Result<(u16, Option<u32>), SatelliteError> {
        super::status(&self.session).await
    }

    async fn host_count(&self) -> Result<u64, SatelliteError> {
        let mut count: u64 = 0;
        for org in self.organizations().await? {
            let path = systems_path(org.id);
            let total = collection_total(&self.session, &path).await?;
            count = count.checked_add(total).ok_or(SatelliteError::Payload {
                path,
                reason: "host total overflows".into(),
            })?;
        }
        debug!("{} reports {} systems", self.session.host(), count);
        Ok(count)
    }

    async fn hosts(&self) -> Result<Vec<HostRecord>, SatelliteError> {
        let mut hosts = Vec::new();
        for org in self.organizations().await? {
            hosts.extend(collect_pages::<HostRecord>(&self.session, &systems_path(org.id)).await?);
        }
        Ok(hosts)
    }
}

/// Satellite 6.2 or 6.3 speaking API v2.
#[derive(Debug, Clone)]
pub struct SatelliteSixV2 {
    session: SatelliteSession,
}

impl SatelliteSixV2 {
    pub fn new(session: SatelliteSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SatelliteApi for SatelliteSixV2 {
    async fn status(&self) -> Result<(u16, Option<u32>), SatelliteError> {
        super::status(&self.session).await
    }

    async fn host_count(&self) -> Result<u64, SatelliteError> {
        let count = collection_total(&self.session, HOSTS_V2_PATH).await?;
        debug!("{} reports {} hosts", self.session.host(), count);
        Ok(count)
    }

    async fn hosts(&self) -> Result<Vec<HostRecord>, SatelliteError> {
        collect_pages(&self.session, HOSTS_V2_PATH).await
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
