//! Wire protocols spoken during scans.
//!
//! * **[`http`]**: the transport seam every remote call goes through.
//! * **[`satellite`]**: version-specific clients for the Satellite management API.

pub mod http;
pub mod satellite;
