//! # Surveyr Core
//!
//! Everything between a user's source definition and a finished scan task.
//!
//! * **[`validation`]**: turns loosely typed drafts into validated sources.
//! * **[`registry`]**: picks the Satellite client for a version pair.
//! * **[`task`]**: the scan task state machine and the runner contract.
//! * **[`connect`]**: the connect phase runner.

pub mod connect;
pub mod registry;
pub mod task;
pub mod validation;
