//! Host specification grammar and the expansion of parsed patterns.

pub mod host_spec;
pub mod range;

pub use host_spec::{HostPattern, HostSpecError, PatternKind};
