//! # Surveyr Common
//!
//! Types shared by every surveyr crate.
//!
//! * **[`network`]**: the host specification grammar and its lazy expander.
//! * **[`source`]**: validated scan sources and the loosely typed drafts they come from.
//! * **[`credential`]**: credential records and the store they are resolved against.
//! * **[`config`]**: runtime knobs shared by the CLI and the scan runners.

pub mod config;
pub mod credential;
pub mod network;
pub mod source;

#[doc(hidden)]
pub use tracing;

/// Logs a positive outcome. Rendered with its own marker by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "surveyr::success", $($arg)*)
    };
}
