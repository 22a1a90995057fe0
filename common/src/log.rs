//! Thin wrappers over `tracing` used across the workspace.
//!
//! `success!` marks a positive outcome so the CLI formatter can tell it apart
//! from ordinary progress, `mprint!` emits a raw report line.

/// Target for report lines rendered verbatim by the CLI.
pub const PRINT_TARGET: &str = "macwalk::print";

/// Target for positive outcomes.
pub const SUCCESS_TARGET: &str = "macwalk::success";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::__tracing::info!(target: $crate::log::PRINT_TARGET, raw_msg = "")
    };
    ($msg:expr) => {
        $crate::__tracing::info!(target: $crate::log::PRINT_TARGET, raw_msg = %$msg)
    };
}
