//! Shared models for the `macwalk` workspace.
//!
//! * **[`config`]**: the immutable run configuration.
//! * **[`credentials`]**: the SSH credential pair threaded down the walk.
//! * **[`lookup`]**: ports to vendor, DNS and directory services.
//! * **[`network`]**: MAC addresses and the endpoint identifiers a walk starts from.
//! * **[`walk`]**: what a walk produces, hop by hop.

pub mod config;
pub mod credentials;
pub mod error;
pub mod log;
pub mod lookup;
pub mod network;
pub mod walk;

pub use error::ParseError;

#[doc(hidden)]
pub use tracing as __tracing;
