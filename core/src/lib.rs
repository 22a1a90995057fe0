//! The switch-walking engine.
//!
//! * **[`session`]**: interactive shells to switches, over SSH or anything else.
//! * **[`walker`]**: the hop traversal state machine.
//! * **[`locate`]**: the full use case: seed resolution, walk, enrichment.
//! * **[`retry`]**, **[`probe`]**: the core-switch retry loop and ICMP reachability.
//! * **[`vendors`]**, **[`dns`]**: lookup service adapters.

pub mod dns;
pub mod error;
pub mod locate;
pub mod probe;
pub mod report;
pub mod retry;
pub mod session;
pub mod vendors;
pub mod walker;

pub use error::{SessionError, WalkError};
