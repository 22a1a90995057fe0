//! The switch CLI "protocol": which commands to send to a switch and how to
//! read what comes back.
//!
//! Every assumption about command text and output layout lives here, split in two:
//! * **[`dialect`]**: one variant per supported switch family, supplying command
//!   templates, MAC text form and column layouts.
//! * **[`parsers`]**: pure functions over raw command output. A parser that finds
//!   nothing returns `None`; none of them fail.

pub mod dialect;
pub mod parsers;

pub use dialect::{CommandKind, VendorDialect};
