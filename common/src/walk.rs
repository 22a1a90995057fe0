pub mod hop;
pub mod location;

pub use hop::{HopResult, TerminalReason};
pub use location::{LinkAggregationGroup, PortLocation};
