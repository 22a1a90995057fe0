use std::net::Ipv4Addr;

use macwalk_common::lookup::EndpointDetails;
use macwalk_common::network::mac::MacAddress;
use macwalk_common::network::target::EndpointIdentifier;
use macwalk_common::walk::{HopResult, LinkAggregationGroup, TerminalReason};
use macwalk_protocols::VendorDialect;

/// What was learned on one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRecord {
    /// Zero for the core switch.
    pub hop: usize,
    pub hostname: String,
    /// `None` when the session failed before the banner was read.
    pub dialect: Option<VendorDialect>,
    pub lag: Option<LinkAggregationGroup>,
    /// Physical location parsed from the MAC table; never set for the core.
    pub location_tag: Option<String>,
    pub result: HopResult,
}

impl HopRecord {
    pub fn new(hop: usize, hostname: impl Into<String>) -> Self {
        Self {
            hop,
            hostname: hostname.into(),
            dialect: None,
            lag: None,
            location_tag: None,
            result: HopResult::default(),
        }
    }

    pub fn terminate(mut self, reason: TerminalReason) -> Self {
        self.result = self.result.terminate(reason);
        self
    }
}

/// A finished walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkReport {
    pub target: EndpointIdentifier,
    /// The MAC actually walked; differs from `target` for IP seeds.
    pub mac: Option<MacAddress>,
    /// IPv4 of the endpoint, from the seed or the core's ARP table.
    pub ip: Option<Ipv4Addr>,
    pub hops: Vec<HopRecord>,
    pub details: EndpointDetails,
}

impl WalkReport {
    pub fn last_hop(&self) -> Option<&HopRecord> {
        self.hops.last()
    }

    pub fn terminal(&self) -> Option<&TerminalReason> {
        self.last_hop()?.result.terminal.as_ref()
    }

    /// The deepest hop that actually located the address.
    pub fn deepest_location(&self) -> Option<&HopRecord> {
        self.hops.iter().rev().find(|h| h.result.located)
    }

    /// Hostnames in visiting order.
    pub fn path(&self) -> Vec<&str> {
        self.hops.iter().map(|h| h.hostname.as_str()).collect()
    }
}
