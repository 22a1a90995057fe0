//! Readers for raw switch output.
//!
//! Output is treated as lines of whitespace-separated columns. Matching against
//! addresses and port names is token-exact, so `10.0.0.1` never matches a row for
//! `10.0.0.10` and `gi1/0/1` never matches `gi1/0/12`.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

use macwalk_common::network::mac::MacAddress;
use macwalk_common::walk::{LinkAggregationGroup, PortLocation};
use regex::Regex;
use tracing::trace;

use crate::dialect::{LagListing, VendorDialect};

/// Row markers a switch uses for addresses owned by its own control plane.
const SELF_MARKERS: [&str; 2] = ["self", "CPU"];

fn lag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Po\d+|Po[\w-]+\d+").expect("valid LAG pattern"))
}

fn group_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9]+-\d-[A-Za-z0-9]+").expect("valid location pattern")
    })
}

fn neighbor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[sS][wW]\d+").expect("valid hostname pattern"))
}

fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){5}").expect("valid MAC pattern")
    })
}

fn has_token(line: &str, token: &str) -> bool {
    line.split_whitespace().any(|t| t.eq_ignore_ascii_case(token))
}

fn column(line: &str, idx: usize) -> Option<&str> {
    line.split_whitespace().nth(idx)
}

/// Finds the MAC bound to `ip` in ARP output.
pub fn mac_from_arp(output: &str, ip: Ipv4Addr, dialect: VendorDialect) -> Option<MacAddress> {
    let layout = dialect.arp_layout();
    let ip = ip.to_string();

    output
        .lines()
        .filter(|line| line.contains(layout.vlan_marker) && has_token(line, &ip))
        .find_map(|line| column(line, layout.mac_column)?.parse().ok())
}

/// Finds the port a MAC was dynamically learned on.
///
/// Any row flagged as the switch's own address wins over dynamic rows.
pub fn port_from_mac_table(
    output: &str,
    mac_text: &str,
    dialect: VendorDialect,
) -> Option<PortLocation> {
    if output
        .lines()
        .any(|line| SELF_MARKERS.iter().any(|marker| line.contains(marker)))
    {
        return Some(PortLocation::self_origin());
    }

    let layout = dialect.mac_table_layout();
    output
        .lines()
        .filter(|line| line.contains(layout.dynamic_marker) && has_token(line, mac_text))
        .find_map(|line| {
            let port = column(line, layout.port_column)?;
            let vlan = column(line, layout.vlan_column).map(str::to_string);
            Some(PortLocation::on_port(port, vlan))
        })
}

/// Finds the IPv4 address of the first ARP row learned on `port`.
pub fn ip_from_arp(output: &str, port: &str, dialect: VendorDialect) -> Option<Ipv4Addr> {
    let layout = dialect.arp_layout();

    output
        .lines()
        .filter(|line| has_token(line, port))
        .find_map(|line| column(line, layout.ip_column)?.parse().ok())
}

/// Extracts a physical-location tag such as `b12-3-r4` from arbitrary output.
pub fn location_tag(output: &str) -> Option<String> {
    location_regex()
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Returns the LAG id when `port` names an aggregated interface.
pub fn lag_id_from_port(port: &str) -> Option<String> {
    lag_regex().find(port).map(|m| m.as_str().to_string())
}

/// The numeric group of a LAG id: its first run of digits.
pub fn lag_group_number(lag_id: &str) -> Option<u32> {
    group_number_regex().find(lag_id)?.as_str().parse().ok()
}

/// Reads the member ports of `lag_id` from the LAG listing command.
pub fn lag_members(
    output: &str,
    lag_id: &str,
    dialect: VendorDialect,
) -> Option<LinkAggregationGroup> {
    let members: Vec<String> = match dialect.lag_listing() {
        LagListing::PortTokens { port_marker } => output
            .lines()
            .find(|line| line.contains(port_marker))?
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        LagListing::ActiveList { active_marker } => output
            .lines()
            .find(|line| line.contains(lag_id) && line.contains(active_marker))?
            .split(':')
            .nth(1)?
            .split(',')
            .filter_map(|member| member.split_whitespace().next())
            .map(str::to_string)
            .collect(),
    };

    trace!(lag = lag_id, ?members, "LAG listing parsed");
    LinkAggregationGroup::new(lag_id, members)
}

/// Finds the switch hostname advertised by the neighbour on `port`.
pub fn next_hostname(output: &str, port: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        if !tokens.next()?.eq_ignore_ascii_case(port) {
            return None;
        }
        let rest: Vec<&str> = tokens.collect();
        neighbor_regex()
            .find(&rest.join(" "))
            .map(|m| m.as_str().to_string())
    })
}

/// More than one distinct MAC on a single access port means a switch nobody manages.
pub fn is_unmanaged_switch(output: &str) -> bool {
    let distinct: HashSet<MacAddress> = mac_regex()
        .find_iter(output)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    distinct.len() > 1
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
