//! # Walk Target Model
//!
//! Defines what a walk can be asked to find:
//! * A MAC address (`aa:bb:cc:dd:ee:ff` or `AA-BB-CC-DD-EE-FF`).
//! * A dotted-quad IPv4 address, resolved to a MAC through the core switch's ARP table.
//! * A user or host name, resolved to an IPv4 address outside the walk.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ParseError;
use crate::network::mac::MacAddress;

/// The identifier a walk is seeded with once every name has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointIdentifier {
    Mac(MacAddress),
    Ipv4(Ipv4Addr),
}

impl EndpointIdentifier {
    pub fn mac(&self) -> Option<MacAddress> {
        match self {
            EndpointIdentifier::Mac(mac) => Some(*mac),
            EndpointIdentifier::Ipv4(_) => None,
        }
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            EndpointIdentifier::Ipv4(ip) => Some(*ip),
            EndpointIdentifier::Mac(_) => None,
        }
    }
}

impl fmt::Display for EndpointIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointIdentifier::Mac(mac) => write!(f, "{mac}"),
            EndpointIdentifier::Ipv4(ip) => write!(f, "{ip}"),
        }
    }
}

/// Raw user input, before names are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Endpoint(EndpointIdentifier),
    /// A login or hostname; resolved through the directory and DNS.
    Name(String),
}

impl FromStr for Target {
    type Err = ParseError;

    /// Parses a string into a `Target`.
    ///
    /// MAC addresses win over everything else, then IPv4 addresses; any other
    /// single token is taken as a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(mac) = s.parse::<MacAddress>() {
            return Ok(Target::Endpoint(EndpointIdentifier::Mac(mac)));
        }

        if let Some(ip) = parse_ipv4(s) {
            return Ok(Target::Endpoint(EndpointIdentifier::Ipv4(ip)));
        }

        if looks_like_ipv4(s) {
            return Err(ParseError::InvalidTarget(s.to_string()));
        }

        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(ParseError::InvalidTarget(s.to_string()));
        }

        Ok(Target::Name(s.to_lowercase()))
    }
}

/// Returns true for dotted-quad strings with every octet in `0..=255`.
pub fn is_ipv4_address(s: &str) -> bool {
    parse_ipv4(s.trim()).is_some()
}

fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    s.parse::<Ipv4Addr>().ok()
}

/// Digits and dots only: a mistyped address, not a hostname.
fn looks_like_ipv4(s: &str) -> bool {
    !s.is_empty() && s.contains('.') && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
