use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A six-octet hardware address.
///
/// Accepts colon- or hyphen-separated text in any case; always displays as
/// lowercase colon-separated text. Equality is on the octets, so
/// `AA-BB-CC-DD-EE-FF` and `aa:bb:cc:dd:ee:ff` are the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Renders the address with `separator` between lowercase hex octets.
    pub fn to_separated(&self, separator: char) -> String {
        let mut out = String::with_capacity(17);
        for (idx, octet) in self.0.iter().enumerate() {
            if idx > 0 {
                out.push(separator);
            }
            out.push_str(&format!("{octet:02x}"));
        }
        out
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_separated(':'))
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseError::InvalidMac(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 17 {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (idx, octet) in octets.iter_mut().enumerate() {
            let start = idx * 3;
            if idx > 0 && !matches!(bytes[start - 1], b':' | b'-') {
                return Err(invalid());
            }
            let pair = s.get(start..start + 2).ok_or_else(invalid)?;
            if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }

        Ok(Self(octets))
    }
}

/// Returns true when `s` is a colon- or hyphen-separated six-octet hex string.
pub fn is_mac_address(s: &str) -> bool {
    s.parse::<MacAddress>().is_ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
