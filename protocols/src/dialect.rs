use std::fmt;

use macwalk_common::network::mac::MacAddress;

/// Product-family marker printed by Qtech switches in `show ver`.
const QTECH_SIGNATURE: &str = "QSW-";
const VECTOR_SIGNATURE: &str = "Vector";

/// Version dump understood by every supported family.
pub const BANNER_COMMAND: &str = "show ver";

/// A command-syntax and output-format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorDialect {
    /// Shares Vector's command syntax and output grammar.
    Qtech,
    Vector,
    Eltex,
}

/// A query the walker can ask a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind<'a> {
    /// Version banner, used to pick the dialect.
    Banner,
    /// MAC table rows containing `token`.
    MacTable { token: &'a str },
    /// ARP table rows containing `token`.
    Arp { token: &'a str },
    /// Membership of link-aggregation group number `group`.
    LagMembers { group: u32 },
    /// Neighbour-discovery rows containing `token`.
    Neighbors { token: &'a str },
    /// Every MAC learned on `port`.
    MacTableByPort { port: &'a str },
}

/// Columns of a MAC table row (whitespace-separated, zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacTableLayout {
    /// Text present only on dynamically learned rows.
    pub dynamic_marker: &'static str,
    pub vlan_column: usize,
    pub port_column: usize,
}

/// Columns of an ARP table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpLayout {
    /// Text present on every data row.
    pub vlan_marker: &'static str,
    pub ip_column: usize,
    pub mac_column: usize,
}

/// How a switch lists the ports of a link-aggregation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LagListing {
    /// Members are the whitespace-separated tokens of the line carrying `port_marker`.
    PortTokens { port_marker: &'static str },
    /// Members are the comma-separated list after the `:` on the line carrying the
    /// group id and `active_marker`.
    ActiveList { active_marker: &'static str },
}

impl VendorDialect {
    /// Classifies a switch from its version banner.
    ///
    /// The most specific signature is checked first; anything unrecognised is Eltex.
    pub fn detect(banner: &str) -> Self {
        if banner.contains(QTECH_SIGNATURE) {
            VendorDialect::Qtech
        } else if banner.contains(VECTOR_SIGNATURE) {
            VendorDialect::Vector
        } else {
            VendorDialect::Eltex
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VendorDialect::Qtech => "QTECH",
            VendorDialect::Vector => "Vector",
            VendorDialect::Eltex => "Eltex",
        }
    }

    fn is_vector_family(&self) -> bool {
        matches!(self, VendorDialect::Qtech | VendorDialect::Vector)
    }

    pub fn mac_separator(&self) -> char {
        if self.is_vector_family() { '-' } else { ':' }
    }

    /// The MAC text this dialect prints, and therefore the text to filter on.
    pub fn mac_text(&self, mac: &MacAddress) -> String {
        mac.to_separated(self.mac_separator())
    }

    pub fn command(&self, kind: CommandKind<'_>) -> String {
        let vector = self.is_vector_family();
        match kind {
            CommandKind::Banner => BANNER_COMMAND.to_string(),
            CommandKind::MacTable { token } if vector => {
                format!("show mac-address-table | inc {token}")
            }
            CommandKind::MacTable { token } => format!("show mac add | inc {token}"),
            CommandKind::Arp { token } => format!("show arp | inc {token}"),
            CommandKind::LagMembers { group } if vector => {
                format!("show interface port-channel {group}")
            }
            CommandKind::LagMembers { group } => format!("show interface channel-group {group}"),
            CommandKind::Neighbors { token } if vector => {
                format!("show lldp neighbors brief | inc {token}")
            }
            CommandKind::Neighbors { token } => format!("show lldp neighbors | inc {token}"),
            CommandKind::MacTableByPort { port } if vector => {
                format!("show mac-address-table int {port}")
            }
            CommandKind::MacTableByPort { port } => format!("show mac add int {port}"),
        }
    }

    pub fn mac_table_layout(&self) -> MacTableLayout {
        if self.is_vector_family() {
            MacTableLayout {
                dynamic_marker: "DYN",
                vlan_column: 0,
                port_column: 4,
            }
        } else {
            MacTableLayout {
                dynamic_marker: "dyn",
                vlan_column: 0,
                port_column: 2,
            }
        }
    }

    pub fn arp_layout(&self) -> ArpLayout {
        if self.is_vector_family() {
            ArpLayout {
                vlan_marker: "Vlan",
                ip_column: 0,
                mac_column: 1,
            }
        } else {
            ArpLayout {
                vlan_marker: "vlan",
                ip_column: 3,
                mac_column: 4,
            }
        }
    }

    pub fn lag_listing(&self) -> LagListing {
        if self.is_vector_family() {
            LagListing::PortTokens {
                port_marker: "Ethernet",
            }
        } else {
            LagListing::ActiveList {
                active_marker: "Act",
            }
        }
    }
}

impl fmt::Display for VendorDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
