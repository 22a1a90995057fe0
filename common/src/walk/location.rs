use std::fmt;

/// Port name reported when the address belongs to the switch itself.
pub const SELF_PORT: &str = "self";

/// Where a MAC address was learned on one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLocation {
    /// Vendor-native port name, e.g. `gi1/0/5` or `Ethernet1/0/5`.
    pub port: String,
    pub vlan: Option<String>,
    /// The address is the switch's own control plane.
    pub is_self: bool,
}

impl PortLocation {
    pub fn on_port(port: impl Into<String>, vlan: Option<String>) -> Self {
        Self {
            port: port.into(),
            vlan,
            is_self: false,
        }
    }

    pub fn self_origin() -> Self {
        Self {
            port: SELF_PORT.to_string(),
            vlan: None,
            is_self: true,
        }
    }
}

impl fmt::Display for PortLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vlan {
            Some(vlan) => write!(f, "{} (vlan {vlan})", self.port),
            None => f.write_str(&self.port),
        }
    }
}

/// A logical port together with the physical ports behind it.
///
/// Only constructed with at least one member; a group whose members cannot be
/// resolved is treated as a plain port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAggregationGroup {
    id: String,
    members: Vec<String>,
}

impl LinkAggregationGroup {
    pub fn new(id: impl Into<String>, members: Vec<String>) -> Option<Self> {
        let members: Vec<String> = members
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if members.is_empty() {
            return None;
        }

        Some(Self {
            id: id.into(),
            members,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Member ports in the order the switch listed them.
    pub fn members(&self) -> &[String] {
        &self.members
    }
}
