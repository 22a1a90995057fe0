use std::fmt;

use crate::walk::location::PortLocation;

/// Why the walk stopped at a hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalReason {
    /// The address belongs to the switch itself.
    SelfOrigin,
    /// More than one address is learned behind the port: an unmanaged switch sits there.
    UnmanagedSwitch,
    /// No further switch was found. When the hop `located` the address, the
    /// endpoint is attached directly to the reported port.
    NotFound,
    /// The next switch exists but cannot be reached or logged into.
    Unreachable { host: String },
    /// The next switch was already visited earlier in this walk.
    TopologyLoop { host: String },
    /// No prompt came back within the command timeout.
    Stalled { host: String },
    /// The session died mid-visit.
    Disconnected { host: String },
    /// An IPv4 seed could not be turned into a MAC address.
    SeedUnresolved,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalReason::SelfOrigin => f.write_str("the address belongs to the switch itself"),
            TerminalReason::UnmanagedSwitch => f.write_str("behind an unmanaged switch"),
            TerminalReason::NotFound => f.write_str("no further switch found"),
            TerminalReason::Unreachable { host } => {
                write!(f, "{host} is unreachable for further analysis")
            }
            TerminalReason::TopologyLoop { host } => {
                write!(f, "topology loop detected: {host} was already visited")
            }
            TerminalReason::Stalled { host } => write!(f, "session to {host} stalled"),
            TerminalReason::Disconnected { host } => write!(f, "session to {host} was lost"),
            TerminalReason::SeedUnresolved => f.write_str("no MAC address found for the IP address"),
        }
    }
}

/// The outcome of visiting one switch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HopResult {
    pub located: bool,
    pub location: Option<PortLocation>,
    pub next_hostname: Option<String>,
    /// `None` while the walk continues past this hop.
    pub terminal: Option<TerminalReason>,
}

impl HopResult {
    pub fn located(location: PortLocation) -> Self {
        Self {
            located: true,
            location: Some(location),
            ..Self::default()
        }
    }

    pub fn terminate(mut self, reason: TerminalReason) -> Self {
        self.terminal = Some(reason);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }
}
