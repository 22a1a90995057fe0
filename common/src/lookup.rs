//! Ports to the outside services consulted while building an endpoint report.
//!
//! Every lookup answers `None` on failure; a missing field never aborts a walk.

use std::net::Ipv4Addr;

use crate::network::mac::MacAddress;

/// The registered owner of a MAC address block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInfo {
    pub organization: String,
    pub country: Option<String>,
    pub last_updated: Option<String>,
}

/// A person known to be logged into a workstation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub login: String,
    pub display_name: Option<String>,
    pub last_logon: Option<String>,
}

pub trait VendorRepository: Send + Sync {
    fn get_vendor(&self, mac: MacAddress) -> Option<VendorInfo>;
}

pub trait HostnameResolver: Send + Sync {
    /// Short hostname (first DNS label) for `ip`.
    fn reverse(&self, ip: Ipv4Addr) -> Option<String>;
    fn forward(&self, name: &str) -> Option<Ipv4Addr>;
}

/// Maps people to workstations and back.
pub trait UserDirectory: Send + Sync {
    /// The workstation a user last logged into.
    fn workstation_of(&self, login: &str) -> Option<String>;
    fn user_on(&self, hostname: &str) -> Option<DirectoryUser>;
}

/// A directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDirectory;

impl UserDirectory for NoDirectory {
    fn workstation_of(&self, _login: &str) -> Option<String> {
        None
    }

    fn user_on(&self, _hostname: &str) -> Option<DirectoryUser> {
        None
    }
}

/// Everything known about the endpoint at the end of a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDetails {
    pub mac: Option<MacAddress>,
    pub ip: Option<Ipv4Addr>,
    pub hostname: Option<String>,
    pub vendor: Option<VendorInfo>,
    pub user: Option<DirectoryUser>,
}
