use std::net::{IpAddr, Ipv4Addr};

use dns_lookup::{lookup_addr, lookup_host};
use macwalk_common::lookup::HostnameResolver;
use tracing::debug;

/// Name lookups through the system resolver.
pub struct SystemResolver;

impl HostnameResolver for SystemResolver {
    fn reverse(&self, ip: Ipv4Addr) -> Option<String> {
        match lookup_addr(&IpAddr::V4(ip)) {
            // The resolver echoes the address back when there is no PTR record.
            Ok(name) if name != ip.to_string() => short_hostname(&name),
            Ok(_) => None,
            Err(e) => {
                debug!("reverse lookup of {ip} failed: {e}");
                None
            }
        }
    }

    fn forward(&self, name: &str) -> Option<Ipv4Addr> {
        match lookup_host(name) {
            Ok(addrs) => addrs.into_iter().find_map(|addr| match addr {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            }),
            Err(e) => {
                debug!("lookup of {name} failed: {e}");
                None
            }
        }
    }
}

/// First label of a DNS name.
pub fn short_hostname(fqdn: &str) -> Option<String> {
    fqdn.split('.')
        .next()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}
