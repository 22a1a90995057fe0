//! # Endpoint Location Service
//!
//! Implements the "where is this device plugged in" use case end to end:
//! turns whatever the operator typed into a walkable seed, walks the switch
//! topology, and enriches the report from the lookup services.

use macwalk_common::credentials::Credentials;
use macwalk_common::lookup::{EndpointDetails, HostnameResolver, UserDirectory, VendorRepository};
use macwalk_common::network::target::{EndpointIdentifier, Target};
use tracing::{debug, info};

use crate::error::WalkError;
use crate::report::WalkReport;
use crate::walker::TopologyWalker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Walked(Box<WalkReport>),
    /// The name did not resolve to an address; no switch was contacted.
    NoSuchEndpoint(String),
}

pub struct LocateService {
    walker: TopologyWalker,
    vendor_repo: Box<dyn VendorRepository>,
    resolver: Box<dyn HostnameResolver>,
    directory: Box<dyn UserDirectory>,
}

impl LocateService {
    pub fn new(
        walker: TopologyWalker,
        vendor_repo: Box<dyn VendorRepository>,
        resolver: Box<dyn HostnameResolver>,
        directory: Box<dyn UserDirectory>,
    ) -> Self {
        Self {
            walker,
            vendor_repo,
            resolver,
            directory,
        }
    }

    pub fn walker(&self) -> &TopologyWalker {
        &self.walker
    }

    /// Locates `target`, resolving names first.
    pub fn locate(
        &self,
        target: &Target,
        credentials: &mut Credentials,
    ) -> Result<Located, WalkError> {
        let (seed, name) = match target {
            Target::Endpoint(endpoint) => (*endpoint, None),
            Target::Name(name) => match self.resolve_name(name) {
                Some(seed) => (seed, Some(name.as_str())),
                None => return Ok(Located::NoSuchEndpoint(name.clone())),
            },
        };

        let mut report = self.walker.walk(seed, credentials)?;
        report.details = self.enrich(&report, name);
        Ok(Located::Walked(Box::new(report)))
    }

    /// User login or hostname to an IPv4 seed.
    ///
    /// A login known to the directory is replaced by its workstation; the host
    /// must answer ping before it is looked up in DNS.
    pub fn resolve_name(&self, name: &str) -> Option<EndpointIdentifier> {
        let host = match self.directory.workstation_of(name) {
            Some(workstation) => {
                info!("{name} last logged into {workstation}");
                workstation
            }
            None => name.to_string(),
        };

        let config = self.walker.config();
        if !self
            .walker
            .reachability()
            .probe(&host, config.quick_ping_count)
        {
            debug!(host = %host, "name does not answer ping");
            return None;
        }

        self.resolver.forward(&host).map(EndpointIdentifier::Ipv4)
    }

    /// Fills in everything the lookup services know. Each field fails on its own.
    fn enrich(&self, report: &WalkReport, name: Option<&str>) -> EndpointDetails {
        let config = self.walker.config();
        let mut details = EndpointDetails {
            mac: report.mac,
            ip: report.ip,
            ..EndpointDetails::default()
        };

        if !config.no_vendor {
            details.vendor = report.mac.and_then(|mac| self.vendor_repo.get_vendor(mac));
        }
        if !config.no_dns {
            details.hostname = report.ip.and_then(|ip| self.resolver.reverse(ip));
        }

        let hostname = details
            .hostname
            .clone()
            .or_else(|| name.map(str::to_string));
        details.user = hostname.and_then(|host| self.directory.user_on(&host));

        details
    }
}
