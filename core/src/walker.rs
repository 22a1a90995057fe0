//! The hop traversal engine.
//!
//! A walk starts on the core switch and follows the target MAC downstream one
//! switch at a time. Each visit runs the same stages on a fresh session:
//!
//! 1. **Detect vendor**: read the version banner and pick a [`VendorDialect`].
//! 2. **Resolve from IP** (first hop, IP seeds only): turn the IPv4 into a MAC via ARP.
//! 3. **Locate**: find the port the MAC is learned on.
//! 4. **Expand LAG**: when that port is an aggregate, list its member ports.
//! 5. **Resolve address** (first hop): find the endpoint's IPv4 for the report.
//! 6. **Find next hop**: ask neighbour discovery who sits behind the port.
//!
//! The walk ends on the first terminal [`HopResult`]. Sessions never outlive
//! their hop.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use macwalk_common::config::Config;
use macwalk_common::credentials::Credentials;
use macwalk_common::lookup::EndpointDetails;
use macwalk_common::network::mac::MacAddress;
use macwalk_common::network::target::EndpointIdentifier;
use macwalk_common::walk::{HopResult, PortLocation, TerminalReason};
use macwalk_protocols::dialect::BANNER_COMMAND;
use macwalk_protocols::{CommandKind, VendorDialect, parsers};
use tracing::{debug, warn};

use crate::error::{SessionError, WalkError};
use crate::probe::Reachability;
use crate::report::{HopRecord, WalkReport};
use crate::retry::{self, Prompter};
use crate::session::{SwitchConnector, SwitchShell};

type StageCallback = Box<dyn Fn(&str) + Send + Sync>;

/// What the walk knows about the endpoint so far.
#[derive(Debug, Clone, Copy, Default)]
struct Endpoint {
    mac: Option<MacAddress>,
    ip: Option<Ipv4Addr>,
}

pub struct TopologyWalker {
    config: Config,
    connector: Box<dyn SwitchConnector>,
    probe: Box<dyn Reachability>,
    prompter: Box<dyn Prompter>,
    stop: Arc<AtomicBool>,
    on_stage: Option<StageCallback>,
}

impl TopologyWalker {
    pub fn new(
        config: Config,
        connector: Box<dyn SwitchConnector>,
        probe: Box<dyn Reachability>,
        prompter: Box<dyn Prompter>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            connector,
            probe,
            prompter,
            stop,
            on_stage: None,
        }
    }

    /// Reports each stage as it starts, e.g. for a spinner.
    pub fn with_stage_callback(mut self, on_stage: StageCallback) -> Self {
        self.on_stage = Some(on_stage);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reachability(&self) -> &dyn Reachability {
        self.probe.as_ref()
    }

    fn stage(&self, message: &str) {
        if let Some(cb) = &self.on_stage {
            cb(message);
        }
    }

    fn check_stop(&self) -> Result<(), WalkError> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(WalkError::Cancelled);
        }
        Ok(())
    }

    /// Follows `target` from the core switch until a terminal state.
    ///
    /// Hop failures end up in the report; only core-switch failures and
    /// cancellation are errors.
    pub fn walk(
        &self,
        target: EndpointIdentifier,
        credentials: &mut Credentials,
    ) -> Result<WalkReport, WalkError> {
        self.stage(&format!("connecting to {}", self.config.core_host));
        let mut shell = retry::open_core(
            &self.config,
            self.connector.as_ref(),
            self.probe.as_ref(),
            self.prompter.as_ref(),
            credentials,
            &self.stop,
        )?;

        let mut endpoint = Endpoint {
            mac: target.mac(),
            ip: target.ipv4(),
        };
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(self.config.core_host.to_ascii_lowercase());
        let mut hops: Vec<HopRecord> = Vec::new();

        loop {
            let mut record = HopRecord::new(hops.len(), shell.host());
            let visit = self.visit(shell.as_mut(), &mut record, &mut endpoint);
            shell.close();

            match visit {
                Ok(()) => {}
                Err(SessionError::Cancelled) => return Err(WalkError::Cancelled),
                Err(e) => {
                    warn!("Session to {} failed: {e}", record.hostname);
                    let reason = session_failure(&record.hostname, &e);
                    hops.push(record.terminate(reason));
                    break;
                }
            }

            let next = if record.result.is_terminal() {
                None
            } else {
                record.result.next_hostname.clone()
            };
            let Some(next) = next else {
                hops.push(record);
                break;
            };

            if !visited.insert(next.to_ascii_lowercase()) {
                warn!("{next} was already visited; stopping at {}", record.hostname);
                hops.push(record.terminate(TerminalReason::TopologyLoop { host: next }));
                break;
            }

            self.check_stop()?;
            self.stage(&format!("connecting to {next}"));
            if !self.probe.probe(&next, self.config.quick_ping_count) {
                warn!("{next} does not answer ping");
                hops.push(record.terminate(TerminalReason::Unreachable { host: next }));
                break;
            }

            match self.connector.open(&next, credentials) {
                Ok(next_shell) => shell = next_shell,
                Err(SessionError::Cancelled) => return Err(WalkError::Cancelled),
                Err(e) => {
                    warn!("Cannot open session to {next}: {e}");
                    hops.push(record.terminate(TerminalReason::Unreachable { host: next }));
                    break;
                }
            }
            hops.push(record);
        }

        Ok(WalkReport {
            target,
            mac: endpoint.mac,
            ip: endpoint.ip,
            hops,
            details: EndpointDetails::default(),
        })
    }

    /// One visit to one switch. Fills `record` as far as the session allows.
    fn visit(
        &self,
        shell: &mut dyn SwitchShell,
        record: &mut HopRecord,
        endpoint: &mut Endpoint,
    ) -> Result<(), SessionError> {
        let host = record.hostname.clone();
        let first_hop = record.hop == 0;

        self.stage(&format!("detecting vendor on {host}"));
        let banner = shell.send(BANNER_COMMAND)?;
        let dialect = VendorDialect::detect(&banner);
        record.dialect = Some(dialect);
        debug!(host = %host, %dialect, "dialect detected");

        if first_hop && endpoint.mac.is_none() {
            if let Some(ip) = endpoint.ip {
                self.stage(&format!("looking up the MAC of {ip}"));
                endpoint.mac = self.mac_for_ip(shell, dialect, ip)?;
            }
        }
        let Some(mac) = endpoint.mac else {
            record.result.terminal = Some(TerminalReason::SeedUnresolved);
            return Ok(());
        };

        self.stage(&format!("searching for {mac} on {host}"));
        let mac_text = dialect.mac_text(&mac);
        let output = shell.send(&dialect.command(CommandKind::MacTable { token: &mac_text }))?;
        let Some(location) = parsers::port_from_mac_table(&output, &mac_text, dialect) else {
            debug!(host = %host, %mac, "not in the MAC table");
            record.result.terminal = Some(TerminalReason::NotFound);
            return Ok(());
        };
        if !first_hop {
            record.location_tag = parsers::location_tag(&output);
        }
        record.result = HopResult::located(location.clone());

        if location.is_self {
            record.result.terminal = Some(TerminalReason::SelfOrigin);
            return Ok(());
        }

        if let Some(lag_id) = parsers::lag_id_from_port(&location.port) {
            if let Some(group) = parsers::lag_group_number(&lag_id) {
                self.stage(&format!("expanding {lag_id} on {host}"));
                let output = shell.send(&dialect.command(CommandKind::LagMembers { group }))?;
                record.lag = parsers::lag_members(&output, &lag_id, dialect);
            }
        }

        if first_hop && endpoint.ip.is_none() {
            self.stage("looking up the IP address");
            let output = shell.send(&dialect.command(CommandKind::Arp { token: &mac_text }))?;
            endpoint.ip = parsers::ip_from_arp(&output, &location.port, dialect);
        }

        let next = self.find_next_hop(shell, dialect, record, &location)?;
        match next {
            Some(next) if !next.eq_ignore_ascii_case(&host) => {
                debug!(host = %host, next = %next, "next hop");
                record.result.next_hostname = Some(next);
            }
            _ => {
                let unmanaged = record.lag.is_none()
                    && self.behind_unmanaged_switch(shell, dialect, &location.port)?;
                record.result.terminal = Some(if unmanaged {
                    TerminalReason::UnmanagedSwitch
                } else {
                    TerminalReason::NotFound
                });
            }
        }

        Ok(())
    }

    fn mac_for_ip(
        &self,
        shell: &mut dyn SwitchShell,
        dialect: VendorDialect,
        ip: Ipv4Addr,
    ) -> Result<Option<MacAddress>, SessionError> {
        if !self.probe.probe(&ip.to_string(), self.config.quick_ping_count) {
            warn!("{ip} does not answer ping");
            return Ok(None);
        }
        let ip_text = ip.to_string();
        let output = shell.send(&dialect.command(CommandKind::Arp { token: &ip_text }))?;
        Ok(parsers::mac_from_arp(&output, ip, dialect))
    }

    /// Asks neighbour discovery about the located port, or about each LAG member
    /// in listed order until one names a switch.
    fn find_next_hop(
        &self,
        shell: &mut dyn SwitchShell,
        dialect: VendorDialect,
        record: &HopRecord,
        location: &PortLocation,
    ) -> Result<Option<String>, SessionError> {
        let ports: Vec<&str> = match &record.lag {
            Some(lag) => lag.members().iter().map(String::as_str).collect(),
            None => vec![location.port.as_str()],
        };

        for port in ports {
            self.stage(&format!("checking neighbours on {port}"));
            let output = shell.send(&dialect.command(CommandKind::Neighbors { token: port }))?;
            if let Some(next) = parsers::next_hostname(&output, port) {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }

    fn behind_unmanaged_switch(
        &self,
        shell: &mut dyn SwitchShell,
        dialect: VendorDialect,
        port: &str,
    ) -> Result<bool, SessionError> {
        self.stage(&format!("counting addresses on {port}"));
        let output = shell.send(&dialect.command(CommandKind::MacTableByPort { port }))?;
        Ok(parsers::is_unmanaged_switch(&output))
    }
}

fn session_failure(host: &str, error: &SessionError) -> TerminalReason {
    let host = host.to_string();
    match error {
        SessionError::Stalled { .. } => TerminalReason::Stalled { host },
        _ => TerminalReason::Disconnected { host },
    }
}
