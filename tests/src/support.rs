#![cfg(test)]
//! A scripted switch topology: every switch answers fixed text per command.

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use macwalk_common::config::Config;
use macwalk_common::credentials::Credentials;
use macwalk_common::lookup::{DirectoryUser, HostnameResolver, UserDirectory, VendorInfo, VendorRepository};
use macwalk_common::network::mac::MacAddress;
use macwalk_core::probe::Reachability;
use macwalk_core::retry::{Headless, Prompter};
use macwalk_core::session::{SwitchConnector, SwitchShell};
use macwalk_core::walker::TopologyWalker;
use macwalk_core::SessionError;

pub const PASSWORD: &str = "secret";
pub const ELTEX_BANNER: &str = "Active-image: flash://system/images/image1.bin\r\n  Version: 4.0.19\r\n";
pub const VECTOR_BANNER: &str = "Vector Operating System Software, Version 7.2.1\r\n";
pub const QTECH_BANNER: &str = "Vector Operating System Software\r\nQSW-4610-28T-AC Device\r\n";

/// Every command sent, as `host: command`.
pub type CommandLog = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Default)]
struct ScriptedSwitch {
    replies: HashMap<String, String>,
    stalls_on: Option<String>,
    /// Raises the stop flag when this command is sent, like Ctrl-C mid-read.
    cancels_on: Option<(String, Arc<AtomicBool>)>,
}

#[derive(Clone, Default)]
pub struct Topology {
    switches: HashMap<String, ScriptedSwitch>,
    silent: HashSet<String>,
    refusing: HashSet<String>,
    log: CommandLog,
    probes: CommandLog,
    opened: CommandLog,
    closed: CommandLog,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch(mut self, host: &str, banner: &str) -> Self {
        self.switches.entry(host.to_string()).or_default();
        self.reply(host, "show ver", banner)
    }

    /// Scripts `command` on `host`. The prompt is appended.
    pub fn reply(mut self, host: &str, command: &str, output: &str) -> Self {
        let text = format!("{command}\r\n{output}\r\n{host}#");
        self.switches
            .entry(host.to_string())
            .or_default()
            .replies
            .insert(command.to_string(), text);
        self
    }

    pub fn stall(mut self, host: &str, command: &str) -> Self {
        self.switches.entry(host.to_string()).or_default().stalls_on = Some(command.to_string());
        self
    }

    pub fn cancel_on(mut self, host: &str, command: &str, stop: &Arc<AtomicBool>) -> Self {
        self.switches.entry(host.to_string()).or_default().cancels_on =
            Some((command.to_string(), stop.clone()));
        self
    }

    /// The host does not answer ping.
    pub fn silent(mut self, host: &str) -> Self {
        self.silent.insert(host.to_string());
        self
    }

    /// The host answers ping but refuses SSH connections.
    pub fn refusing(mut self, host: &str) -> Self {
        self.refusing.insert(host.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    /// Hosts a session was opened to, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Hosts whose session was closed, in order.
    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            topology: self.clone(),
        }
    }

    pub fn probe(&self) -> FakeProbe {
        FakeProbe {
            silent: self.silent.clone(),
            probes: self.probes.clone(),
        }
    }

    pub fn walker(&self, cfg: Config) -> TopologyWalker {
        self.walker_with(cfg, Box::new(Headless), Arc::new(AtomicBool::new(false)))
    }

    pub fn walker_with(
        &self,
        cfg: Config,
        prompter: Box<dyn Prompter>,
        stop: Arc<AtomicBool>,
    ) -> TopologyWalker {
        TopologyWalker::new(
            cfg,
            Box::new(self.connector()),
            Box::new(self.probe()),
            prompter,
            stop,
        )
    }
}

pub struct FakeShell {
    host: String,
    switch: ScriptedSwitch,
    log: CommandLog,
    closed_log: CommandLog,
    closed: bool,
}

impl SwitchShell for FakeShell {
    fn host(&self) -> &str {
        &self.host
    }

    fn send(&mut self, command: &str) -> Result<String, SessionError> {
        if self.closed {
            return Err(SessionError::Closed {
                host: self.host.clone(),
            });
        }
        self.log.lock().unwrap().push(format!("{}: {command}", self.host));

        if let Some((trigger, stop)) = &self.switch.cancels_on {
            if trigger == command {
                stop.store(true, Ordering::Relaxed);
                return Err(SessionError::Cancelled);
            }
        }
        if self.switch.stalls_on.as_deref() == Some(command) {
            return Err(SessionError::Stalled {
                host: self.host.clone(),
                timeout: Duration::from_secs(30),
            });
        }
        Ok(self
            .switch
            .replies
            .get(command)
            .cloned()
            .unwrap_or_else(|| format!("{command}\r\n{}#", self.host)))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.closed_log.lock().unwrap().push(self.host.clone());
        }
    }
}

pub struct FakeConnector {
    topology: Topology,
}

impl SwitchConnector for FakeConnector {
    fn open(
        &self,
        host: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn SwitchShell>, SessionError> {
        let Some(switch) = self.topology.switches.get(host) else {
            return Err(SessionError::Connect {
                host: host.to_string(),
                reason: "no route to host".to_string(),
            });
        };
        if self.topology.refusing.contains(host) {
            return Err(SessionError::Connect {
                host: host.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        if credentials.password() != PASSWORD {
            return Err(SessionError::Auth {
                host: host.to_string(),
            });
        }
        self.topology.opened.lock().unwrap().push(host.to_string());
        Ok(Box::new(FakeShell {
            host: host.to_string(),
            switch: switch.clone(),
            log: self.topology.log.clone(),
            closed_log: self.topology.closed.clone(),
            closed: false,
        }))
    }
}

pub struct FakeProbe {
    silent: HashSet<String>,
    probes: CommandLog,
}

impl Reachability for FakeProbe {
    fn probe(&self, host: &str, _count: u8) -> bool {
        self.probes.lock().unwrap().push(host.to_string());
        !self.silent.contains(host)
    }
}

/// Answers retries and password prompts from a script.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub retries: Mutex<VecDeque<bool>>,
    pub passwords: Mutex<VecDeque<String>>,
    pub asked: Arc<Mutex<usize>>,
}

impl ScriptedPrompter {
    pub fn new(retries: &[bool], passwords: &[&str]) -> Self {
        Self {
            retries: Mutex::new(retries.iter().copied().collect()),
            passwords: Mutex::new(passwords.iter().map(|p| p.to_string()).collect()),
            asked: Arc::new(Mutex::new(0)),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn retry_unreachable(&self, _host: &str) -> bool {
        *self.asked.lock().unwrap() += 1;
        self.retries.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn fresh_password(&self, _host: &str, _username: &str) -> Option<String> {
        *self.asked.lock().unwrap() += 1;
        self.passwords.lock().unwrap().pop_front()
    }
}

#[derive(Default)]
pub struct FakeVendors(pub HashMap<MacAddress, VendorInfo>);

impl VendorRepository for FakeVendors {
    fn get_vendor(&self, mac: MacAddress) -> Option<VendorInfo> {
        self.0.get(&mac).cloned()
    }
}

#[derive(Default)]
pub struct FakeDns {
    pub names: HashMap<String, Ipv4Addr>,
}

impl HostnameResolver for FakeDns {
    fn reverse(&self, ip: Ipv4Addr) -> Option<String> {
        self.names
            .iter()
            .find(|(_, addr)| **addr == ip)
            .map(|(name, _)| name.clone())
    }

    fn forward(&self, name: &str) -> Option<Ipv4Addr> {
        self.names.get(name).copied()
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    pub workstations: HashMap<String, String>,
    pub users: HashMap<String, DirectoryUser>,
}

impl UserDirectory for FakeDirectory {
    fn workstation_of(&self, login: &str) -> Option<String> {
        self.workstations.get(login).cloned()
    }

    fn user_on(&self, hostname: &str) -> Option<DirectoryUser> {
        self.users.get(hostname).cloned()
    }
}

pub fn config(core: &str) -> Config {
    let mut cfg = Config::new(core, "netops");
    cfg.core_location = "DC-1".to_string();
    cfg
}

pub fn credentials() -> Credentials {
    Credentials::new("netops", PASSWORD)
}

pub fn mac(text: &str) -> MacAddress {
    text.parse().unwrap()
}
