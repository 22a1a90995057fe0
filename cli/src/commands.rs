pub mod find;
pub mod shell;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use macwalk_common::config::{
    Config, DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CORE_RETRIES,
    DEFAULT_SSH_PORT,
};
use macwalk_common::credentials::Credentials;
use macwalk_common::lookup::NoDirectory;
use macwalk_common::network::target::Target;
use macwalk_core::dns::SystemResolver;
use macwalk_core::locate::LocateService;
use macwalk_core::probe::PingProbe;
use macwalk_core::retry::{Headless, Prompter};
use macwalk_core::session::SshConnector;
use macwalk_core::vendors::MacOuiRepo;
use macwalk_core::walker::TopologyWalker;

use crate::terminal::{prompt, spinner};

#[derive(Parser)]
#[command(name = "macwalk", version)]
#[command(about = "Finds the switch port a device is plugged into.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Core switch every walk starts from
    #[arg(short, long, global = true, env = "MACWALK_CORE")]
    pub core: Option<String>,

    /// SSH port of every switch
    #[arg(short, long, global = true, env = "MACWALK_PORT", default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// SSH user; asked for when missing
    #[arg(short, long, global = true, env = "MACWALK_USER")]
    pub user: Option<String>,

    /// SSH password; asked for when missing
    #[arg(long, global = true, env = "MACWALK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Where the core switch lives, shown in reports
    #[arg(short, long, global = true, env = "MACWALK_LOCATION", default_value = "")]
    pub location: String,

    /// Seconds to wait for a switch prompt
    #[arg(long, global = true, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Seconds to wait for a TCP connection
    #[arg(long, global = true, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,

    /// Attempts at the core switch before giving up
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CORE_RETRIES)]
    pub retries: u32,

    /// Skip reverse DNS for the endpoint
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Skip the MAC vendor lookup
    #[arg(long, global = true)]
    pub no_vendor: bool,

    /// Less output; repeat for even less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Log every command and its raw output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate one device by MAC, IPv4 or hostname
    #[command(alias = "f")]
    Find { target: Target },
    /// Locate devices one after another until you quit
    #[command(alias = "s")]
    Shell,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> anyhow::Result<Config> {
        let core = match &self.core {
            Some(core) if !core.trim().is_empty() => core.trim().to_string(),
            _ => prompt::read_line("Core switch: ").context("cannot read the core switch")?,
        };
        anyhow::ensure!(!core.is_empty(), "no core switch given");

        let username = match &self.user {
            Some(user) if !user.is_empty() => user.clone(),
            _ => prompt::read_line("Username: ").context("cannot read the username")?,
        };
        anyhow::ensure!(!username.is_empty(), "no username given");

        let mut cfg = Config::new(core, username);
        cfg.ssh_port = self.port;
        cfg.core_location = self.location.clone();
        cfg.command_timeout = Duration::from_secs(self.timeout);
        cfg.connect_timeout = Duration::from_secs(self.connect_timeout);
        cfg.max_core_retries = self.retries;
        cfg.no_dns = self.no_dns;
        cfg.no_vendor = self.no_vendor;
        cfg.quiet = self.quiet;
        cfg.debug = self.debug;
        Ok(cfg)
    }

    pub fn credentials(&self, cfg: &Config) -> anyhow::Result<Credentials> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt::read_password(&format!("Password for {}: ", cfg.username))
                .context("cannot read the password")?,
        };
        Ok(Credentials::new(cfg.username.clone(), password))
    }
}

/// Wires the SSH, ping and lookup adapters into one service.
pub fn locate_service(cfg: &Config, stop: Arc<AtomicBool>) -> LocateService {
    let connector = SshConnector::new(
        cfg.ssh_port,
        cfg.connect_timeout,
        cfg.command_timeout,
        stop.clone(),
    );
    let prompter: Box<dyn Prompter> = if console::user_attended() {
        Box::new(prompt::ConsolePrompter)
    } else {
        Box::new(Headless)
    };

    let walker = TopologyWalker::new(
        cfg.clone(),
        Box::new(connector),
        Box::new(PingProbe),
        prompter,
        stop,
    )
    .with_stage_callback(spinner::stage_reporter());

    LocateService::new(
        walker,
        Box::new(MacOuiRepo),
        Box::new(SystemResolver),
        Box::new(NoDirectory),
    )
}
