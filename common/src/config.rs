use std::time::Duration;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CORE_RETRIES: u32 = 3;

/// Run configuration, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// The switch every walk starts from.
    pub core_host: String,
    pub ssh_port: u16,
    pub username: String,
    /// Human label for where the core switch lives; the core has no location tag of its own.
    pub core_location: String,

    /// Upper bound on waiting for a prompt after one command.
    pub command_timeout: Duration,
    pub connect_timeout: Duration,

    /// How many times the operator may be asked to retry the core before giving up.
    pub max_core_retries: u32,
    /// Echo requests for a quick reachability probe.
    pub quick_ping_count: u8,
    /// Echo requests when the operator asked for a retry.
    pub retry_ping_count: u8,

    /// Skips the reverse DNS lookup in the endpoint report.
    pub no_dns: bool,
    /// Skips the MAC vendor lookup in the endpoint report.
    pub no_vendor: bool,
    pub quiet: u8,
    pub debug: bool,
}

impl Config {
    pub fn new(core_host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            core_host: core_host.into(),
            ssh_port: DEFAULT_SSH_PORT,
            username: username.into(),
            core_location: String::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_core_retries: DEFAULT_MAX_CORE_RETRIES,
            quick_ping_count: 1,
            retry_ping_count: 4,
            no_dns: false,
            no_vendor: false,
            quiet: 0,
            debug: false,
        }
    }
}
