//! Bounded, operator-driven retries for the core switch.
//!
//! Only the core switch is worth asking about: when any later hop fails the walk
//! reports it as unreachable and stops there.

use std::sync::atomic::{AtomicBool, Ordering};

use macwalk_common::config::Config;
use macwalk_common::credentials::Credentials;
use tracing::{info, warn};

use crate::error::{SessionError, WalkError};
use crate::probe::Reachability;
use crate::session::{SwitchConnector, SwitchShell};

/// The operator's side of a core-switch retry.
pub trait Prompter: Send + Sync {
    /// Whether to try an unreachable core again.
    fn retry_unreachable(&self, host: &str) -> bool;

    /// A new password after the core rejected the current one, or `None` to give up.
    fn fresh_password(&self, host: &str, username: &str) -> Option<String>;
}

/// Never retries. Used when nobody is at the keyboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Prompter for Headless {
    fn retry_unreachable(&self, _host: &str) -> bool {
        false
    }

    fn fresh_password(&self, _host: &str, _username: &str) -> Option<String> {
        None
    }
}

/// Opens the core switch session, asking the operator before each retry.
///
/// The first attempt uses a quick probe and later ones a longer probe. Gives up
/// after `config.max_core_retries` attempts. A replacement password is written
/// back into `credentials` so later hops use it too.
pub fn open_core(
    config: &Config,
    connector: &dyn SwitchConnector,
    probe: &dyn Reachability,
    prompter: &dyn Prompter,
    credentials: &mut Credentials,
    stop: &AtomicBool,
) -> Result<Box<dyn SwitchShell>, WalkError> {
    let host = config.core_host.as_str();
    let max_attempts = config.max_core_retries.max(1);
    let unavailable = || WalkError::CoreUnavailable {
        host: host.to_string(),
    };

    for attempt in 1..=max_attempts {
        if stop.load(Ordering::Relaxed) {
            return Err(WalkError::Cancelled);
        }
        let last = attempt == max_attempts;
        let count = if attempt == 1 {
            config.quick_ping_count
        } else {
            config.retry_ping_count
        };

        if !probe.probe(host, count) {
            warn!("Core switch {host} is not responding");
            if last || !prompter.retry_unreachable(host) {
                return Err(unavailable());
            }
            continue;
        }

        match connector.open(host, credentials) {
            Ok(shell) => {
                info!("Connected to core switch {host}");
                return Ok(shell);
            }
            Err(SessionError::Auth { .. }) => {
                warn!("Core switch {host} rejected the credentials");
                if last {
                    return Err(WalkError::CoreRejected {
                        host: host.to_string(),
                    });
                }
                match prompter.fresh_password(host, &credentials.username) {
                    Some(password) => *credentials = credentials.with_password(password),
                    None => {
                        return Err(WalkError::CoreRejected {
                            host: host.to_string(),
                        });
                    }
                }
            }
            Err(SessionError::Connect { reason, .. }) => {
                warn!("Cannot connect to core switch {host}: {reason}");
                if last || !prompter.retry_unreachable(host) {
                    return Err(unavailable());
                }
            }
            Err(SessionError::Cancelled) => return Err(WalkError::Cancelled),
            Err(e) => return Err(WalkError::Session(e)),
        }
    }

    Err(unavailable())
}
