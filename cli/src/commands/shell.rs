use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use macwalk_common::config::Config;
use macwalk_common::credentials::Credentials;
use macwalk_common::network::target::Target;
use macwalk_core::WalkError;
use macwalk_core::locate::LocateService;
use tracing::warn;

use crate::commands::find;
use crate::terminal::prompt;

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

fn is_quit(input: &str) -> bool {
    QUIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Asks for targets and walks each one until the operator quits.
///
/// A cancelled walk returns to the prompt; a core switch that stays
/// unavailable ends the session.
pub async fn shell(
    service: Arc<LocateService>,
    mut credentials: Credentials,
    cfg: &Config,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    loop {
        let input = prompt::read_line("Hostname, IP or MAC (q to quit): ")?;
        if input.is_empty() {
            continue;
        }
        if is_quit(&input) {
            return Ok(());
        }

        let target: Target = match input.parse() {
            Ok(target) => target,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        stop.store(false, Ordering::Relaxed);
        match find::find(service.clone(), target, &mut credentials, cfg).await {
            Ok(()) => {}
            Err(e) if matches!(e.downcast_ref::<WalkError>(), Some(WalkError::Cancelled)) => {
                warn!("Walk cancelled");
            }
            Err(e) => return Err(e),
        }
    }
}
