mod commands;
mod terminal;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use commands::{CommandLine, Commands, find, shell};
use terminal::{logging, print};
use tracing::warn;

/// Exit code for a second Ctrl-C.
const INTERRUPTED: i32 = 130;

/// First Ctrl-C cancels the running walk; a second one ends the process.
fn watch_ctrl_c(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if stop.swap(true, Ordering::Relaxed) {
                std::process::exit(INTERRUPTED);
            }
            warn!("Cancelling; press Ctrl-C again to quit");
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.debug, commands.quiet);
    print::banner(commands.quiet);

    let cfg = commands.to_config()?;
    let mut credentials = commands.credentials(&cfg)?;

    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(stop.clone());
    let service = Arc::new(commands::locate_service(&cfg, stop.clone()));

    match commands.command {
        Commands::Find { target } => {
            print::header("locating endpoint", cfg.quiet);
            find::find(service, target, &mut credentials, &cfg).await
        }
        Commands::Shell => {
            print::header("interactive search", cfg.quiet);
            shell::shell(service, credentials, &cfg, stop).await
        }
    }
}
