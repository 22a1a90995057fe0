use std::process::Command;

use tracing::debug;

/// Output fragments meaning no echo reply came back, localised ones included.
const FAILURE_MARKERS: [&str; 4] = ["0 received", "100% packet loss", "сбой", "failure"];

/// Answers whether a host answers ICMP echo.
pub trait Reachability: Send + Sync {
    fn probe(&self, host: &str, count: u8) -> bool;
}

/// Reachability through the system `ping` utility.
#[derive(Debug, Default, Clone, Copy)]
pub struct PingProbe;

impl Reachability for PingProbe {
    fn probe(&self, host: &str, count: u8) -> bool {
        let output = Command::new("ping")
            .args(["-W", "1", "-c", &count.to_string(), host])
            .output();

        match output {
            Ok(out) => {
                let stdout = String::from_utf8_lossy(&out.stdout);
                let stderr = String::from_utf8_lossy(&out.stderr);
                let alive = ping_succeeded(out.status.success(), &stdout, &stderr);
                debug!(host, count, alive, "ping");
                alive
            }
            Err(e) => {
                debug!(host, "cannot run ping: {e}");
                false
            }
        }
    }
}

/// Interprets one `ping` run.
pub fn ping_succeeded(exit_ok: bool, stdout: &str, stderr: &str) -> bool {
    if !exit_ok || !stderr.trim().is_empty() {
        return false;
    }

    !stdout.lines().any(|line| {
        let line = line.to_lowercase();
        FAILURE_MARKERS.iter().any(|marker| {
            // "10 received" is a success; only a bare zero counts.
            if *marker == "0 received" {
                line.split(", ").any(|part| part.trim() == "0 received")
            } else {
                line.contains(marker)
            }
        })
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
