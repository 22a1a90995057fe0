use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use macwalk_common::config::Config;
use macwalk_common::credentials::Credentials;
use macwalk_common::network::target::Target;
use macwalk_common::walk::TerminalReason;
use macwalk_common::{mprint, success};
use macwalk_core::locate::{LocateService, Located};
use macwalk_core::report::{HopRecord, WalkReport};
use tracing::warn;

use crate::terminal::{colors, format, print, spinner};

/// Runs one walk off the async runtime and prints its report.
///
/// A password the operator replaced on the way is written back into
/// `credentials`, whether or not the walk succeeds.
pub async fn find(
    service: Arc<LocateService>,
    target: Target,
    credentials: &mut Credentials,
    cfg: &Config,
) -> anyhow::Result<()> {
    let span = spinner::walk_span();
    let start_time: Instant = Instant::now();
    let working = credentials.clone();

    let (updated, outcome) = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let mut credentials = working;
        let outcome = service.locate(&target, &mut credentials);
        (credentials, outcome)
    })
    .await?;
    *credentials = updated;

    match outcome? {
        Located::Walked(report) => walk_ends(&report, start_time.elapsed(), cfg),
        Located::NoSuchEndpoint(name) => {
            print::header("no such endpoint", cfg.quiet);
            warn!("{name} does not resolve to a reachable address");
        }
    }

    Ok(())
}

fn walk_ends(report: &WalkReport, total_time: Duration, cfg: &Config) {
    if cfg.quiet < 2 {
        print::header("endpoint", cfg.quiet);
        print_endpoint(report);
        mprint!();
        print::header("trail", cfg.quiet);
        print_trail(report, cfg);
        mprint!();
    }

    print_outcome(report, cfg);

    if cfg.quiet == 0 {
        let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
        let hops: ColoredString = format!("{} hops", report.hops.len()).bold().green();
        print::fat_separator();
        print::centerln(&format!("Walk complete: {hops} in {total_time}"));
    }
}

fn print_endpoint(report: &WalkReport) {
    let details = &report.details;

    match report.mac {
        Some(mac) => print::aligned_line("MAC", mac.to_string().color(colors::MAC_ADDR)),
        None => print::aligned_line("MAC", "unknown".dimmed()),
    }
    if let Some(ip) = report.ip {
        print::aligned_line("IPv4", ip.to_string().color(colors::IPV4_ADDR));
    }
    if let Some(hostname) = &details.hostname {
        print::aligned_line("Hostname", hostname.color(colors::HOSTNAME));
    }
    if let Some(vendor) = &details.vendor {
        print::aligned_line("Vendor", format::vendor_text(vendor));
    }
    if let Some(user) = &details.user {
        print::aligned_line("User", format::user_text(user));
    }
}

fn print_trail(report: &WalkReport, cfg: &Config) {
    for (idx, record) in report.hops.iter().enumerate() {
        print::tree_head(record.hop, &record.hostname);
        print::as_tree_one_level(format::hop_details(record, &cfg.core_location));
        if idx + 1 != report.hops.len() {
            mprint!();
        }
    }
}

/// Where the address sits, as far as the walk got.
fn placement(record: &HopRecord, cfg: &Config) -> String {
    let port = format::port_text(record).unwrap_or_default();
    let mut text = if record.lag.is_some() {
        format!("in port group {}", port.color(colors::PORT))
    } else {
        format!("on port {}", port.color(colors::PORT))
    };
    text.push_str(&format!(" of {}", record.hostname.color(colors::HOSTNAME)));

    if let Some(location) = format::switch_location(record, &cfg.core_location) {
        text.push_str(&format!(" in {}", location.color(colors::LOCATION)));
    }
    if let Some(vlan) = record.result.location.as_ref().and_then(|l| l.vlan.as_deref()) {
        text.push_str(&format!(", VLAN {}", vlan.color(colors::ACCENT)));
    }
    text
}

fn print_outcome(report: &WalkReport, cfg: &Config) {
    let endpoint = report.target.to_string().color(colors::MAC_ADDR);
    let Some(last) = report.last_hop() else {
        warn!("{endpoint} was not searched");
        return;
    };
    let Some(reason) = report.terminal() else {
        warn!("{endpoint}: the walk ended without a verdict");
        return;
    };

    let deepest = report.deepest_location();
    match reason {
        TerminalReason::SelfOrigin => {
            let mut text = format!(
                "{endpoint} is the switch {} itself",
                last.hostname.color(colors::HOSTNAME)
            );
            if let Some(location) = format::switch_location(last, &cfg.core_location) {
                text.push_str(&format!(" in {}", location.color(colors::LOCATION)));
            }
            success!("{text}");
        }
        TerminalReason::NotFound => match deepest {
            Some(record) => success!("{endpoint} is {}", placement(record, cfg)),
            None => warn!("{endpoint} was not found in the network"),
        },
        TerminalReason::UnmanagedSwitch => match deepest {
            Some(record) => success!(
                "{endpoint} is {}, {}",
                placement(record, cfg),
                "behind an unmanaged switch".color(colors::ALERT)
            ),
            None => warn!("{endpoint} is behind an unmanaged switch"),
        },
        TerminalReason::SeedUnresolved => {
            warn!("{endpoint}: no MAC address found for this IP address");
        }
        TerminalReason::Unreachable { host }
        | TerminalReason::TopologyLoop { host }
        | TerminalReason::Stalled { host }
        | TerminalReason::Disconnected { host } => {
            if let Some(record) = deepest {
                success!("{endpoint} is {}", placement(record, cfg));
            }
            warn!(
                "somewhere behind {}, {}",
                host.color(colors::HOSTNAME),
                reason.to_string().color(colors::ALERT)
            );
        }
    }
}
