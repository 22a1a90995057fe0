use colored::*;
use macwalk_common::lookup::{DirectoryUser, VendorInfo};
use macwalk_core::report::HopRecord;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Where a hop's switch physically is. The core has no tag of its own.
pub fn switch_location(record: &HopRecord, core_location: &str) -> Option<String> {
    if record.hop == 0 {
        (!core_location.is_empty()).then(|| core_location.to_string())
    } else {
        record.location_tag.clone()
    }
}

/// Port text for a hop: the LAG with its members, or the plain port.
pub fn port_text(record: &HopRecord) -> Option<String> {
    let location = record.result.location.as_ref()?;
    match &record.lag {
        Some(lag) => Some(format!("{} ({})", lag.id(), lag.members().join(", "))),
        None => Some(location.port.clone()),
    }
}

pub fn hop_details(record: &HopRecord, core_location: &str) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    if let Some(dialect) = record.dialect {
        details.push(("Vendor".to_string(), dialect.name().normal()));
    }
    if let Some(port) = port_text(record) {
        let key = if record.lag.is_some() { "LAG" } else { "Port" };
        details.push((key.to_string(), port.color(colors::PORT)));
    }
    if let Some(vlan) = record
        .result
        .location
        .as_ref()
        .and_then(|l| l.vlan.as_deref())
    {
        details.push(("VLAN".to_string(), vlan.color(colors::ACCENT)));
    }
    if let Some(location) = switch_location(record, core_location) {
        details.push(("Location".to_string(), location.color(colors::LOCATION)));
    }
    if let Some(next) = &record.result.next_hostname {
        details.push(("Next hop".to_string(), next.color(colors::HOSTNAME)));
    }

    details
}

pub fn vendor_text(vendor: &VendorInfo) -> String {
    let mut extra: Vec<String> = Vec::new();
    if let Some(country) = &vendor.country {
        extra.push(country.clone());
    }
    if let Some(updated) = &vendor.last_updated {
        extra.push(format!("updated {updated}"));
    }

    if extra.is_empty() {
        vendor.organization.clone()
    } else {
        format!("{} ({})", vendor.organization, extra.join(", "))
    }
}

pub fn user_text(user: &DirectoryUser) -> String {
    let mut text = match &user.display_name {
        Some(name) => format!("{name} ({})", user.login),
        None => user.login.clone(),
    };
    if let Some(last_logon) = &user.last_logon {
        text.push_str(&format!(", last logon {last_logon}"));
    }
    text
}
