use std::sync::OnceLock;

use mac_oui::Oui;
use macwalk_common::lookup::{VendorInfo, VendorRepository};
use macwalk_common::network::mac::MacAddress;
use tracing::debug;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                debug!("OUI database unavailable: {e:?}");
                None
            }
        })
        .as_ref()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Vendor lookups against the offline IEEE OUI database.
pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac: MacAddress) -> Option<VendorInfo> {
        let db = get_oui_db()?;
        match db.lookup_by_mac(&mac.to_string()) {
            Ok(Some(entry)) => Some(VendorInfo {
                organization: entry.company_name.clone(),
                country: non_empty(&entry.country_code),
                last_updated: non_empty(&entry.date_updated),
            }),
            _ => None,
        }
    }
}
