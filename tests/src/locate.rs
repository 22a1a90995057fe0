#![cfg(test)]
use std::collections::HashMap;
use std::net::Ipv4Addr;

use macwalk_common::config::Config;
use macwalk_common::lookup::{DirectoryUser, VendorInfo};
use macwalk_common::network::target::{EndpointIdentifier, Target};
use macwalk_common::walk::TerminalReason;
use macwalk_core::locate::{LocateService, Located};
use macwalk_core::report::WalkReport;

use crate::support::{self, FakeDirectory, FakeDns, FakeVendors, Topology, ELTEX_BANNER};

const MAC_TABLE: &str = "show mac add | inc aa:bb:cc:dd:ee:ff";
const PC_IP: Ipv4Addr = Ipv4Addr::new(10, 1, 2, 3);

fn topology() -> Topology {
    Topology::new()
        .switch("core", ELTEX_BANNER)
        .reply(
            "core",
            "show arp | inc 10.1.2.3",
            "  vlan 20   gi1/0/5   10.1.2.3   aa:bb:cc:dd:ee:ff   dynamic",
        )
        .reply("core", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/5    dynamic")
}

fn service(topology: &Topology, cfg: Config) -> LocateService {
    let vendors = FakeVendors(HashMap::from([(
        support::mac("aa:bb:cc:dd:ee:ff"),
        VendorInfo {
            organization: "Example Networks".to_string(),
            country: Some("SE".to_string()),
            last_updated: None,
        },
    )]));
    let dns = FakeDns {
        names: HashMap::from([("pc-104".to_string(), PC_IP)]),
    };
    let directory = FakeDirectory {
        workstations: HashMap::from([("jdoe".to_string(), "pc-104".to_string())]),
        users: HashMap::from([(
            "pc-104".to_string(),
            DirectoryUser {
                login: "jdoe".to_string(),
                display_name: Some("Jane Doe".to_string()),
                last_logon: None,
            },
        )]),
    };

    LocateService::new(
        topology.walker(cfg),
        Box::new(vendors),
        Box::new(dns),
        Box::new(directory),
    )
}

fn walked(located: Located) -> Box<WalkReport> {
    match located {
        Located::Walked(report) => report,
        Located::NoSuchEndpoint(name) => panic!("{name} was not resolved"),
    }
}

#[test]
fn login_resolves_to_workstation_and_is_enriched() {
    let topology = topology();
    let service = service(&topology, support::config("core"));

    let located = service
        .locate(&Target::Name("jdoe".to_string()), &mut support::credentials())
        .unwrap();
    let report = walked(located);

    assert_eq!(report.target, EndpointIdentifier::Ipv4(PC_IP));
    assert_eq!(report.terminal(), Some(&TerminalReason::NotFound));
    let details = &report.details;
    assert_eq!(details.mac, Some(support::mac("aa:bb:cc:dd:ee:ff")));
    assert_eq!(details.hostname.as_deref(), Some("pc-104"));
    assert_eq!(details.vendor.as_ref().unwrap().organization, "Example Networks");
    assert_eq!(details.user.as_ref().unwrap().login, "jdoe");
    assert!(topology.probed().contains(&"pc-104".to_string()));
}

#[test]
fn unknown_name_contacts_no_switch() {
    let topology = topology();
    let service = service(&topology, support::config("core"));

    let located = service
        .locate(&Target::Name("printer-9".to_string()), &mut support::credentials())
        .unwrap();

    assert_eq!(located, Located::NoSuchEndpoint("printer-9".to_string()));
    assert!(topology.commands().is_empty());
}

#[test]
fn silent_name_is_not_resolved() {
    let topology = topology().silent("pc-104");
    let service = service(&topology, support::config("core"));

    assert_eq!(service.resolve_name("pc-104"), None);
    assert!(
        service.resolve_name("jdoe").is_none(),
        "the workstation behind a login must answer ping too"
    );
}

#[test]
fn lookups_can_be_switched_off() {
    let topology = topology();
    let mut cfg = support::config("core");
    cfg.no_dns = true;
    cfg.no_vendor = true;
    let service = service(&topology, cfg);

    let target = Target::Endpoint(EndpointIdentifier::Mac(support::mac("aa:bb:cc:dd:ee:ff")));
    let report = walked(service.locate(&target, &mut support::credentials()).unwrap());

    assert_eq!(report.details.vendor, None);
    assert_eq!(report.details.hostname, None);
    assert_eq!(report.details.mac, Some(support::mac("aa:bb:cc:dd:ee:ff")));
}
