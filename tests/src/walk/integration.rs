#![cfg(test)]
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use macwalk_common::network::target::EndpointIdentifier;
use macwalk_common::walk::TerminalReason;
use macwalk_core::report::WalkReport;
use macwalk_core::retry::Headless;
use macwalk_core::WalkError;
use macwalk_protocols::VendorDialect;

use crate::support::{self, Topology, ELTEX_BANNER, QTECH_BANNER, VECTOR_BANNER};

const MAC: &str = "aa:bb:cc:dd:ee:ff";
const MAC_TABLE: &str = "show mac add | inc aa:bb:cc:dd:ee:ff";

fn walk(topology: &Topology, core: &str, target: EndpointIdentifier) -> WalkReport {
    let walker = topology.walker(support::config(core));
    let mut credentials = support::credentials();
    walker.walk(target, &mut credentials).expect("walk failed")
}

fn by_mac() -> EndpointIdentifier {
    EndpointIdentifier::Mac(support::mac(MAC))
}

/// Core -> sw1 (LAG Po11 over Gi1/0/1, Gi1/0/2) -> sw2, where the device sits
/// directly on gi1/0/7.
fn lag_topology() -> Topology {
    Topology::new()
        .switch("core", ELTEX_BANNER)
        .reply("core", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/24    dynamic")
        .reply(
            "core",
            "show arp | inc aa:bb:cc:dd:ee:ff",
            "  vlan 20   gi1/0/24   10.1.2.3   aa:bb:cc:dd:ee:ff   dynamic",
        )
        .reply(
            "core",
            "show lldp neighbors | inc gi1/0/24",
            "gi1/0/24   a8:f9:4b:00:00:01   gi1/0/48   sw1   B, R",
        )
        .switch("sw1", ELTEX_BANNER)
        .reply("sw1", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   Po11    dynamic")
        .reply("sw1", "show interface channel-group 11", "Po11     Active: Gi1/0/1,Gi1/0/2")
        .reply("sw1", "show lldp neighbors | inc Gi1/0/1", "")
        .reply(
            "sw1",
            "show lldp neighbors | inc Gi1/0/2",
            "Gi1/0/2   a8:f9:4b:00:00:02   gi1/0/49   sw2   B",
        )
        .switch("sw2", ELTEX_BANNER)
        .reply(
            "sw2",
            MAC_TABLE,
            "  20    aa:bb:cc:dd:ee:ff   gi1/0/7    dynamic\r\nks-3-r4",
        )
        .reply(
            "sw2",
            "show mac add int gi1/0/7",
            "  20    aa:bb:cc:dd:ee:ff   gi1/0/7    dynamic",
        )
}

#[test]
fn mac_owned_by_core_is_a_single_self_hop() {
    let topology = Topology::new()
        .switch("core", ELTEX_BANNER)
        .reply("core", MAC_TABLE, "  1     aa:bb:cc:dd:ee:ff   0    self");

    let report = walk(&topology, "core", by_mac());

    assert_eq!(report.path(), ["core"]);
    assert_eq!(report.terminal(), Some(&TerminalReason::SelfOrigin));
    let hop = &report.hops[0];
    assert_eq!(hop.dialect, Some(VendorDialect::Eltex));
    assert!(hop.result.location.as_ref().unwrap().is_self);
    assert_eq!(hop.result.location.as_ref().unwrap().vlan, None);
}

#[test]
fn lag_members_are_tried_in_order_until_one_names_a_switch() {
    let topology = lag_topology();

    let report = walk(&topology, "core", by_mac());

    assert_eq!(report.path(), ["core", "sw1", "sw2"]);
    let lag = report.hops[1].lag.as_ref().expect("sw1 should expand Po11");
    assert_eq!(lag.id(), "Po11");
    assert_eq!(lag.members(), ["Gi1/0/1", "Gi1/0/2"]);
    assert_eq!(report.hops[1].result.next_hostname.as_deref(), Some("sw2"));

    let commands = topology.commands();
    let first = commands
        .iter()
        .position(|c| c == "sw1: show lldp neighbors | inc Gi1/0/1")
        .expect("Gi1/0/1 was not tried");
    let second = commands
        .iter()
        .position(|c| c == "sw1: show lldp neighbors | inc Gi1/0/2")
        .expect("Gi1/0/2 was not tried");
    assert!(first < second, "LAG members were tried out of order");
    assert!(
        !commands.iter().any(|c| c.starts_with("sw1: show mac add int")),
        "unmanaged check must not run on a LAG"
    );
}

#[test]
fn walk_ends_on_the_port_the_device_is_attached_to() {
    let report = walk(&lag_topology(), "core", by_mac());

    assert_eq!(report.terminal(), Some(&TerminalReason::NotFound));
    let last = report.deepest_location().expect("the device was located");
    assert_eq!(last.hostname, "sw2");
    assert_eq!(last.result.location.as_ref().unwrap().port, "gi1/0/7");
    assert_eq!(last.location_tag.as_deref(), Some("ks-3-r4"));
    assert_eq!(report.hops[0].location_tag, None, "the core never carries a tag");
    assert_eq!(report.ip, Some("10.1.2.3".parse().unwrap()));
}

#[test]
fn repeated_walks_are_identical() {
    let topology = lag_topology();

    let first = walk(&topology, "core", by_mac());
    let second = walk(&topology, "core", by_mac());

    assert_eq!(first.path(), second.path());
    assert_eq!(first.terminal(), second.terminal());
    assert_eq!(first, second);
}

#[test]
fn neighbour_naming_the_current_switch_triggers_the_unmanaged_check() {
    let topology = Topology::new()
        .switch("sw1", ELTEX_BANNER)
        .reply("sw1", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/5    dynamic")
        .reply(
            "sw1",
            "show lldp neighbors | inc gi1/0/5",
            "gi1/0/5   a8:f9:4b:00:00:01   gi1/0/1   sw1   B",
        )
        .reply(
            "sw1",
            "show mac add int gi1/0/5",
            "  20    aa:bb:cc:dd:ee:ff   gi1/0/5    dynamic\r\n  20    00:11:22:33:44:55   gi1/0/5    dynamic",
        );

    let report = walk(&topology, "sw1", by_mac());

    assert_eq!(report.path(), ["sw1"]);
    assert_eq!(report.terminal(), Some(&TerminalReason::UnmanagedSwitch));
    assert!(topology
        .commands()
        .contains(&"sw1: show mac add int gi1/0/5".to_string()));
}

#[test]
fn unreachable_next_hop_keeps_the_partial_answer() {
    let topology = lag_topology().silent("sw1");

    let report = walk(&topology, "core", by_mac());

    assert_eq!(report.path(), ["core"]);
    assert_eq!(
        report.terminal(),
        Some(&TerminalReason::Unreachable {
            host: "sw1".to_string()
        })
    );
    let located = report.deepest_location().unwrap();
    assert_eq!(located.result.location.as_ref().unwrap().port, "gi1/0/24");
    assert!(!topology.commands().iter().any(|c| c.starts_with("sw1:")));
}

#[test]
fn refused_session_reports_next_hop_unreachable() {
    let topology = lag_topology().refusing("sw1");

    let report = walk(&topology, "core", by_mac());

    assert_eq!(
        report.terminal(),
        Some(&TerminalReason::Unreachable {
            host: "sw1".to_string()
        })
    );
}

#[test]
fn revisiting_a_switch_is_a_topology_loop() {
    let topology = Topology::new()
        .switch("sw1", ELTEX_BANNER)
        .reply("sw1", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/24    dynamic")
        .reply(
            "sw1",
            "show lldp neighbors | inc gi1/0/24",
            "gi1/0/24   a8:f9:4b:00:00:02   gi1/0/48   sw2   B",
        )
        .switch("sw2", ELTEX_BANNER)
        .reply("sw2", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/48    dynamic")
        .reply(
            "sw2",
            "show lldp neighbors | inc gi1/0/48",
            "gi1/0/48   a8:f9:4b:00:00:01   gi1/0/24   SW1   B",
        );

    let report = walk(&topology, "sw1", by_mac());

    assert_eq!(report.path(), ["sw1", "sw2"]);
    assert_eq!(
        report.terminal(),
        Some(&TerminalReason::TopologyLoop {
            host: "SW1".to_string()
        })
    );
}

#[test]
fn stalled_switch_ends_the_walk_at_that_hop() {
    let topology = lag_topology().stall("sw2", MAC_TABLE);

    let report = walk(&topology, "core", by_mac());

    assert_eq!(report.path(), ["core", "sw1", "sw2"]);
    assert_eq!(
        report.terminal(),
        Some(&TerminalReason::Stalled {
            host: "sw2".to_string()
        })
    );
    assert_eq!(report.hops[2].dialect, Some(VendorDialect::Eltex));
    assert_eq!(report.deepest_location().unwrap().hostname, "sw1");
}

#[test]
fn ip_seed_is_resolved_through_arp_on_the_core() {
    let topology = Topology::new()
        .switch("core", ELTEX_BANNER)
        .reply(
            "core",
            "show arp | inc 10.1.2.3",
            "  vlan 20   gi1/0/5   10.1.2.3   aa:bb:cc:dd:ee:ff   dynamic",
        )
        .reply("core", MAC_TABLE, "  20    aa:bb:cc:dd:ee:ff   gi1/0/5    dynamic");

    let report = walk(
        &topology,
        "core",
        EndpointIdentifier::Ipv4("10.1.2.3".parse().unwrap()),
    );

    assert_eq!(report.mac, Some(support::mac(MAC)));
    assert_eq!(report.ip, Some("10.1.2.3".parse().unwrap()));
    assert_eq!(report.terminal(), Some(&TerminalReason::NotFound));
    assert!(report.hops[0].result.located);
    assert!(topology.probed().contains(&"10.1.2.3".to_string()));

    let commands = topology.commands();
    let detect = commands.iter().position(|c| c == "core: show ver").unwrap();
    let arp = commands
        .iter()
        .position(|c| c == "core: show arp | inc 10.1.2.3")
        .unwrap();
    assert!(detect < arp, "the dialect must be known before reading ARP");
    assert!(!commands.contains(&"core: show arp | inc aa:bb:cc:dd:ee:ff".to_string()));
}

#[test]
fn ip_seed_without_arp_entry_is_unresolved() {
    let topology = Topology::new().switch("core", ELTEX_BANNER);

    let report = walk(
        &topology,
        "core",
        EndpointIdentifier::Ipv4("10.1.2.99".parse().unwrap()),
    );

    assert_eq!(report.mac, None);
    assert_eq!(report.terminal(), Some(&TerminalReason::SeedUnresolved));
    assert_eq!(topology.commands().len(), 2);
}

#[test]
fn silent_ip_seed_is_unresolved_without_reading_arp() {
    let topology = Topology::new().switch("core", ELTEX_BANNER).silent("10.1.2.99");

    let report = walk(
        &topology,
        "core",
        EndpointIdentifier::Ipv4("10.1.2.99".parse().unwrap()),
    );

    assert_eq!(report.mac, None);
    assert_eq!(report.terminal(), Some(&TerminalReason::SeedUnresolved));
    assert!(topology.probed().contains(&"10.1.2.99".to_string()));
    assert_eq!(topology.commands(), ["core: show ver"]);
}

#[test]
fn cancelling_mid_walk_closes_the_session_and_stops() {
    let stop = Arc::new(AtomicBool::new(false));
    let topology = lag_topology().cancel_on("sw1", MAC_TABLE, &stop);
    let walker = topology.walker_with(support::config("core"), Box::new(Headless), stop);

    let result = walker.walk(by_mac(), &mut support::credentials());

    assert!(matches!(result, Err(WalkError::Cancelled)));
    assert_eq!(topology.opened(), ["core", "sw1"]);
    assert_eq!(topology.closed(), ["core", "sw1"]);
    assert!(!topology.probed().contains(&"sw2".to_string()));
    assert!(topology.commands().iter().all(|c| !c.starts_with("sw2:")));
}

#[test]
fn unknown_mac_is_not_found_on_the_core() {
    let topology = Topology::new().switch("core", ELTEX_BANNER);

    let report = walk(&topology, "core", by_mac());

    assert_eq!(report.terminal(), Some(&TerminalReason::NotFound));
    assert!(!report.hops[0].result.located);
    assert!(report.deepest_location().is_none());
}

#[test]
fn vector_family_switches_use_their_own_syntax() {
    for banner in [VECTOR_BANNER, QTECH_BANNER] {
        let topology = Topology::new()
            .switch("core", banner)
            .reply(
                "core",
                "show mac-address-table | inc aa-bb-cc-dd-ee-ff",
                "20   aa-bb-cc-dd-ee-ff  DYNAMIC  Hardware  Ethernet1/0/5",
            )
            .reply(
                "core",
                "show arp | inc aa-bb-cc-dd-ee-ff",
                "10.1.2.3    aa-bb-cc-dd-ee-ff  Vlan20    Ethernet1/0/5   Dynamic",
            );

        let report = walk(&topology, "core", by_mac());

        let hop = &report.hops[0];
        assert_eq!(hop.result.location.as_ref().unwrap().port, "Ethernet1/0/5");
        assert_eq!(report.ip, Some("10.1.2.3".parse().unwrap()));
        assert!(topology
            .commands()
            .contains(&"core: show lldp neighbors brief | inc Ethernet1/0/5".to_string()));
        assert!(topology
            .commands()
            .contains(&"core: show mac-address-table int Ethernet1/0/5".to_string()));
    }
    let qtech = VendorDialect::detect(QTECH_BANNER);
    assert_eq!(qtech, VendorDialect::Qtech);
}
