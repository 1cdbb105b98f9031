// Snowcap: Synthesizing Network-Wide Configuration Updates
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! End-to-end scenarios exercised through the public [`Dmpr`] API, complementing the unit
//! tests kept alongside each module.

use crate::advertisement::{Advertisement, RoutingPaths, WireNetwork};
use crate::config::{DmprConfig, InterfaceConfig};
use crate::core::Dmpr;
use crate::types::{InterfaceName, LinkCharacteristics, Proto};
use maplit::hashmap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

type Clock = Rc<RefCell<f64>>;

fn clock_cb(c: &mut Clock) -> f64 {
    *c.borrow()
}

fn noop_tx(_i: &InterfaceName, _p: Proto, _d: &str, _m: &str, _c: &mut Clock) {}
fn noop_install(_t: &crate::routing_table::RoutingTable, _c: &mut Clock) {}

fn two_link_config() -> DmprConfig {
    DmprConfig {
        id: "a".into(),
        rtn_msg_interval: Some(30),
        rtn_msg_interval_jitter: Some(0),
        rtn_msg_hold_time: Some(90),
        mcast_v4_tx_addr: "224.0.1.10".into(),
        mcast_v6_tx_addr: "ff02::1".into(),
        interfaces: vec![
            InterfaceConfig {
                name: "w0".into(),
                addr_v4: "10.0.0.1".into(),
                addr_v6: None,
                link_characteristics: Some(LinkCharacteristics {
                    bandwidth: 100_000,
                    loss: 0,
                    cost: 1,
                }),
            },
            InterfaceConfig {
                name: "t0".into(),
                addr_v4: "10.0.1.1".into(),
                addr_v6: None,
                link_characteristics: Some(LinkCharacteristics {
                    bandwidth: 10_000,
                    loss: 0,
                    cost: 0,
                }),
            },
        ],
        networks: vec![],
        proto_transport_enable: vec!["v4".into()],
    }
}

fn started_dmpr(cfg: DmprConfig) -> (Dmpr<Clock>, Clock) {
    let clock: Clock = Rc::new(RefCell::new(0.0));
    let mut dmpr: Dmpr<Clock> = Dmpr::with_rng(StdRng::seed_from_u64(7));
    dmpr.register_configuration(cfg).unwrap();
    dmpr.register_get_time_cb(clock_cb, clock.clone());
    dmpr.register_msg_tx_cb(noop_tx, clock.clone());
    dmpr.register_routing_table_update_cb(noop_install, clock.clone());
    dmpr.start().unwrap();
    (dmpr, clock)
}

fn neighbor_msg(id: &str, seq: u64, addr: &str) -> Advertisement {
    Advertisement {
        id: id.into(),
        sequence_no: seq,
        originator_addr_v4: addr.into(),
        originator_addr_v6: None,
        networks: vec![WireNetwork { v4_prefix: "192.168.2.0/24".into() }],
        routingpaths: RoutingPaths::default(),
    }
}

/// S2: parallel links to the same neighbour, metric-dependent interface selection.
#[test]
fn parallel_links_select_interface_per_metric() {
    let (mut dmpr, _clock) = started_dmpr(two_link_config());
    dmpr.msg_rx(&"w0".into(), neighbor_msg("b", 1, "10.0.0.9"));
    dmpr.msg_rx(&"t0".into(), neighbor_msg("b", 1, "10.0.1.9"));

    let table = dmpr.routing_table();
    let bw_rows = &table["highest-bandwidth"];
    assert_eq!(bw_rows.len(), 1);
    assert_eq!(bw_rows[0].interface, InterfaceName::from("w0"));

    let cost_rows = &table["filtered-bw-cost"];
    assert_eq!(cost_rows.len(), 1);
    assert_eq!(cost_rows[0].interface, InterfaceName::from("t0"));
}

/// S5: a silent neighbour is evicted once the hold time elapses, and the routing table updates.
#[test]
fn hold_time_evicts_silent_neighbor() {
    let (mut dmpr, clock) = started_dmpr(two_link_config());
    dmpr.msg_rx(&"w0".into(), neighbor_msg("b", 1, "10.0.0.9"));
    assert_eq!(dmpr.routing_table()["highest-bandwidth"].len(), 1);

    *clock.borrow_mut() = 90.0;
    dmpr.tick();
    assert!(dmpr.neighbor_db().get(&"w0".into(), &"b".into()).is_some());

    *clock.borrow_mut() = 91.0;
    dmpr.tick();
    assert!(dmpr.neighbor_db().get(&"w0".into(), &"b".into()).is_none());
    assert!(dmpr.routing_table()["highest-bandwidth"].is_empty());
}

/// S6: a replayed (stale) sequence number is dropped without disturbing the stored rx-time.
#[test]
fn stale_sequence_replay_is_dropped() {
    let (mut dmpr, clock) = started_dmpr(two_link_config());
    *clock.borrow_mut() = 10.0;
    dmpr.msg_rx(&"w0".into(), neighbor_msg("b", 5, "10.0.0.9"));

    *clock.borrow_mut() = 20.0;
    dmpr.msg_rx(&"w0".into(), neighbor_msg("b", 3, "10.0.0.9"));

    let record = dmpr.neighbor_db().get(&"w0".into(), &"b".into()).unwrap();
    assert_eq!(record.rx_time, 10.0);
    assert_eq!(record.msg.sequence_no, 5);
}

/// Using interned path-characteristics with identical profiles does not duplicate entries.
#[test]
fn path_characteristics_table_stays_compact() {
    let interfaces = hashmap! {
        InterfaceName::from("w0") => LinkCharacteristics { bandwidth: 1000, loss: 1, cost: 0 },
        InterfaceName::from("t0") => LinkCharacteristics { bandwidth: 1000, loss: 1, cost: 0 },
    };
    let mut table = crate::path_characteristics::PathCharacteristics::new();
    for lc in interfaces.values() {
        table.intern(*lc);
    }
    assert_eq!(table.len(), 1);
}
