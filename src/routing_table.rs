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

//! Flattens the per-metric FIBs into the installer-facing routing table (C7).

use crate::fib::Fib;
use crate::neighbor_db::NeighborDb;
use crate::types::{Edge, InterfaceName, LinkCharacteristics, MetricKind, NodeId, Proto};
use std::collections::HashMap;

/// One row of a single metric's flattened routing table.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTableRow {
    /// Always `v4`; the core only emits IPv4 routes today.
    pub proto: Proto,
    /// Destination network address.
    pub prefix: String,
    /// Destination network prefix length.
    pub prefix_len: u8,
    /// Outbound interface towards `next_hop`.
    pub interface: InterfaceName,
    /// Next-hop IPv4 address, resolved from the neighbour's last advertisement.
    pub next_hop: String,
}

/// The full installer-facing routing table: one row list per metric, keyed by that metric's
/// [`MetricKind::routing_table_key`].
pub type RoutingTable = HashMap<&'static str, Vec<RoutingTableRow>>;

/// Build the routing table from the current FIB.
///
/// For every destination and every network at that destination, the outbound interface is the
/// one whose configured `link-characteristics` match the interned profile of the
/// `self -> next_hop` edge; the next-hop address is the last address that neighbour advertised
/// on that interface (I4: always resolvable for any entry the FIB builder produced, since a
/// direct-neighbour entry is never created without a reachable interface).
pub fn build(
    self_id: &NodeId,
    fib: &Fib,
    interfaces: &HashMap<InterfaceName, LinkCharacteristics>,
    neighbor_db: &NeighborDb,
) -> RoutingTable {
    let mut table = RoutingTable::new();
    for metric in MetricKind::ALL {
        let mut rows = Vec::new();
        for (dest, entry) in fib.table(metric) {
            let first_hop_edge = Edge::new(self_id.clone(), entry.next_hop.clone());
            let path_id = match entry.paths.get(&first_hop_edge) {
                Some(id) => id,
                None => {
                    log::error!(
                        "FIB entry for {} in {:?} has no first-hop edge; skipping",
                        dest,
                        metric
                    );
                    continue;
                }
            };
            let profile = match fib.path_characteristics.get(path_id) {
                Some(p) => *p,
                None => continue,
            };
            let iface = match interfaces.iter().find(|(_, lc)| **lc == profile) {
                Some((name, _)) => name.clone(),
                None => {
                    log::warn!("no local interface matches profile {:?} for {}", profile, dest);
                    continue;
                }
            };
            let next_hop = match neighbor_db.originator_addr(&iface, &entry.next_hop, Proto::V4) {
                Some(addr) => addr,
                None => {
                    log::warn!(
                        "no v4 address known for next hop {} on {}, dropping route to {}",
                        entry.next_hop,
                        iface,
                        dest
                    );
                    continue;
                }
            };
            for network in &entry.networks {
                let (prefix, prefix_len) = match network.split_once('/') {
                    Some((p, l)) => (p.to_string(), l.parse().unwrap_or(32)),
                    None => continue,
                };
                rows.push(RoutingTableRow {
                    proto: Proto::V4,
                    prefix,
                    prefix_len,
                    interface: iface.clone(),
                    next_hop: next_hop.clone(),
                });
            }
        }
        table.insert(metric.routing_table_key(), rows);
    }
    table
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::advertisement::{Advertisement, RoutingPaths};
    use crate::fib::FibEntry;
    use maplit::hashmap;

    #[test]
    fn single_route_resolves_interface_and_next_hop() {
        let self_id: NodeId = "a".into();
        let interfaces = hashmap! {
            InterfaceName::from("w0") => LinkCharacteristics { bandwidth: 100_000, loss: 0, cost: 1 },
        };
        let mut fib = Fib::new();
        let profile = interfaces[&InterfaceName::from("w0")];
        let path_id = fib.path_characteristics.intern(profile);
        let mut paths = HashMap::new();
        paths.insert(Edge::new(self_id.clone(), "b".into()), path_id);
        fib.table_mut(MetricKind::HighBandwidth).insert(
            "b".into(),
            FibEntry {
                next_hop: "b".into(),
                networks: vec!["192.168.2.0/24".into()],
                weight: 100_000,
                paths,
            },
        );

        let mut db = NeighborDb::new();
        db.receive(
            &"w0".into(),
            0.0,
            Advertisement {
                id: "b".into(),
                sequence_no: 1,
                originator_addr_v4: "10.0.0.9".into(),
                originator_addr_v6: None,
                networks: vec![],
                routingpaths: RoutingPaths::default(),
            },
        );

        let table = build(&self_id, &fib, &interfaces, &db);
        let rows = &table["highest-bandwidth"];
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prefix, "192.168.2.0");
        assert_eq!(rows[0].prefix_len, 24);
        assert_eq!(rows[0].interface, InterfaceName::from("w0"));
        assert_eq!(rows[0].next_hop, "10.0.0.9");
    }
}
