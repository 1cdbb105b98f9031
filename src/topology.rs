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

//! Builds a single, queryable view of the mesh out of the raw [`NeighborDb`] ahead of FIB
//! computation: who our direct neighbours are and on which interfaces we hear them, plus what
//! each neighbour has advertised for every metric.

use crate::advertisement::AdvertisedFibEntry;
use crate::neighbor_db::NeighborDb;
use crate::types::{InterfaceName, LinkCharacteristics, MetricKind, NodeId};
use std::collections::HashMap;

/// A direct neighbour as seen from the local node.
#[derive(Debug, Clone)]
pub struct NeighborEntry {
    /// The neighbour's id (identical to the map key it's stored under; kept here so a
    /// [`FibEntry`](crate::fib::FibEntry) can be built without re-threading the key).
    pub id: NodeId,
    /// Networks the neighbour originates.
    pub networks: Vec<String>,
    /// Every local interface on which this neighbour has been heard.
    pub ifaces: Vec<InterfaceName>,
}

/// One neighbour's advertised view for a single metric: its FIB for that metric, plus the
/// path-characteristics table its path ids refer to.
#[derive(Debug, Clone, Default)]
pub struct NeighborMetricView {
    /// Destination -> advertised FIB entry, as the neighbour sees it.
    pub table: HashMap<NodeId, AdvertisedFibEntry>,
    /// The neighbour's own path-characteristics interning table.
    pub path_characteristics: HashMap<String, LinkCharacteristics>,
}

/// Synthesized topology view ready for per-metric FIB computation.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// Direct neighbours, keyed by id.
    pub neighs: HashMap<NodeId, NeighborEntry>,
    /// Per-metric, per-neighbour advertised paths.
    pub othernode_paths: HashMap<MetricKind, HashMap<NodeId, NeighborMetricView>>,
}

/// Build a [`Topology`] from the current neighbour database.
pub fn synthesize(db: &NeighborDb) -> Topology {
    let mut by_sender: HashMap<NodeId, Vec<InterfaceName>> = HashMap::new();
    for (iface, sender, _) in db.iter() {
        by_sender.entry(sender.clone()).or_default().push(iface.clone());
    }

    let mut neighs = HashMap::new();
    let mut othernode_paths: HashMap<MetricKind, HashMap<NodeId, NeighborMetricView>> =
        MetricKind::ALL.iter().map(|m| (*m, HashMap::new())).collect();

    for (sender, mut ifaces) in by_sender {
        ifaces.sort();
        ifaces.dedup();
        let representative_iface = ifaces[0].clone();
        let record = db.get(&representative_iface, &sender).expect("just enumerated");
        let networks = record.msg.networks.iter().map(|n| n.to_string()).collect();
        neighs.insert(sender.clone(), NeighborEntry { id: sender.clone(), networks, ifaces });

        if record.msg.routingpaths.is_empty() {
            continue;
        }
        for metric in MetricKind::ALL {
            let advertised = record.msg.routingpaths.table(metric);
            if advertised.is_empty() {
                continue;
            }
            let table = advertised
                .iter()
                .map(|(dest, entry)| (NodeId(dest.clone()), entry.clone()))
                .collect();
            othernode_paths.get_mut(&metric).unwrap().insert(
                sender.clone(),
                NeighborMetricView {
                    table,
                    path_characteristics: record.msg.routingpaths.path_characteristics.clone(),
                },
            );
        }
    }

    Topology { neighs, othernode_paths }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::advertisement::{Advertisement, RoutingPaths};

    fn msg(id: &str) -> Advertisement {
        Advertisement {
            id: id.into(),
            sequence_no: 1,
            originator_addr_v4: "10.0.0.2".into(),
            originator_addr_v6: None,
            networks: vec![],
            routingpaths: RoutingPaths::default(),
        }
    }

    #[test]
    fn direct_neighbor_appears_once_per_interface_heard() {
        let mut db = NeighborDb::new();
        db.receive(&"w0".into(), 0.0, msg("b"));
        db.receive(&"t0".into(), 0.0, msg("b"));
        let topo = synthesize(&db);
        let mut ifaces = topo.neighs[&NodeId::from("b")].ifaces.clone();
        ifaces.sort();
        assert_eq!(ifaces, vec![InterfaceName::from("t0"), InterfaceName::from("w0")]);
    }

    #[test]
    fn neighbor_with_no_routingpaths_contributes_nothing_to_othernode_paths() {
        let mut db = NeighborDb::new();
        db.receive(&"w0".into(), 0.0, msg("b"));
        let topo = synthesize(&db);
        assert!(topo.othernode_paths[&MetricKind::LowLoss].is_empty());
    }
}
