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

//! Generic per-metric FIB builder.
//!
//! The five metrics (`low_loss`, `high_bandwidth`, `bw_and_loss`, `no_cost`, `bw_and_cost`)
//! differ only in three places: which scalar a local interface is scored on, whether bigger or
//! smaller is better, and which scalar is summed along a path to get its weight. A
//! [`MetricDescriptor`] captures exactly those three things, and [`build_fib_for_metric`] runs
//! the shared two-phase algorithm (direct neighbours, then one-hop relaxation through their
//! advertised paths) once per descriptor instead of five near-identical functions.

use crate::fib::{Fib, FibEntry};
use crate::topology::Topology;
use crate::types::{Edge, InterfaceName, LinkCharacteristics, MetricKind, NodeId};
use std::collections::HashMap;

/// Compound-metric weighting constants (`k1` for the bandwidth term, `k2` for the loss term),
/// matching the weighting used across implementations of this metric.
const COMPOUND_K1: i64 = 1;
const COMPOUND_K2: i64 = 100;
const COMPOUND_BW_NUMERATOR: i64 = 10_000_000;

/// The three axes along which the five metrics differ.
pub struct MetricDescriptor {
    /// Which table this descriptor builds.
    pub kind: MetricKind,
    /// Score a candidate local interface for reaching a direct neighbour. `None` means the
    /// interface is filtered out for this metric (e.g. a nonzero-cost link under `no_cost`).
    pub local_scalar: fn(&LinkCharacteristics) -> Option<i64>,
    /// `true` if a larger scalar/weight is better (bandwidth metrics), `false` if smaller is
    /// better (loss, compound, cost).
    pub maximize: bool,
    /// Field summed along a path to produce its aggregate weight.
    pub weight_field: fn(&LinkCharacteristics) -> i64,
}

fn bw_and_loss_scalar(lc: &LinkCharacteristics) -> i64 {
    let bw_term = if lc.bandwidth == 0 {
        COMPOUND_BW_NUMERATOR
    } else {
        COMPOUND_BW_NUMERATOR / lc.bandwidth as i64
    };
    COMPOUND_K1 * bw_term + COMPOUND_K2 * lc.loss as i64
}

impl MetricDescriptor {
    /// The descriptor for a given metric.
    pub fn for_metric(kind: MetricKind) -> Self {
        match kind {
            MetricKind::LowLoss => Self {
                kind,
                local_scalar: |lc| Some(lc.loss as i64),
                maximize: false,
                weight_field: |lc| lc.loss as i64,
            },
            MetricKind::HighBandwidth => Self {
                kind,
                local_scalar: |lc| Some(lc.bandwidth as i64),
                maximize: true,
                weight_field: |lc| lc.bandwidth as i64,
            },
            MetricKind::BwAndLoss => Self {
                kind,
                local_scalar: |lc| Some(bw_and_loss_scalar(lc)),
                maximize: false,
                weight_field: bw_and_loss_scalar,
            },
            MetricKind::NoCost => Self {
                kind,
                local_scalar: |lc| if lc.cost == 0 { Some(lc.cost as i64) } else { None },
                maximize: false,
                weight_field: |lc| lc.cost as i64,
            },
            MetricKind::BwAndCost => Self {
                kind,
                local_scalar: |lc| if lc.cost == 0 { Some(lc.bandwidth as i64) } else { None },
                maximize: true,
                weight_field: |lc| lc.bandwidth as i64,
            },
        }
    }

    /// Compares two local-interface scalars for Phase A's best-interface selection, respecting
    /// `maximize`. Phase B's relaxation always accepts on strict weight improvement regardless
    /// of metric direction; this is not used there.
    fn better(&self, candidate: i64, current: i64) -> bool {
        if self.maximize {
            candidate > current
        } else {
            candidate < current
        }
    }
}

/// Build the FIB table for one metric into `fib`, given the local interface table and the
/// synthesized mesh topology.
///
/// Phase A picks, for each direct neighbour, the single best local interface under this
/// metric (direction-dependent on `maximize`). Phase B relaxes one hop past each reachable
/// neighbour's own advertised FIB for this metric, rejecting any candidate whose path touches
/// `self_id` (loop avoidance, I3) and accepting a candidate only if its weight is strictly
/// smaller than the current entry's, regardless of metric direction: the weight is already an
/// accumulated path cost by this point, not a raw per-link scalar.
pub fn build_fib_for_metric(
    descriptor: &MetricDescriptor,
    self_id: &NodeId,
    interfaces: &HashMap<InterfaceName, LinkCharacteristics>,
    topology: &Topology,
    fib: &mut Fib,
) {
    let mut neighbor_ids: Vec<&NodeId> = topology.neighs.keys().collect();
    neighbor_ids.sort();

    // Phase A: best local interface per direct neighbour.
    for id in &neighbor_ids {
        let neighbor = &topology.neighs[*id];
        let mut best: Option<(&InterfaceName, i64)> = None;
        for iface in &neighbor.ifaces {
            let lc = match interfaces.get(iface) {
                Some(lc) => lc,
                None => continue,
            };
            let scalar = match (descriptor.local_scalar)(lc) {
                Some(s) => s,
                None => continue,
            };
            best = match best {
                None => Some((iface, scalar)),
                Some((_, current)) if descriptor.better(scalar, current) => Some((iface, scalar)),
                other => other,
            };
        }
        let (iface, _) = match best {
            Some(v) => v,
            None => continue,
        };
        let lc = interfaces[iface];
        let path_id = fib.path_characteristics.intern(lc);
        let mut paths = HashMap::new();
        paths.insert(Edge::new(self_id.clone(), neighbor.id.clone()), path_id);
        fib.table_mut(descriptor.kind).insert(
            neighbor.id.clone(),
            FibEntry {
                next_hop: neighbor.id.clone(),
                networks: neighbor.networks.clone(),
                weight: (descriptor.weight_field)(&lc),
                paths,
            },
        );
    }

    // Phase B: relax one hop past each reachable neighbour's advertised FIB for this metric.
    let advertised = match topology.othernode_paths.get(&descriptor.kind) {
        Some(m) => m,
        None => return,
    };
    for id in &neighbor_ids {
        let base_weight = match fib.table(descriptor.kind).get(*id) {
            Some(entry) => entry.weight,
            None => continue, // this metric filtered out the direct link entirely
        };
        let view = match advertised.get(*id) {
            Some(v) => v,
            None => continue,
        };
        let mut candidates: Vec<(NodeId, i64, HashMap<Edge, crate::path_characteristics::PathId>)> =
            Vec::new();
        for (dest, entry) in &view.table {
            if *dest == *self_id {
                continue;
            }
            let mut loops = false;
            let mut translated: HashMap<Edge, crate::path_characteristics::PathId> = HashMap::new();
            for (edge_str, path_id_str) in &entry.paths {
                let edge = match Edge::from_wire(edge_str) {
                    Some(e) => e,
                    None => continue,
                };
                if edge.touches(self_id) {
                    loops = true;
                    break;
                }
                let lc = match view.path_characteristics.get(path_id_str) {
                    Some(lc) => *lc,
                    None => continue,
                };
                let id = fib.path_characteristics.intern(lc);
                translated.insert(edge, id);
            }
            if loops {
                continue;
            }
            let candidate_weight = base_weight + entry.weight;
            candidates.push((dest.clone(), candidate_weight, translated));
        }

        let base_path_id = {
            let entry = &fib.table(descriptor.kind)[*id];
            *entry.paths.get(&Edge::new(self_id.clone(), (*id).clone())).unwrap()
        };

        for (dest, candidate_weight, translated) in candidates {
            let should_accept = match fib.table(descriptor.kind).get(&dest) {
                None => true,
                Some(current) => candidate_weight < current.weight,
            };
            if !should_accept {
                continue;
            }
            let mut paths = HashMap::new();
            paths.insert(Edge::new(self_id.clone(), (*id).clone()), base_path_id);
            paths.extend(translated);
            let networks = view.table[&dest].networks.clone();
            fib.table_mut(descriptor.kind).insert(
                dest,
                FibEntry { next_hop: (*id).clone(), networks, weight: candidate_weight, paths },
            );
        }
    }
}
