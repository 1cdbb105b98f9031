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

//! Wire format: the advertisement object nodes exchange over multicast.
//!
//! The core never frames or transmits these itself; the embedder serializes an
//! [`Advertisement`] (e.g. to JSON) and hands the bytes to the transport, and deserializes
//! incoming bytes back into one before calling
//! [`Dmpr::msg_rx`](crate::core::Dmpr::msg_rx).

use crate::fib::Fib;
use crate::types::{LinkCharacteristics, MetricKind, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One destination entry inside a single metric's advertised routing paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisedFibEntry {
    /// Next hop towards this destination, from the advertiser's point of view.
    #[serde(rename = "next-hop")]
    pub next_hop: NodeId,
    /// Networks reachable at this destination.
    pub networks: Vec<String>,
    /// Path weight for this metric, already aggregated by the advertiser.
    pub weight: i64,
    /// Edges on the path from the advertiser to this destination, keyed by wire-encoded
    /// `"<from>><to>"` and valued by a path-characteristics id local to the advertiser.
    pub paths: HashMap<String, String>,
}

/// All five metrics' advertised FIBs, plus the path-characteristics table the path ids in
/// those FIBs refer to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingPaths {
    /// `low_loss` metric FIB.
    #[serde(default)]
    pub low_loss: HashMap<String, AdvertisedFibEntry>,
    /// `high_bandwidth` metric FIB.
    #[serde(default)]
    pub high_bandwidth: HashMap<String, AdvertisedFibEntry>,
    /// `bw_and_loss` metric FIB.
    #[serde(default)]
    pub bw_and_loss: HashMap<String, AdvertisedFibEntry>,
    /// `no_cost` metric FIB.
    #[serde(default)]
    pub no_cost: HashMap<String, AdvertisedFibEntry>,
    /// `bw_and_cost` metric FIB.
    #[serde(default)]
    pub bw_and_cost: HashMap<String, AdvertisedFibEntry>,
    /// Interning table from path id (decimal string) to the link profile it stands for.
    #[serde(default)]
    pub path_characteristics: HashMap<String, LinkCharacteristics>,
}

impl RoutingPaths {
    /// `true` if every metric's FIB is empty, i.e. this node has nothing to advertise yet.
    pub fn is_empty(&self) -> bool {
        self.low_loss.is_empty()
            && self.high_bandwidth.is_empty()
            && self.bw_and_loss.is_empty()
            && self.no_cost.is_empty()
            && self.bw_and_cost.is_empty()
    }

    /// Borrow the FIB map for one metric.
    pub fn table(&self, metric: crate::types::MetricKind) -> &HashMap<String, AdvertisedFibEntry> {
        use crate::types::MetricKind::*;
        match metric {
            LowLoss => &self.low_loss,
            HighBandwidth => &self.high_bandwidth,
            BwAndLoss => &self.bw_and_loss,
            NoCost => &self.no_cost,
            BwAndCost => &self.bw_and_cost,
        }
    }

    /// Mutably borrow the FIB map for one metric.
    pub fn table_mut(
        &mut self,
        metric: crate::types::MetricKind,
    ) -> &mut HashMap<String, AdvertisedFibEntry> {
        use crate::types::MetricKind::*;
        match metric {
            LowLoss => &mut self.low_loss,
            HighBandwidth => &mut self.high_bandwidth,
            BwAndLoss => &mut self.bw_and_loss,
            NoCost => &mut self.no_cost,
            BwAndCost => &mut self.bw_and_cost,
        }
    }

    /// Translate an in-memory [`Fib`] (structured edges and interned path ids) into its wire
    /// representation (string-encoded edges and path ids) for inclusion in an outgoing
    /// advertisement.
    pub fn from_fib(fib: &Fib) -> Self {
        let mut out = RoutingPaths::default();
        for metric in MetricKind::ALL {
            let wire_table = out.table_mut(metric);
            for (dest, entry) in fib.table(metric) {
                let paths = entry
                    .paths
                    .iter()
                    .map(|(edge, path_id)| (edge.to_wire(), path_id.to_wire()))
                    .collect();
                wire_table.insert(
                    dest.0.clone(),
                    AdvertisedFibEntry {
                        next_hop: entry.next_hop.clone(),
                        networks: entry.networks.clone(),
                        weight: entry.weight,
                        paths,
                    },
                );
            }
        }
        out.path_characteristics = fib.path_characteristics.to_wire();
        out
    }
}

/// A single originated IPv4 network, wire-encoded as the one-key object
/// `{"v4-prefix": "<addr>/<len>"}`, matching the format every other DMPR implementation sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireNetwork {
    /// The network in `<addr>/<len>` form.
    #[serde(rename = "v4-prefix")]
    pub v4_prefix: String,
}

impl fmt::Display for WireNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.v4_prefix)
    }
}

/// The advertisement object exchanged on one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Originating node id.
    pub id: NodeId,
    /// Per-interface monotonic sequence number.
    #[serde(rename = "sequence-no")]
    pub sequence_no: u64,
    /// IPv4 address of the originator on the interface this was sent on.
    #[serde(rename = "originator-addr-v4")]
    pub originator_addr_v4: String,
    /// IPv6 address of the originator on the interface this was sent on, if any.
    #[serde(rename = "originator-addr-v6", default)]
    pub originator_addr_v6: Option<String>,
    /// Networks originated by this node. Only IPv4 networks are ever carried here; the wire
    /// format has no IPv6 counterpart for this field.
    pub networks: Vec<WireNetwork>,
    /// This node's current FIBs, empty until at least one metric has a route.
    #[serde(default)]
    pub routingpaths: RoutingPaths,
}

impl Advertisement {
    /// Structural equality with `sequence_no` masked out, used to decide whether a re-received
    /// advertisement actually changed anything (and therefore whether a recalculation is due).
    pub fn content_eq(&self, other: &Advertisement) -> bool {
        self.id == other.id
            && self.originator_addr_v4 == other.originator_addr_v4
            && self.originator_addr_v6 == other.originator_addr_v6
            && self.networks == other.networks
            && self.routingpaths == other.routingpaths
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn msg(seq: u64) -> Advertisement {
        Advertisement {
            id: "a".into(),
            sequence_no: seq,
            originator_addr_v4: "10.0.0.1".into(),
            originator_addr_v6: None,
            networks: vec![],
            routingpaths: RoutingPaths::default(),
        }
    }

    #[test]
    fn content_eq_ignores_sequence_no() {
        assert!(msg(1).content_eq(&msg(2)));
    }

    #[test]
    fn content_eq_detects_real_changes() {
        let mut other = msg(1);
        other.originator_addr_v4 = "10.0.0.2".into();
        assert!(!msg(1).content_eq(&other));
    }

    #[test]
    fn empty_routing_paths_reports_empty() {
        assert!(RoutingPaths::default().is_empty());
    }

    #[test]
    fn wire_network_serializes_as_single_key_object() {
        let net = WireNetwork { v4_prefix: "192.168.2.0/24".into() };
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, r#"{"v4-prefix":"192.168.2.0/24"}"#);
    }
}
