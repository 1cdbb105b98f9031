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

//! Module containing the basic identifiers and value types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node in the mesh. Carried verbatim on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of a local network interface, e.g. `"wlan0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterfaceName(pub String);

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InterfaceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// IP protocol version a network or address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proto {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl fmt::Display for Proto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "v4"),
            Self::V6 => write!(f, "v6"),
        }
    }
}

/// Directed edge between two nodes, naming the two endpoints of one hop on a path.
///
/// Replaces the wire encoding `"<from>><to>"` once parsed; loop detection compares
/// [`NodeId`]s directly instead of matching characters within the encoded string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Hop origin.
    pub from: NodeId,
    /// Hop destination.
    pub to: NodeId,
}

impl Edge {
    /// Build a new edge.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// `true` if either endpoint of this edge is `id`.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from == id || &self.to == id
    }

    /// Encode as the wire form `"<from>><to>"`.
    pub fn to_wire(&self) -> String {
        format!("{}>{}", self.from.0, self.to.0)
    }

    /// Parse the wire form `"<from>><to>"`. Node ids may not themselves contain `>`.
    pub fn from_wire(s: &str) -> Option<Self> {
        let (from, to) = s.split_once('>')?;
        Some(Self { from: NodeId(from.to_string()), to: NodeId(to.to_string()) })
    }
}

/// Measured or configured characteristics of a single link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkCharacteristics {
    /// Bandwidth in bytes per second.
    pub bandwidth: u64,
    /// Loss rate as an integer percentage, `0..=100`.
    pub loss: u32,
    /// Monetary/abstract cost of using the link. `0` means free.
    pub cost: u32,
}

impl Default for LinkCharacteristics {
    fn default() -> Self {
        Self { bandwidth: 5000, loss: 0, cost: 0 }
    }
}

/// Per-metric FIB table identifiers, reused both as the routing-paths key on the wire and
/// as the installer-facing routing table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Minimize summed loss.
    LowLoss,
    /// Maximize summed bandwidth.
    HighBandwidth,
    /// Minimize a weighted bandwidth/loss compound score.
    BwAndLoss,
    /// Only consider zero-cost links, minimizing hop-cost.
    NoCost,
    /// Maximize bandwidth among zero-cost links.
    BwAndCost,
}

impl MetricKind {
    /// All five metrics, in the order routing tables are built and emitted.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::LowLoss,
        MetricKind::HighBandwidth,
        MetricKind::BwAndLoss,
        MetricKind::NoCost,
        MetricKind::BwAndCost,
    ];

    /// Key used for this metric inside the wire `routingpaths` object.
    pub fn wire_key(&self) -> &'static str {
        match self {
            MetricKind::LowLoss => "low_loss",
            MetricKind::HighBandwidth => "high_bandwidth",
            MetricKind::BwAndLoss => "bw_and_loss",
            MetricKind::NoCost => "no_cost",
            MetricKind::BwAndCost => "bw_and_cost",
        }
    }

    /// Key used for this metric's flattened table in the routing table handed to the installer.
    pub fn routing_table_key(&self) -> &'static str {
        match self {
            MetricKind::LowLoss => "lowest-loss",
            MetricKind::HighBandwidth => "highest-bandwidth",
            MetricKind::BwAndLoss => "formular_bw_loss",
            MetricKind::NoCost => "no-cost",
            MetricKind::BwAndCost => "filtered-bw-cost",
        }
    }
}
