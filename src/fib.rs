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

//! In-memory forwarding-information-base: one map per metric, rebuilt from scratch on every
//! recalculation (see [`crate::metric`]).

use crate::path_characteristics::{PathCharacteristics, PathId};
use crate::types::{Edge, MetricKind, NodeId};
use std::collections::HashMap;

/// One destination's entry in a single metric's FIB.
#[derive(Debug, Clone, PartialEq)]
pub struct FibEntry {
    /// Next hop towards this destination.
    pub next_hop: NodeId,
    /// Networks reachable at this destination.
    pub networks: Vec<String>,
    /// Aggregated path weight for this metric.
    pub weight: i64,
    /// Every edge on the path from self to this destination, tagged with the interned link
    /// profile that applies to it.
    pub paths: HashMap<Edge, PathId>,
}

/// All five per-metric FIBs plus the path-characteristics table their edges reference.
#[derive(Debug, Clone, Default)]
pub struct Fib {
    tables: HashMap<MetricKind, HashMap<NodeId, FibEntry>>,
    /// Interned `{loss, bandwidth, cost}` triples referenced by every table's `paths`.
    pub path_characteristics: PathCharacteristics,
}

impl Fib {
    /// Build five empty tables and an empty interning table.
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for metric in MetricKind::ALL {
            tables.insert(metric, HashMap::new());
        }
        Self { tables, path_characteristics: PathCharacteristics::new() }
    }

    /// Borrow one metric's table.
    pub fn table(&self, metric: MetricKind) -> &HashMap<NodeId, FibEntry> {
        &self.tables[&metric]
    }

    /// Mutably borrow one metric's table.
    pub fn table_mut(&mut self, metric: MetricKind) -> &mut HashMap<NodeId, FibEntry> {
        self.tables.get_mut(&metric).expect("all five metrics are always present")
    }

    /// `true` if every metric's table is empty.
    pub fn is_empty(&self) -> bool {
        MetricKind::ALL.iter().all(|m| self.tables[m].is_empty())
    }
}
