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

//! # Helper (printer) functions
//! Formatted-string helpers for inspecting FIB, routing table and topology state, plus thin
//! `print_*` wrappers around them for interactive debugging.

use crate::fib::Fib;
use crate::routing_table::RoutingTable;
use crate::topology::Topology;
use crate::types::MetricKind;
use petgraph::dot::Dot;
use petgraph::Graph;
use std::collections::HashMap;

/// One line per destination in a single metric's FIB, listing next hop and weight.
pub fn fib_table(fib: &Fib, metric: MetricKind) -> Vec<String> {
    let mut lines: Vec<String> = fib
        .table(metric)
        .iter()
        .map(|(dest, entry)| {
            format!("{dest} via {next_hop} weight {weight}", dest = dest, next_hop = entry.next_hop, weight = entry.weight)
        })
        .collect();
    lines.sort();
    lines
}

/// One line per row in a single metric's flattened routing table.
pub fn routing_table_rows(table: &RoutingTable, metric: MetricKind) -> Vec<String> {
    table
        .get(metric.routing_table_key())
        .map(|rows| {
            rows.iter()
                .map(|r| {
                    format!(
                        "{proto} {prefix}/{len} via {next_hop} dev {iface}",
                        proto = r.proto,
                        prefix = r.prefix,
                        len = r.prefix_len,
                        next_hop = r.next_hop,
                        iface = r.interface
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Render the currently known direct-neighbour topology as a Graphviz `dot` document, one node
/// per known id and one directed edge per interface it was heard on.
pub fn topology_dot(self_id: &str, topology: &Topology) -> String {
    let mut graph: Graph<&str, String> = Graph::new();
    let mut index = HashMap::new();
    index.insert(self_id, graph.add_node(self_id));
    for id in topology.neighs.keys() {
        index.entry(id.as_str()).or_insert_with(|| graph.add_node(id.as_str()));
    }
    for (id, entry) in &topology.neighs {
        for iface in &entry.ifaces {
            graph.add_edge(index[self_id], index[id.as_str()], iface.0.clone());
        }
    }
    format!("{:?}", Dot::new(&graph))
}

/// Print every metric's FIB to stdout.
pub fn print_fib(fib: &Fib) {
    for metric in MetricKind::ALL {
        println!("FIB[{}]:", metric.wire_key());
        for line in fib_table(fib, metric) {
            println!("    {}", line);
        }
    }
}

/// Print every metric's routing table to stdout.
pub fn print_routing_table(table: &RoutingTable) {
    for metric in MetricKind::ALL {
        println!("routing table [{}]:", metric.routing_table_key());
        for line in routing_table_rows(table, metric) {
            println!("    {}", line);
        }
    }
}
