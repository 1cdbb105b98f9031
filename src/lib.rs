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

#![deny(missing_docs)]

//! # dmpr: Dynamic MultiPath Routing
//!
//! A distance-vector routing core for nodes that expose several heterogeneous links at once
//! (Wi-Fi, cellular, satellite, ...) and want to advertise and install routes for more than one
//! competing metric simultaneously: lowest loss, highest bandwidth, a compound bandwidth/loss
//! score, a cost-free policy, and cost-free high bandwidth.
//!
//! ## Structure
//!
//! - **[`config`]**: static configuration intake and validation (C1).
//! - **[`callbacks`]**: bindings to the three external collaborators the core never talks to
//!   directly: a clock, a packet transmitter, and a routing-table installer (C2).
//! - **[`neighbor_db`]**: per-interface table of the most recently heard advertisement from
//!   each sender, with hold-time eviction (C3).
//! - **[`topology`]**: synthesizes a single queryable view of direct neighbours and their
//!   advertised paths out of the neighbour database (C5).
//! - **[`metric`]**: the generic, descriptor-driven per-metric FIB builder (C6).
//! - **[`fib`]**: in-memory FIB types and the path-characteristics interning table.
//! - **[`routing_table`]**: flattens the FIB into the installer-facing routing table (C7).
//! - **[`advertisement`]**: the wire format exchanged between nodes, and the builder that
//!   composes an outgoing one from the current FIB (C8).
//! - **[`core`]**: [`core::Dmpr`], the daemon tying all of the above together behind `start`,
//!   `stop`, `tick`, `msg_rx` and friends (C4).
//! - **[`print`]**: formatted-string helpers for inspecting FIB/routing-table/topology state.
//!
//! ## Usage
//!
//! ```rust
//! use dmpr::core::Dmpr;
//! use dmpr::config::{DmprConfig, InterfaceConfig};
//! use dmpr::types::{InterfaceName, LinkCharacteristics, Proto};
//!
//! fn get_time(t: &mut f64) -> f64 { *t }
//! fn tx(_iface: &InterfaceName, _proto: Proto, _dst: &str, _msg: &str, _p: &mut f64) {}
//! fn install(_table: &dmpr::routing_table::RoutingTable, _p: &mut f64) {}
//!
//! let mut dmpr: Dmpr<f64> = Dmpr::new();
//! dmpr.register_configuration(DmprConfig {
//!     id: "node-a".into(),
//!     rtn_msg_interval: None,
//!     rtn_msg_interval_jitter: None,
//!     rtn_msg_hold_time: None,
//!     mcast_v4_tx_addr: "224.0.1.10".into(),
//!     mcast_v6_tx_addr: "ff02::1".into(),
//!     interfaces: vec![InterfaceConfig {
//!         name: "wlan0".into(),
//!         addr_v4: "10.0.0.1".into(),
//!         addr_v6: None,
//!         link_characteristics: Some(LinkCharacteristics { bandwidth: 100_000, loss: 0, cost: 0 }),
//!     }],
//!     networks: vec![],
//!     proto_transport_enable: vec!["v4".into()],
//! }).unwrap();
//! dmpr.register_get_time_cb(get_time, 0.0);
//! dmpr.register_msg_tx_cb(tx, 0.0);
//! dmpr.register_routing_table_update_cb(install, 0.0);
//! dmpr.start().unwrap();
//! ```

pub mod advertisement;
pub mod callbacks;
pub mod config;
pub mod core;
pub mod error;
pub mod fib;
pub mod metric;
pub mod neighbor_db;
pub mod path_characteristics;
pub mod print;
pub mod routing_table;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;

pub use core::Dmpr;
pub use error::DmprError;
