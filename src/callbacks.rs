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

//! Callback bindings to the three external collaborators the core never talks to directly: a
//! clock, a packet transmitter, and a routing-table installer.

use crate::routing_table::RoutingTable;
use crate::types::{InterfaceName, Proto};

/// Supplies the current time, in seconds. Must be monotonic across a run; may be a wall clock
/// or a simulated one.
pub type GetTimeFn<P> = fn(&mut P) -> f64;

/// Hands a serialized advertisement to the transport for transmission.
pub type PacketTxFn<P> = fn(iface: &InterfaceName, proto: Proto, dst_mcast_addr: &str, msg: &str, priv_data: &mut P);

/// Installs a freshly computed routing table.
pub type RoutingTableUpdateFn<P> = fn(table: &RoutingTable, priv_data: &mut P);

/// The three mandatory callback registrations, each paired with an opaque private datum that is
/// passed back to it on every invocation. `start()` requires all three to be set.
pub struct Callbacks<P> {
    pub(crate) get_time: Option<(GetTimeFn<P>, P)>,
    pub(crate) packet_tx: Option<(PacketTxFn<P>, P)>,
    pub(crate) routing_table_update: Option<(RoutingTableUpdateFn<P>, P)>,
}

impl<P> Default for Callbacks<P> {
    fn default() -> Self {
        Self { get_time: None, packet_tx: None, routing_table_update: None }
    }
}

impl<P> Callbacks<P> {
    /// `true` once all three callbacks have been registered.
    pub fn is_ready(&self) -> bool {
        self.get_time.is_some() && self.packet_tx.is_some() && self.routing_table_update.is_some()
    }
}
