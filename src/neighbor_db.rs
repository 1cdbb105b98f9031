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

//! Per-interface table of the most recently received advertisement from each sender.

use crate::advertisement::Advertisement;
use crate::types::{InterfaceName, NodeId};
use std::collections::HashMap;

/// One remembered advertisement, along with the time it was last (re-)received.
#[derive(Debug, Clone)]
pub struct NeighborRecord {
    /// Time (per the registered clock) this record was last refreshed.
    pub rx_time: f64,
    /// Last advertisement received from this sender on this interface.
    pub msg: Advertisement,
}

/// Two-level map: interface name -> sender id -> last-seen record.
#[derive(Debug, Clone, Default)]
pub struct NeighborDb {
    interfaces: HashMap<InterfaceName, HashMap<NodeId, NeighborRecord>>,
}

/// What happened when an advertisement was offered to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Sequence number was not newer than the stored one; dropped, rx-time untouched.
    StaleOrDuplicate,
    /// Content was identical once `sequence-no` is masked out; rx-time refreshed, no recalc.
    RefreshedNoChange,
    /// New sender, or content actually changed; stored, recalc required.
    Updated,
}

impl NeighborDb {
    /// Build an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a freshly received advertisement for storage under `(iface, msg.id)`.
    ///
    /// Implements I2 (stale/duplicate sequence numbers are dropped without touching rx-time)
    /// and the "content-unchanged" rule (refresh rx-time, skip recalculation).
    pub fn receive(
        &mut self,
        iface: &InterfaceName,
        rx_time: f64,
        msg: Advertisement,
    ) -> ReceiveOutcome {
        let table = self.interfaces.entry(iface.clone()).or_default();
        match table.get_mut(&msg.id) {
            Some(existing) if msg.sequence_no <= existing.msg.sequence_no => {
                ReceiveOutcome::StaleOrDuplicate
            }
            Some(existing) if existing.msg.content_eq(&msg) => {
                existing.rx_time = rx_time;
                existing.msg = msg;
                ReceiveOutcome::RefreshedNoChange
            }
            _ => {
                table.insert(msg.id.clone(), NeighborRecord { rx_time, msg });
                ReceiveOutcome::Updated
            }
        }
    }

    /// Remove every record whose `rx_time` is older than `now - hold_time`. Returns `true` if
    /// anything was evicted.
    pub fn age_out(&mut self, now: f64, hold_time: f64) -> bool {
        let mut removed_any = false;
        for table in self.interfaces.values_mut() {
            let before = table.len();
            table.retain(|_, record| now - record.rx_time <= hold_time);
            removed_any |= table.len() != before;
        }
        removed_any
    }

    /// Iterate over every `(interface, sender id, record)` currently stored.
    pub fn iter(&self) -> impl Iterator<Item = (&InterfaceName, &NodeId, &NeighborRecord)> {
        self.interfaces.iter().flat_map(|(iface, table)| {
            table.iter().map(move |(id, record)| (iface, id, record))
        })
    }

    /// Look up the most recent record for `sender` on `iface`.
    pub fn get(&self, iface: &InterfaceName, sender: &NodeId) -> Option<&NeighborRecord> {
        self.interfaces.get(iface)?.get(sender)
    }

    /// The originator address `sender` last advertised on `iface`, for the given protocol.
    pub fn originator_addr(
        &self,
        iface: &InterfaceName,
        sender: &NodeId,
        proto: crate::types::Proto,
    ) -> Option<String> {
        let record = self.get(iface, sender)?;
        match proto {
            crate::types::Proto::V4 => Some(record.msg.originator_addr_v4.clone()),
            crate::types::Proto::V6 => record.msg.originator_addr_v6.clone(),
        }
    }

    /// Interfaces on which `sender` has been heard, in no particular order.
    pub fn interfaces_hearing(&self, sender: &NodeId) -> Vec<InterfaceName> {
        self.interfaces
            .iter()
            .filter(|(_, table)| table.contains_key(sender))
            .map(|(iface, _)| iface.clone())
            .collect()
    }

    /// Clear all stored records, e.g. on `stop()`.
    pub fn clear(&mut self) {
        self.interfaces.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::advertisement::RoutingPaths;

    fn msg(id: &str, seq: u64) -> Advertisement {
        Advertisement {
            id: id.into(),
            sequence_no: seq,
            originator_addr_v4: "10.0.0.2".into(),
            originator_addr_v6: None,
            networks: vec![],
            routingpaths: RoutingPaths::default(),
        }
    }

    #[test]
    fn stale_sequence_is_dropped_without_touching_rx_time() {
        let mut db = NeighborDb::new();
        let iface: InterfaceName = "w0".into();
        assert_eq!(db.receive(&iface, 10.0, msg("b", 5)), ReceiveOutcome::Updated);
        assert_eq!(db.receive(&iface, 20.0, msg("b", 3)), ReceiveOutcome::StaleOrDuplicate);
        assert_eq!(db.get(&iface, &"b".into()).unwrap().rx_time, 10.0);
    }

    #[test]
    fn hold_time_evicts_silent_neighbors() {
        let mut db = NeighborDb::new();
        let iface: InterfaceName = "w0".into();
        db.receive(&iface, 0.0, msg("b", 1));
        assert!(!db.age_out(90.0, 90.0));
        assert!(db.age_out(91.0, 90.0));
        assert!(db.get(&iface, &"b".into()).is_none());
    }

    #[test]
    fn unchanged_content_refreshes_without_recalc() {
        let mut db = NeighborDb::new();
        let iface: InterfaceName = "w0".into();
        db.receive(&iface, 0.0, msg("b", 1));
        let outcome = db.receive(&iface, 5.0, msg("b", 2));
        assert_eq!(outcome, ReceiveOutcome::RefreshedNoChange);
        assert_eq!(db.get(&iface, &"b".into()).unwrap().rx_time, 5.0);
    }
}
