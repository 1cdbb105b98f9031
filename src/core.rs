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

//! The daemon itself: ties configuration, callbacks, the neighbour database and the per-metric
//! FIB builders together behind the public operations described in the crate's top-level
//! documentation.

use crate::advertisement::{Advertisement, RoutingPaths};
use crate::callbacks::Callbacks;
use crate::config::DmprConfig;
use crate::error::{ConfigError, InternalError};
use crate::fib::Fib;
use crate::metric::{build_fib_for_metric, MetricDescriptor};
use crate::neighbor_db::{NeighborDb, ReceiveOutcome};
use crate::routing_table::{self, RoutingTable};
use crate::topology;
use crate::types::{InterfaceName, LinkCharacteristics, MetricKind, NodeId, Proto};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// The DMPR routing core.
///
/// `P` is the private-data type threaded through the three registered callbacks (see
/// [`crate::callbacks`]); pass `()` if no context is needed.
pub struct Dmpr<P> {
    config: Option<DmprConfig>,
    callbacks: Callbacks<P>,
    started: bool,
    neighbor_db: NeighborDb,
    fib: Fib,
    routing_table: RoutingTable,
    seq_no: HashMap<InterfaceName, u64>,
    next_tx_time: f64,
    rng: StdRng,
}

impl<P> Default for Dmpr<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Dmpr<P> {
    /// Build an unconfigured daemon with a non-deterministic jitter source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Build an unconfigured daemon with an explicit jitter source, for deterministic tests.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            config: None,
            callbacks: Callbacks::default(),
            started: false,
            neighbor_db: NeighborDb::new(),
            fib: Fib::new(),
            routing_table: RoutingTable::new(),
            seq_no: HashMap::new(),
            next_tx_time: 0.0,
            rng,
        }
    }

    /// Validate and store the daemon's configuration (C1).
    pub fn register_configuration(&mut self, cfg: DmprConfig) -> Result<(), ConfigError> {
        let validated = cfg.validate()?;
        self.config = Some(validated);
        Ok(())
    }

    /// Register the clock callback.
    pub fn register_get_time_cb(&mut self, f: crate::callbacks::GetTimeFn<P>, priv_data: P) {
        self.callbacks.get_time = Some((f, priv_data));
    }

    /// Register the packet-transmit callback.
    pub fn register_msg_tx_cb(&mut self, f: crate::callbacks::PacketTxFn<P>, priv_data: P) {
        self.callbacks.packet_tx = Some((f, priv_data));
    }

    /// Register the routing-table-update callback.
    pub fn register_routing_table_update_cb(
        &mut self,
        f: crate::callbacks::RoutingTableUpdateFn<P>,
        priv_data: P,
    ) {
        self.callbacks.routing_table_update = Some((f, priv_data));
    }

    /// Start the daemon: resets all runtime state and schedules an immediate (jittered) first
    /// transmission. Fails if the configuration or any callback is missing.
    pub fn start(&mut self) -> Result<(), InternalError> {
        if self.config.is_none() {
            return Err(InternalError::NotReady("configuration"));
        }
        if !self.callbacks.is_ready() {
            return Err(InternalError::NotReady("callbacks"));
        }
        self.neighbor_db.clear();
        self.fib = Fib::new();
        self.routing_table = RoutingTable::new();
        self.seq_no.clear();
        let now = self.get_time();
        let jitter = self.config.as_ref().unwrap().jitter();
        self.next_tx_time = now + self.jitter_draw(jitter);
        self.started = true;
        Ok(())
    }

    /// Stop the daemon. The last-installed routing table is cleared; the embedder is
    /// responsible for uninstalling it from the OS if needed.
    pub fn stop(&mut self) {
        self.routing_table = RoutingTable::new();
        self.started = false;
    }

    /// Stop then start the daemon.
    pub fn restart(&mut self) -> Result<(), InternalError> {
        self.stop();
        self.start()
    }

    /// `true` if the daemon has been started and not yet stopped.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Drive aging and, if due, transmission. Must be called roughly once per second by the
    /// host (C4).
    pub fn tick(&mut self) {
        if !self.started {
            return;
        }
        let now = self.get_time();
        let hold_time = self.config.as_ref().unwrap().hold_time() as f64;
        if self.neighbor_db.age_out(now, hold_time) {
            self.recalculate_routing_table();
        }
        if now >= self.next_tx_time {
            self.transmit_all(now);
            let interval = self.config.as_ref().unwrap().interval();
            let jitter = self.config.as_ref().unwrap().jitter();
            self.next_tx_time = now + interval as f64 + self.jitter_draw(jitter);
        }
    }

    /// Handle a received advertisement on `iface` (receive path, §4.5).
    pub fn msg_rx(&mut self, iface: &InterfaceName, msg: Advertisement) {
        let configured = match &self.config {
            Some(c) => c,
            None => return,
        };
        if !configured.interfaces.iter().any(|i| &InterfaceName(i.name.clone()) == iface) {
            log::error!("received advertisement on unconfigured interface {}", iface);
            return;
        }
        if msg.id == self.id() {
            log::error!("dropping advertisement from self (id {})", msg.id);
            return;
        }
        let now = self.get_time();
        match self.neighbor_db.receive(iface, now, msg) {
            ReceiveOutcome::Updated => self.recalculate_routing_table(),
            ReceiveOutcome::StaleOrDuplicate | ReceiveOutcome::RefreshedNoChange => {}
        }
    }

    /// Resolve the next-hop IPv4/IPv6 address for `node` as last advertised on `iface`.
    ///
    /// Errors if `iface` is not part of the registered configuration (I4 only promises
    /// resolvability for entries the FIB builder actually produced; an unknown interface is a
    /// programmer error). Returns `Ok(None)` with a logged warning if `node` has not been heard
    /// on that interface.
    pub fn next_hop_ip_addr(
        &self,
        proto: Proto,
        node: &NodeId,
        iface: &InterfaceName,
    ) -> Result<Option<String>, InternalError> {
        if !self.interfaces_map().contains_key(iface) {
            return Err(InternalError::UnknownInterface(iface.clone()));
        }
        match self.neighbor_db.originator_addr(iface, node, proto) {
            Some(addr) => Ok(Some(addr)),
            None => {
                log::warn!("no {} address known for {} on {}", proto, node, iface);
                Ok(None)
            }
        }
    }

    /// Current routing table, as last handed to the installer callback.
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Current FIB, mostly useful for debugging/printing (see [`crate::print`]).
    pub fn fib(&self) -> &Fib {
        &self.fib
    }

    /// Current neighbour database, mostly useful for debugging/printing.
    pub fn neighbor_db(&self) -> &NeighborDb {
        &self.neighbor_db
    }

    fn id(&self) -> NodeId {
        NodeId(self.config.as_ref().expect("configured").id.clone())
    }

    fn interfaces_map(&self) -> HashMap<InterfaceName, LinkCharacteristics> {
        self.config
            .as_ref()
            .map(|c| {
                c.interfaces
                    .iter()
                    .map(|i| {
                        (
                            InterfaceName(i.name.clone()),
                            i.link_characteristics.unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn recalculate_routing_table(&mut self) {
        let self_id = self.id();
        let interfaces = self.interfaces_map();
        let topo = topology::synthesize(&self.neighbor_db);
        let mut fib = Fib::new();
        for metric in MetricKind::ALL {
            let descriptor = MetricDescriptor::for_metric(metric);
            build_fib_for_metric(&descriptor, &self_id, &interfaces, &topo, &mut fib);
        }
        self.fib = fib;
        self.routing_table =
            routing_table::build(&self_id, &self.fib, &interfaces, &self.neighbor_db);
        if let Some((f, priv_data)) = self.callbacks.routing_table_update.as_mut() {
            f(&self.routing_table, priv_data);
        }
    }

    fn transmit_all(&mut self, _now: f64) {
        let config = self.config.as_ref().expect("started implies configured").clone();
        let self_id = self.id();
        let routingpaths =
            if self.fib.is_empty() { RoutingPaths::default() } else { RoutingPaths::from_fib(&self.fib) };
        for iface in &config.interfaces {
            let name = InterfaceName(iface.name.clone());
            let seq = self.seq_no.entry(name.clone()).or_insert(0);
            let msg = Advertisement {
                id: self_id.clone(),
                sequence_no: *seq,
                originator_addr_v4: iface.addr_v4.clone(),
                originator_addr_v6: iface.addr_v6.clone(),
                networks: config
                    .networks
                    .iter()
                    .filter(|n| n.proto == Proto::V4)
                    .map(|n| crate::advertisement::WireNetwork {
                        v4_prefix: format!("{}/{}", n.prefix, n.prefix_len),
                    })
                    .collect(),
                routingpaths: routingpaths.clone(),
            };
            *seq += 1;
            let payload = match serde_json::to_string(&msg) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("failed to serialize advertisement for {}: {}", name, e);
                    continue;
                }
            };
            if let Some((f, priv_data)) = self.callbacks.packet_tx.as_mut() {
                f(&name, Proto::V4, &config.mcast_v4_tx_addr, &payload, priv_data);
            }
        }
    }

    fn get_time(&mut self) -> f64 {
        let (f, priv_data) =
            self.callbacks.get_time.as_mut().expect("start() requires get_time to be registered");
        f(priv_data)
    }

    fn jitter_draw(&mut self, jitter: u32) -> f64 {
        if jitter == 0 {
            0.0
        } else {
            self.rng.gen_range(0, jitter + 1) as f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{DmprConfig, InterfaceConfig};

    fn config() -> DmprConfig {
        DmprConfig {
            id: "a".into(),
            rtn_msg_interval: Some(30),
            rtn_msg_interval_jitter: Some(0),
            rtn_msg_hold_time: Some(90),
            mcast_v4_tx_addr: "224.0.1.10".into(),
            mcast_v6_tx_addr: "ff02::1".into(),
            interfaces: vec![InterfaceConfig {
                name: "w0".into(),
                addr_v4: "10.0.0.1".into(),
                addr_v6: None,
                link_characteristics: Some(LinkCharacteristics {
                    bandwidth: 100_000,
                    loss: 0,
                    cost: 1,
                }),
            }],
            networks: vec![],
            proto_transport_enable: vec!["v4".into()],
        }
    }

    fn time_cb(t: &mut f64) -> f64 {
        *t
    }

    fn noop_tx(_iface: &InterfaceName, _proto: Proto, _dst: &str, _msg: &str, _p: &mut f64) {}

    fn noop_install(_table: &RoutingTable, _p: &mut f64) {}

    #[test]
    fn start_requires_config_and_callbacks() {
        let mut dmpr: Dmpr<f64> = Dmpr::with_rng(StdRng::seed_from_u64(1));
        assert!(dmpr.start().is_err());
        dmpr.register_configuration(config()).unwrap();
        assert!(dmpr.start().is_err());
        dmpr.register_get_time_cb(time_cb, 0.0);
        dmpr.register_msg_tx_cb(noop_tx, 0.0);
        dmpr.register_routing_table_update_cb(noop_install, 0.0);
        assert!(dmpr.start().is_ok());
    }

    #[test]
    fn single_neighbor_advertisement_populates_routing_table() {
        let mut dmpr: Dmpr<f64> = Dmpr::with_rng(StdRng::seed_from_u64(1));
        dmpr.register_configuration(config()).unwrap();
        dmpr.register_get_time_cb(time_cb, 0.0);
        dmpr.register_msg_tx_cb(noop_tx, 0.0);
        dmpr.register_routing_table_update_cb(noop_install, 0.0);
        dmpr.start().unwrap();

        let msg = Advertisement {
            id: "b".into(),
            sequence_no: 1,
            originator_addr_v4: "10.0.0.2".into(),
            originator_addr_v6: None,
            networks: vec![crate::advertisement::WireNetwork {
                v4_prefix: "192.168.2.0/24".into(),
            }],
            routingpaths: RoutingPaths::default(),
        };
        dmpr.msg_rx(&"w0".into(), msg);

        let table = dmpr.routing_table();
        assert_eq!(table["highest-bandwidth"].len(), 1);
        assert!(table["no-cost"].is_empty());
    }

    #[test]
    fn self_originated_advertisement_is_dropped() {
        let mut dmpr: Dmpr<f64> = Dmpr::with_rng(StdRng::seed_from_u64(1));
        dmpr.register_configuration(config()).unwrap();
        dmpr.register_get_time_cb(time_cb, 0.0);
        dmpr.register_msg_tx_cb(noop_tx, 0.0);
        dmpr.register_routing_table_update_cb(noop_install, 0.0);
        dmpr.start().unwrap();

        let msg = Advertisement {
            id: "a".into(),
            sequence_no: 1,
            originator_addr_v4: "10.0.0.2".into(),
            originator_addr_v6: None,
            networks: vec![],
            routingpaths: RoutingPaths::default(),
        };
        dmpr.msg_rx(&"w0".into(), msg);
        assert!(dmpr.neighbor_db().get(&"w0".into(), &"a".into()).is_none());
    }
}
