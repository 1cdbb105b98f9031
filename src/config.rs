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

//! # Configuration
//!
//! This module represents the daemon's static configuration. [`DmprConfig`] is deserialized by
//! the embedder from whatever source format it likes (JSON, TOML, ...) and handed to
//! [`Dmpr::register_configuration`](crate::core::Dmpr::register_configuration), which validates
//! it and fills in defaults for any interface missing `link-characteristics`.
//!
//! ```rust
//! use dmpr::config::{DmprConfig, InterfaceConfig};
//!
//! let cfg = DmprConfig {
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
//!         link_characteristics: None,
//!     }],
//!     networks: vec![],
//!     proto_transport_enable: vec!["v4".into()],
//! };
//! assert!(cfg.validate().is_ok());
//! ```

use crate::error::ConfigError;
use crate::types::{LinkCharacteristics, Proto};
use serde::{Deserialize, Serialize};

/// Default `rtn-msg-interval`, in seconds.
pub const DEFAULT_RTN_MSG_INTERVAL: u32 = 30;

/// One entry of the `interfaces` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Interface name, e.g. `"wlan0"`.
    pub name: String,
    /// IPv4 address of this interface.
    pub addr_v4: String,
    /// IPv6 address of this interface, if any.
    #[serde(default)]
    pub addr_v6: Option<String>,
    /// Measured link characteristics. Defaults to `{bandwidth: 5000, loss: 0, cost: 0}` with a
    /// logged warning when absent.
    #[serde(default)]
    pub link_characteristics: Option<LinkCharacteristics>,
}

/// One entry of the `networks` list: a prefix this node originates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Address family.
    pub proto: Proto,
    /// Network address.
    pub prefix: String,
    /// Prefix length.
    pub prefix_len: u8,
}

/// Top-level daemon configuration, as registered once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmprConfig {
    /// Stable node identifier.
    pub id: String,
    /// Base advertisement interval, in seconds. Defaults to 30.
    #[serde(default)]
    pub rtn_msg_interval: Option<u32>,
    /// Jitter added to the interval, in seconds. Defaults to `interval / 4`.
    #[serde(default)]
    pub rtn_msg_interval_jitter: Option<u32>,
    /// Hold time after which a silent neighbour is evicted. Defaults to `interval * 3`.
    #[serde(default)]
    pub rtn_msg_hold_time: Option<u32>,
    /// IPv4 multicast address advertisements are transmitted to.
    pub mcast_v4_tx_addr: String,
    /// IPv6 multicast address advertisements are transmitted to.
    pub mcast_v6_tx_addr: String,
    /// Local interfaces to advertise on and accept advertisements from.
    pub interfaces: Vec<InterfaceConfig>,
    /// Networks this node originates.
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
    /// Advisory list of enabled transport protocols (`"v4"`, `"v6"`).
    #[serde(default)]
    pub proto_transport_enable: Vec<String>,
}

impl DmprConfig {
    /// Effective advertisement interval, applying the default if unset.
    pub fn interval(&self) -> u32 {
        self.rtn_msg_interval.unwrap_or(DEFAULT_RTN_MSG_INTERVAL)
    }

    /// Effective jitter, applying the default (`interval / 4`) if unset.
    pub fn jitter(&self) -> u32 {
        self.rtn_msg_interval_jitter.unwrap_or_else(|| self.interval() / 4)
    }

    /// Effective hold time, applying the default (`interval * 3`) if unset.
    pub fn hold_time(&self) -> u32 {
        self.rtn_msg_hold_time.unwrap_or_else(|| self.interval() * 3)
    }

    /// Validate required fields and fill in per-interface `link-characteristics` defaults.
    ///
    /// Returns a normalized copy; `self` is not modified.
    pub fn validate(&self) -> Result<DmprConfig, ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.interfaces.is_empty() {
            return Err(ConfigError::NoInterfaces);
        }
        if self.mcast_v4_tx_addr.trim().is_empty() {
            return Err(ConfigError::MissingMcastAddr("v4"));
        }
        if self.mcast_v6_tx_addr.trim().is_empty() {
            return Err(ConfigError::MissingMcastAddr("v6"));
        }

        let mut interfaces = Vec::with_capacity(self.interfaces.len());
        for iface in &self.interfaces {
            if iface.name.trim().is_empty() || iface.addr_v4.trim().is_empty() {
                return Err(ConfigError::IncompleteInterface(
                    if iface.name.is_empty() { "<unnamed>".to_string() } else { iface.name.clone() },
                ));
            }
            let mut normalized = iface.clone();
            if normalized.link_characteristics.is_none() {
                log::warn!(
                    "interface {} has no configured link-characteristics, defaulting to {:?}",
                    normalized.name,
                    LinkCharacteristics::default()
                );
                normalized.link_characteristics = Some(LinkCharacteristics::default());
            }
            interfaces.push(normalized);
        }

        for (idx, net) in self.networks.iter().enumerate() {
            if net.prefix.trim().is_empty() {
                return Err(ConfigError::IncompleteNetwork(idx));
            }
        }

        Ok(DmprConfig { interfaces, ..self.clone() })
    }
}
