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

//! Module containing all error types

use crate::types::InterfaceName;
use thiserror::Error;

/// Configuration is malformed. Raised synchronously from
/// [`Dmpr::register_configuration`](crate::core::Dmpr::register_configuration); the daemon is
/// left unregistered.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// `id` is missing or empty.
    #[error("configuration is missing a node id")]
    MissingId,
    /// No interfaces were configured.
    #[error("configuration must list at least one interface")]
    NoInterfaces,
    /// An interface entry is missing its name or IPv4 address.
    #[error("interface {0} is missing a required field")]
    IncompleteInterface(String),
    /// The IPv4 or IPv6 multicast transmit address is missing.
    #[error("configuration is missing the {0} multicast transmit address")]
    MissingMcastAddr(&'static str),
    /// A configured network entry is missing `proto`, `prefix` or `prefix-len`.
    #[error("network entry {0} is incomplete")]
    IncompleteNetwork(usize),
}

/// Programmer-visible invariant violation. These never arise from malformed wire input; wire
/// input that is merely stale, duplicate or unrecognised is logged and dropped instead (see
/// [`crate::core::Dmpr::msg_rx`]).
#[derive(Error, Debug, PartialEq)]
pub enum InternalError {
    /// [`next_hop_ip_addr`](crate::core::Dmpr::next_hop_ip_addr) was called with an interface
    /// that is not part of the registered configuration.
    #[error("unknown interface: {0}")]
    UnknownInterface(InterfaceName),
    /// `start()` was called before all three callbacks and a configuration were registered.
    #[error("cannot start: {0} is not registered")]
    NotReady(&'static str),
}

/// Top-level error type returned by the crate's public operations.
#[derive(Error, Debug, PartialEq)]
pub enum DmprError {
    /// Error propagated from configuration validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Error propagated from an invariant check.
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}
