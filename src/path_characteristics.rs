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

//! Hash-consing table for link profiles.
//!
//! Every edge on every FIB path carries a `{loss, bandwidth, cost}` triple. Advertising the
//! full triple on every edge of every destination would repeat the same handful of link
//! profiles over and over, so instead each advertisement carries one interning table
//! (`path_characteristics`) and every edge just references a small integer id into it.

use crate::types::LinkCharacteristics;
use std::collections::HashMap;

/// Id of an interned [`LinkCharacteristics`] triple, local to one node's FIB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

impl PathId {
    /// Render as the decimal string used on the wire.
    pub fn to_wire(&self) -> String {
        self.0.to_string()
    }

    /// Parse the decimal string form used on the wire.
    pub fn from_wire(s: &str) -> Option<Self> {
        s.parse().ok().map(PathId)
    }
}

/// Hash-consed table of link profiles, assigning small integer ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct PathCharacteristics {
    by_id: HashMap<PathId, LinkCharacteristics>,
    next_id: u32,
}

impl PathCharacteristics {
    /// Build an empty table.
    pub fn new() -> Self {
        Self { by_id: HashMap::new(), next_id: 1 }
    }

    /// Intern `profile`, reusing an existing id if an equal profile is already present.
    pub fn intern(&mut self, profile: LinkCharacteristics) -> PathId {
        if let Some((id, _)) = self.by_id.iter().find(|(_, p)| **p == profile) {
            return id.clone();
        }
        let id = PathId(self.next_id);
        self.next_id += 1;
        self.by_id.insert(id.clone(), profile);
        id
    }

    /// Look up a previously interned profile.
    pub fn get(&self, id: &PathId) -> Option<&LinkCharacteristics> {
        self.by_id.get(id)
    }

    /// Iterate over all interned `(id, profile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PathId, &LinkCharacteristics)> {
        self.by_id.iter()
    }

    /// Number of interned profiles.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// `true` if no profile has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Serialize to the wire's `path_characteristics` map (decimal string keys).
    pub fn to_wire(&self) -> HashMap<String, LinkCharacteristics> {
        self.by_id.iter().map(|(id, p)| (id.to_wire(), *p)).collect()
    }
}
