// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Virtual file system: where asset bytes come from.
//!
//! The [`ResourceResolver`] walks an ordered list of [`ResourceSource`]s and
//! returns the first one that has the requested name. [`PackIndex`] is the
//! runtime form of a packed archive's `index.bin`, used by pack-backed sources.

mod resolver;

pub use resolver::*;

use bincode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The location of one asset inside a `data.pack` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackEntry {
    /// The asset name, relative to its source root, with `/` separators.
    pub name: String,
    /// Byte offset of the asset inside the data file.
    pub offset: u64,
    /// Length of the asset in bytes.
    pub size: u64,
}

/// The runtime representation of a pack index (`index.bin`).
///
/// Provides O(1) lookups from asset name to its byte range in the data file.
#[derive(Debug, Default)]
pub struct PackIndex {
    entries: HashMap<String, PackEntry>,
}

impl PackIndex {
    /// Builds the index by decoding the raw bytes of an `index.bin` file.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the byte slice is not a valid, bincode-encoded
    /// list of [`PackEntry`].
    pub fn new(index_bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let config = bincode::config::standard();
        let (entries, _): (Vec<PackEntry>, _) =
            bincode::serde::decode_from_slice(index_bytes, config)?;
        Ok(Self::from_entries(entries))
    }

    /// Builds the index from already-decoded entries. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = PackEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { entries }
    }

    /// Encodes a list of entries into the `index.bin` format.
    pub fn encode(entries: &[PackEntry]) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(entries, bincode::config::standard())
    }

    /// Retrieves the entry for a given asset name.
    pub fn get(&self, name: &str) -> Option<&PackEntry> {
        self.entries.get(name)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
