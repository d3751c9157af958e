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

//! A generic, type-safe storage for loaded asset handles.

use jig_core::asset::{Asset, AssetHandle, AssetKey};
use std::collections::HashMap;

/// An in-memory cache for a specific type of asset `A`.
///
/// This structure maps an [`AssetKey`] to a shared `AssetHandle<A>`. Every
/// entry holds a successfully decoded asset; the storage itself never
/// decodes anything.
pub struct Assets<A: Asset> {
    storage: HashMap<AssetKey, AssetHandle<A>>,
}

impl<A: Asset> Default for Assets<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> Clone for Assets<A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<A: Asset> Assets<A> {
    /// Creates a new, empty asset storage.
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Inserts an asset handle, replacing and returning any previous one for the same key.
    pub fn insert(&mut self, key: AssetKey, handle: AssetHandle<A>) -> Option<AssetHandle<A>> {
        self.storage.insert(key, handle)
    }

    /// Retrieves the handle stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&AssetHandle<A>> {
        self.storage.get(name)
    }

    /// Checks if an asset with the specified name exists in the storage.
    pub fn contains(&self, name: &str) -> bool {
        self.storage.contains_key(name)
    }

    /// Removes and returns the handle stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<AssetHandle<A>> {
        self.storage.remove(name)
    }

    /// Drops every cached handle. Handles held elsewhere stay valid.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over the cached keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.storage.keys()
    }
}
