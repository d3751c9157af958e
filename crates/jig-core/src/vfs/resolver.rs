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

use crate::{
    asset::AssetKey,
    error::{AssetError, AssetResult},
};

/// Something that may be able to provide the raw bytes of a named asset:
/// a directory, a packed archive, an in-memory table.
pub trait ResourceSource: Send + Sync {
    /// Reads the bytes for `key`.
    ///
    /// Returns `Ok(None)` when this source simply does not have the asset, so
    /// the resolver can move on to the next one. Any other failure is an error.
    fn read(&self, key: &AssetKey) -> AssetResult<Option<Vec<u8>>>;

    /// A human-readable description of where `key` was looked for.
    fn describe(&self, key: &AssetKey) -> String;
}

/// The bytes of a resolved asset and where they came from.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The raw, still-encoded asset bytes.
    pub bytes: Vec<u8>,
    /// The location that provided them, as reported by its source.
    pub location: String,
}

/// An ordered search over several [`ResourceSource`]s.
///
/// Sources are tried in the order they were added and the first hit wins.
/// Resolution depends only on this list, never on who is asking.
#[derive(Default)]
pub struct ResourceResolver {
    sources: Vec<Box<dyn ResourceSource>>,
}

impl ResourceResolver {
    /// Creates a resolver with no sources. Everything resolves to `NotFound`.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Appends a source to the end of the search order.
    pub fn with_source(mut self, source: impl ResourceSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Appends a source to the end of the search order.
    pub fn push(&mut self, source: impl ResourceSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Number of configured sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if no source has been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Finds the bytes for `key` in the first source that has them.
    ///
    /// # Errors
    /// - [`AssetError::NotFound`] listing every location tried if no source has the key.
    /// - Whatever a source returns for a hard failure, immediately.
    pub fn resolve(&self, key: &AssetKey) -> AssetResult<Resolved> {
        let mut tried = Vec::with_capacity(self.sources.len());

        for (position, source) in self.sources.iter().enumerate() {
            let location = source.describe(key);
            if let Some(bytes) = source.read(key)? {
                if position > 0 {
                    log::debug!(
                        "Resolved '{}' from fallback location '{}' after trying {:?}",
                        key,
                        location,
                        tried
                    );
                }
                return Ok(Resolved { bytes, location });
            }
            tried.push(location);
        }

        log::warn!(
            "Could not find asset '{}'. Check its name and the search paths (tried: {:?})",
            key,
            tried
        );
        Err(AssetError::NotFound {
            name: key.to_string(),
            tried,
        })
    }
}
