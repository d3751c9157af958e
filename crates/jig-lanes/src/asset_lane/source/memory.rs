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

use jig_core::{asset::AssetKey, error::AssetResult, vfs::ResourceSource};
use std::collections::HashMap;

/// Serves assets from an in-memory table, e.g. bytes embedded with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the bytes served for `name`.
    pub fn with_entry(mut self, name: impl AsRef<str>, bytes: impl Into<Vec<u8>>) -> AssetResult<Self> {
        self.insert(name, bytes)?;
        Ok(self)
    }

    /// Adds (or replaces) the bytes served for `name`.
    pub fn insert(&mut self, name: impl AsRef<str>, bytes: impl Into<Vec<u8>>) -> AssetResult<()> {
        let key = AssetKey::new(name)?;
        self.entries.insert(key.as_str().to_string(), bytes.into());
        Ok(())
    }
}

impl ResourceSource for MemorySource {
    fn read(&self, key: &AssetKey) -> AssetResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key.as_str()).cloned())
    }

    fn describe(&self, key: &AssetKey) -> String {
        format!("memory://{key}")
    }
}
