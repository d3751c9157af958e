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

//! Startup configuration for asset resolution, read from `Assets.toml`.

use crate::error::{AssetError, AssetResult};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Represents the structure of the `Assets.toml` manifest file.
///
/// ```toml
/// search_paths = ["resources/assets", "mods"]
/// warn_on_implicit_load = false
///
/// [[pack_files]]
/// data = ".dist/assets/data.pack"
/// index = ".dist/assets/index.bin"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Base directories tried in order when resolving a name.
    pub search_paths: Vec<PathBuf>,
    /// Packed archives tried after every search path.
    pub pack_files: Vec<PackFileConfig>,
    /// Whether a get-or-load miss is logged as a warning (otherwise debug).
    pub warn_on_implicit_load: bool,
}

/// Location of one `data.pack` / `index.bin` pair.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PackFileConfig {
    /// The concatenated asset bytes.
    pub data: PathBuf,
    /// The bincode-encoded entry index.
    pub index: PathBuf,
}

impl Default for AssetConfig {
    /// The default configuration points to a single source directory:
    /// `resources/assets`.
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("resources/assets")],
            pack_files: Vec::new(),
            warn_on_implicit_load: true,
        }
    }
}

impl AssetConfig {
    /// Parses a configuration from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> AssetResult<Self> {
        toml::from_str(text).map_err(|e| AssetError::Config(e.to_string()))
    }

    /// Reads and parses the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
            location: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Like [`AssetConfig::load`], but returns the defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading asset configuration from '{}'", path.display());
            Self::load(path)
        } else {
            log::info!(
                "No '{}' found, using the default asset configuration",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Rejects configurations that could never resolve anything.
    pub fn validate(&self) -> AssetResult<()> {
        if self.search_paths.is_empty() && self.pack_files.is_empty() {
            return Err(AssetError::Config(
                "at least one search path or pack file is required".to_string(),
            ));
        }
        Ok(())
    }
}
