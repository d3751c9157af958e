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

use jig_core::{
    asset::AssetKey,
    error::{AssetError, AssetResult},
    vfs::ResourceSource,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Resolves names as paths relative to a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    base_path: PathBuf,
}

impl DirectorySource {
    /// Creates a new `DirectorySource` with a specified base path.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// The directory names are resolved against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &AssetKey) -> PathBuf {
        self.base_path.join(key.as_str())
    }
}

impl ResourceSource for DirectorySource {
    fn read(&self, key: &AssetKey) -> AssetResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        let io_error = |source| AssetError::Io {
            location: path.display().to_string(),
            source,
        };

        // Only a missing entry is a miss; anything else the filesystem reports is a hard error.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => return Ok(None),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    fn describe(&self, key: &AssetKey) -> String {
        self.path_for(key).display().to_string()
    }
}
