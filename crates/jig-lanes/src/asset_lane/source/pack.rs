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
    vfs::{PackEntry, PackIndex, ResourceSource},
};
use std::{
    fs::{self, File},
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

/// Serves assets out of a `data.pack` file described by an `index.bin`.
///
/// Seeking and reading share one file handle, so reads are serialised behind
/// a mutex.
#[derive(Debug)]
pub struct PackSource {
    data_path: PathBuf,
    pack_file: Mutex<File>,
    index: PackIndex,
}

impl PackSource {
    /// Opens a pack from its data and index files.
    ///
    /// # Errors
    /// [`AssetError::Io`] if either file cannot be read, [`AssetError::Config`]
    /// if the index cannot be decoded.
    pub fn open(data_path: impl AsRef<Path>, index_path: impl AsRef<Path>) -> AssetResult<Self> {
        let data_path = data_path.as_ref();
        let index_path = index_path.as_ref();

        let index_bytes = fs::read(index_path).map_err(|source| AssetError::Io {
            location: index_path.display().to_string(),
            source,
        })?;
        let index = PackIndex::new(&index_bytes).map_err(|e| {
            AssetError::Config(format!(
                "pack index '{}' is corrupt: {}",
                index_path.display(),
                e
            ))
        })?;
        let pack_file = File::open(data_path).map_err(|source| AssetError::Io {
            location: data_path.display().to_string(),
            source,
        })?;

        log::debug!(
            "Opened pack '{}' with {} entries",
            data_path.display(),
            index.len()
        );
        Ok(Self::new(data_path, pack_file, index))
    }

    /// Wraps an already opened data file and decoded index.
    pub fn new(data_path: impl AsRef<Path>, pack_file: File, index: PackIndex) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            pack_file: Mutex::new(pack_file),
            index,
        }
    }

    /// Number of assets in the pack.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the pack holds no assets.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // `entry.size` comes from the index and may be bogus; allocate only what is read.
    fn read_entry(&self, entry: &PackEntry) -> io::Result<Vec<u8>> {
        let mut file = self.pack_file.lock().unwrap_or_else(PoisonError::into_inner);
        file.seek(SeekFrom::Start(entry.offset))?;

        let mut buffer = Vec::new();
        (&mut *file).take(entry.size).read_to_end(&mut buffer)?;
        if (buffer.len() as u64) < entry.size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "entry '{}' claims {} bytes at offset {} but only {} are stored",
                    entry.name,
                    entry.size,
                    entry.offset,
                    buffer.len()
                ),
            ));
        }
        Ok(buffer)
    }
}

impl ResourceSource for PackSource {
    fn read(&self, key: &AssetKey) -> AssetResult<Option<Vec<u8>>> {
        let Some(entry) = self.index.get(key.as_str()) else {
            return Ok(None);
        };
        self.read_entry(entry)
            .map(Some)
            .map_err(|source| AssetError::Io {
                location: self.describe(key),
                source,
            })
    }

    fn describe(&self, key: &AssetKey) -> String {
        format!("{}#{}", self.data_path.display(), key)
    }
}
