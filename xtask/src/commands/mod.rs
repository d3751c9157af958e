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

pub mod pack;
pub mod verify;

use crate::helpers::*;
use anyhow::{Context, Result};
use jig_core::{asset::AssetKey, config::AssetConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file found under a search path, with the key the cache would request it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub key: String,
}

/// Loads the manifest, falling back to the defaults when it does not exist.
pub fn load_config(manifest: &Path) -> Result<AssetConfig> {
    if manifest.exists() {
        print_info(&format!(
            "Found '{}'. Loading configuration.",
            manifest.display()
        ));
    } else {
        print_info(&format!(
            "No '{}' found. Using default configuration.",
            manifest.display()
        ));
    }
    AssetConfig::load_or_default(manifest)
        .with_context(|| format!("Failed to load manifest '{}'", manifest.display()))
}

/// Recursively lists the files under `search_paths`, in search order.
///
/// A key found under an earlier root shadows the same key under a later one,
/// the same way the resolver picks the first hit.
pub fn find_source_files(search_paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for root in search_paths {
        if !root.is_dir() {
            print_warning(&format!(
                "Search path '{}' is not a directory, skipping.",
                root.display()
            ));
            continue;
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk search path '{}'", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(key) = key_for(root, entry.path())? else {
                continue;
            };
            if seen.insert(key.clone()) {
                files.push(SourceFile {
                    path: entry.into_path(),
                    key,
                });
            }
        }
    }
    Ok(files)
}

/// The `/`-separated path of `file` relative to `root`, or `None` (with a
/// warning) if the cache could never request the file by that name.
fn key_for(root: &Path, file: &Path) -> Result<Option<String>> {
    let relative = file.strip_prefix(root).with_context(|| {
        format!(
            "'{}' is not under '{}'",
            file.display(),
            root.display()
        )
    })?;
    let mut parts = Vec::new();
    for component in relative.components() {
        let Some(part) = component.as_os_str().to_str() else {
            print_warning(&format!(
                "'{}' is not valid UTF-8, skipping.",
                file.display()
            ));
            return Ok(None);
        };
        parts.push(part);
    }
    let name = parts.join("/");

    match AssetKey::new(&name) {
        Ok(key) if key.as_str() == name => Ok(Some(name)),
        Ok(key) => {
            print_warning(&format!(
                "'{}' would be requested as '{}', skipping.",
                file.display(),
                key
            ));
            Ok(None)
        }
        Err(err) => {
            print_warning(&format!("'{}': {}, skipping.", file.display(), err));
            Ok(None)
        }
    }
}
