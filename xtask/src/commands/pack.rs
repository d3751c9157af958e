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

use super::{find_source_files, load_config, SourceFile};
use crate::helpers::*;
use anyhow::{Context, Result};
use jig_core::vfs::{PackEntry, PackIndex};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn run(manifest: &Path, out_dir: &Path) -> Result<()> {
    print_task_start("Packing Assets", PACKAGE, MAGENTA);

    let config = load_config(manifest)?;
    let files = find_source_files(&config.search_paths)?;
    if files.is_empty() {
        print_success("No asset files found to pack.");
        return Ok(());
    }
    print_info(&format!("Found {} asset files to pack.", files.len()));

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;
    let data_path = out_dir.join("data.pack");
    let index_path = out_dir.join("index.bin");

    let entries = write_data(&files, &data_path)?;
    let index = PackIndex::encode(&entries).context("Failed to encode the pack index")?;
    fs::write(&index_path, &index)
        .with_context(|| format!("Failed to write index file to '{}'", index_path.display()))?;

    let total: u64 = entries.iter().map(|e| e.size).sum();
    print_success(&format!(
        "Wrote {} entries to '{}' ({:.2} KB)",
        entries.len(),
        index_path.display(),
        index.len() as f64 / 1024.0
    ));
    print_success(&format!(
        "Wrote asset data to '{}' ({:.2} MB)",
        data_path.display(),
        total as f64 / (1024.0 * 1024.0)
    ));
    Ok(())
}

/// Concatenates every file into `data_path` and returns where each one landed.
fn write_data(files: &[SourceFile], data_path: &Path) -> Result<Vec<PackEntry>> {
    let file = File::create(data_path)
        .with_context(|| format!("Failed to create data pack at '{}'", data_path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut entries = Vec::with_capacity(files.len());
    let mut offset = 0;
    for source in files {
        let bytes = fs::read(&source.path)
            .with_context(|| format!("Failed to read asset file '{}'", source.path.display()))?;
        writer.write_all(&bytes)?;

        let size = bytes.len() as u64;
        entries.push(PackEntry {
            name: source.key.clone(),
            offset,
            size,
        });
        offset += size;
    }
    writer.flush()?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn packed_entries_point_at_their_bytes() -> Result<()> {
        let root = tempdir()?;
        fs::create_dir_all(root.path().join("sfx"))?;
        fs::write(root.path().join("a.txt"), b"first")?;
        fs::write(root.path().join("sfx/b.txt"), b"second!")?;

        let out = tempdir()?;
        let data_path = out.path().join("data.pack");
        let files = find_source_files(&[root.path().to_path_buf()])?;
        let entries = write_data(&files, &data_path)?;

        let index = PackIndex::new(&PackIndex::encode(&entries)?)?;
        let data = fs::read(&data_path)?;
        let entry = index.get("sfx/b.txt").expect("entry should be indexed");
        let start = entry.offset as usize;
        assert_eq!(&data[start..start + entry.size as usize], b"second!");
        assert_eq!(data.len(), 12);
        Ok(())
    }
}
