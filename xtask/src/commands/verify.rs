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

use super::{find_source_files, load_config};
use crate::helpers::*;
use anyhow::{Context, Result};
use jig_agents::AssetCache;
use jig_core::asset::AssetKey;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Image,
    Sound,
}

fn kind_of(name: &str) -> Option<AssetKind> {
    let extension = AssetKey::new(name).ok()?.extension()?;
    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tga" | "tif" | "tiff" | "webp" | "ico" => {
            Some(AssetKind::Image)
        }
        "wav" | "ogg" | "flac" | "mp3" | "aiff" | "aif" => Some(AssetKind::Sound),
        _ => None,
    }
}

pub fn run(manifest: &Path, names: &[String]) -> Result<()> {
    print_task_start("Verifying Assets", MAGNIFIER, CYAN);

    let config = load_config(manifest)?;
    let cache = AssetCache::from_config(&config)
        .context("Failed to build the asset cache")?
        .with_implicit_load_warnings(false);

    let names = if names.is_empty() {
        find_source_files(&config.search_paths)?
            .into_iter()
            .map(|file| file.key)
            .collect()
    } else {
        names.to_vec()
    };

    let mut checked = 0;
    let mut failed = 0;
    for name in &names {
        let outcome = match kind_of(name) {
            Some(AssetKind::Image) => cache
                .load_image(name)
                .map(|image| format!("{}x{} image", image.width, image.height)),
            Some(AssetKind::Sound) => cache.load_sound(name).map(|sound| {
                format!(
                    "{:.2}s sound, {} channel(s) at {} Hz",
                    sound.duration().as_secs_f64(),
                    sound.channels,
                    sound.sample_rate
                )
            }),
            None => {
                print_warning(&format!("{}: unknown asset type, skipped", name));
                continue;
            }
        };

        checked += 1;
        match outcome {
            Ok(summary) => print_success(&format!("{}: {}", name, summary)),
            Err(err) => {
                failed += 1;
                print_error(&format!("{}: {}", name, err));
            }
        }
    }

    let stats = cache.stats();
    print_info(&format!(
        "{} decodes, {} failures across {} images and {} sounds",
        stats.decodes,
        stats.failures,
        cache.image_count(),
        cache.sound_count()
    ));

    if failed > 0 {
        anyhow::bail!("{} of {} assets failed to load", failed, checked);
    }
    print_success(&format!("All {} assets loaded.", checked));
    Ok(())
}
