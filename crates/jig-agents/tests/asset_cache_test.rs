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

use anyhow::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use jig_agents::{AssetCache, DecoderRegistry};
use jig_core::{
    asset::{Asset, AssetHandle},
    config::{AssetConfig, PackFileConfig},
    error::AssetError,
    vfs::{PackEntry, PackIndex, ResourceResolver},
};
use jig_data::assets::{ImageData, SoundData};
use jig_lanes::asset_lane::{AssetLoaderLane, DirectorySource, ImageLoaderLane, WavLoaderLane};
use std::{
    error::Error,
    fs,
    io::Cursor,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
};
use tempfile::tempdir;

// --- Test Setup: real files and a decoder that counts its calls ---

struct CountingLane<L> {
    inner: L,
    calls: Arc<AtomicUsize>,
}

impl<A: Asset, L: AssetLoaderLane<A>> AssetLoaderLane<A> for CountingLane<L> {
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load(bytes)
    }

    fn strategy_name(&self) -> &'static str {
        "Counting"
    }
}

fn write_png(path: &Path, width: u32, height: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn wav_bytes(frames: usize) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for i in 0..frames {
            writer.write_sample((i as i16).wrapping_mul(64))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// A cache over `roots` whose image and sound decoders share the returned counters.
fn counting_cache(roots: &[&Path]) -> (AssetCache, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let mut resolver = ResourceResolver::new();
    for root in roots {
        resolver.push(DirectorySource::new(root));
    }

    let image_calls = Arc::new(AtomicUsize::new(0));
    let sound_calls = Arc::new(AtomicUsize::new(0));

    let mut images = DecoderRegistry::new();
    images.set_fallback(CountingLane {
        inner: ImageLoaderLane::new(),
        calls: image_calls.clone(),
    });
    let mut sounds = DecoderRegistry::new();
    sounds.set_fallback(CountingLane {
        inner: WavLoaderLane::new(),
        calls: sound_calls.clone(),
    });

    let cache = AssetCache::new(resolver)
        .with_image_decoders(images)
        .with_sound_decoders(sounds);
    (cache, image_calls, sound_calls)
}

// ---

#[test]
fn load_get_clear_get_decodes_twice() -> Result<()> {
    jig_telemetry::logging::init_for_tests();

    // --- 1. Setup: a real PNG on disk ---
    let dir = tempdir()?;
    write_png(&dir.path().join("bg.png"), 8, 4)?;
    let (cache, image_calls, _) = counting_cache(&[dir.path()]);

    // --- 2. Load, then get from the cache ---
    cache.load_image("bg.png")?;
    let bg = cache.get_image("bg.png")?;
    assert_eq!((bg.width, bg.height), (8, 4));
    assert_eq!(bg.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(image_calls.load(Ordering::SeqCst), 1);

    // --- 3. Clear and ask again: a second resolve + decode ---
    cache.clear_image_cache();
    assert_eq!(cache.image_count(), 0);
    let again = cache.get_image("bg.png")?;
    assert_eq!(image_calls.load(Ordering::SeqCst), 2);

    // The handle taken before the clear is still usable and distinct.
    assert!(!AssetHandle::ptr_eq(&bg, &again));
    assert_eq!(bg.width, 8);
    Ok(())
}

#[test]
fn repeated_gets_never_redecode() -> Result<()> {
    let dir = tempdir()?;
    write_png(&dir.path().join("ui/button.png"), 2, 2)?;
    let (cache, image_calls, _) = counting_cache(&[dir.path()]);

    let first = cache.get_image("ui/button.png")?;
    for _ in 0..10 {
        let next = cache.get_image("ui/button.png")?;
        assert!(AssetHandle::ptr_eq(&first, &next));
    }

    assert_eq!(image_calls.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.decodes), (10, 1, 1));
    Ok(())
}

#[test]
fn image_and_sound_caches_are_independent() -> Result<()> {
    let dir = tempdir()?;
    write_png(&dir.path().join("hero.png"), 4, 4)?;
    fs::write(dir.path().join("jump.wav"), wav_bytes(100)?)?;
    let (cache, _, sound_calls) = counting_cache(&[dir.path()]);

    cache.get_image("hero.png")?;
    let jump = cache.get_sound("jump.wav")?;
    assert_eq!(jump.frame_count(), 100);
    assert_eq!(jump.sample_rate, 22050);

    // Clearing images leaves sounds alone...
    cache.clear_image_cache();
    assert_eq!(cache.image_count(), 0);
    assert_eq!(cache.sound_count(), 1);
    cache.get_sound("jump.wav")?;
    assert_eq!(sound_calls.load(Ordering::SeqCst), 1);

    // ...and the other way round.
    cache.get_image("hero.png")?;
    cache.clear_sound_cache();
    assert_eq!(cache.sound_count(), 0);
    assert_eq!(cache.image_count(), 1);

    // Same name, separate namespaces: a WAV is not an image.
    let err = cache.load_image("jump.wav").unwrap_err();
    assert!(err.is_decode());
    assert!(cache.cached_image("jump.wav").is_none());
    Ok(())
}

#[test]
fn missing_asset_reports_not_found_and_leaves_cache_alone() -> Result<()> {
    let first = tempdir()?;
    let second = tempdir()?;
    write_png(&first.path().join("bg.png"), 1, 1)?;
    let (cache, image_calls, _) = counting_cache(&[first.path(), second.path()]);

    let bg = cache.get_image("bg.png")?;

    match cache.get_image("nope.png") {
        Err(AssetError::NotFound { name, tried }) => {
            assert_eq!(name, "nope.png");
            assert_eq!(tried.len(), 2);
            assert!(tried[0].starts_with(&first.path().display().to_string()));
            assert!(tried[1].starts_with(&second.path().display().to_string()));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    // A failed explicit reload keeps the previous entry.
    fs::remove_file(first.path().join("bg.png"))?;
    assert!(cache.load_image("bg.png").unwrap_err().is_not_found());
    let still = cache.cached_image("bg.png").expect("entry must survive");
    assert!(AssetHandle::ptr_eq(&bg, &still));

    assert!(cache.cached_image("nope.png").is_none());
    assert_eq!(image_calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().failures, 2);
    Ok(())
}

#[test]
fn search_paths_are_tried_in_order() -> Result<()> {
    let base = tempdir()?;
    let mods = tempdir()?;
    write_png(&base.path().join("bg.png"), 1, 1)?;
    write_png(&mods.path().join("bg.png"), 2, 2)?;
    write_png(&mods.path().join("extra.png"), 3, 3)?;

    let (cache, _, _) = counting_cache(&[base.path(), mods.path()]);

    assert_eq!(cache.get_image("bg.png")?.width, 1);
    assert_eq!(cache.get_image("extra.png")?.width, 3);

    let (modded_first, _, _) = counting_cache(&[mods.path(), base.path()]);
    assert_eq!(modded_first.get_image("bg.png")?.width, 2);
    Ok(())
}

#[test]
fn concurrent_first_access_decodes_once() -> Result<()> {
    const THREADS: usize = 8;

    let dir = tempdir()?;
    write_png(&dir.path().join("shared.png"), 16, 16)?;
    let (cache, image_calls, _) = counting_cache(&[dir.path()]);
    let barrier = Barrier::new(THREADS);

    let handles: Vec<AssetHandle<ImageData>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    cache.get_image("shared.png")
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked"))
            .collect::<Result<_, _>>()
    })?;

    assert_eq!(image_calls.load(Ordering::SeqCst), 1);
    assert!(handles.iter().all(|h| AssetHandle::ptr_eq(h, &handles[0])));
    let stats = cache.stats();
    assert_eq!((stats.misses, stats.hits), (1, THREADS as u64 - 1));
    Ok(())
}

#[test]
fn sprite_sheet_over_cached_image() -> Result<()> {
    let dir = tempdir()?;
    write_png(&dir.path().join("sheet.png"), 100, 50)?;
    let (cache, image_calls, _) = counting_cache(&[dir.path()]);

    let a = cache.get_sprite_sheet("sheet.png", 32, 16)?;
    let b = cache.get_sprite_sheet("sheet.png", 10, 10)?;

    // ceil(100 / 32) x ceil(50 / 16)
    assert_eq!((a.columns(), a.rows()), (4, 4));
    assert_eq!((b.columns(), b.rows()), (10, 5));
    assert!(AssetHandle::ptr_eq(a.image(), b.image()));
    assert_eq!(image_calls.load(Ordering::SeqCst), 1);

    // The sheet outlives a clear of the cache it came from.
    cache.clear_image_cache();
    assert_eq!(a.sprite(3, 3).map(|s| (s.width, s.height)), Some((4, 2)));
    Ok(())
}

#[test]
fn cache_built_from_config_reads_packs() -> Result<()> {
    let dir = tempdir()?;
    let assets_dir = dir.path().join("assets");
    write_png(&assets_dir.join("bg.png"), 2, 2)?;

    // --- A pack holding one sound, listed after the search path ---
    let sound = wav_bytes(32)?;
    let entries = vec![PackEntry {
        name: "sfx/coin.wav".to_string(),
        offset: 0,
        size: sound.len() as u64,
    }];
    let data_path = dir.path().join("data.pack");
    let index_path = dir.path().join("index.bin");
    fs::write(&data_path, &sound)?;
    fs::write(&index_path, PackIndex::encode(&entries)?)?;

    let manifest = dir.path().join("Assets.toml");
    fs::write(
        &manifest,
        format!(
            "search_paths = ['{}']\nwarn_on_implicit_load = false\n\n[[pack_files]]\ndata = '{}'\nindex = '{}'\n",
            assets_dir.display(),
            data_path.display(),
            index_path.display()
        ),
    )?;

    let config = AssetConfig::load(&manifest)?;
    assert_eq!(
        config.pack_files,
        vec![PackFileConfig {
            data: data_path.clone(),
            index: index_path.clone(),
        }]
    );

    let cache = AssetCache::from_config(&config)?;
    assert_eq!(cache.resolver().len(), 2);

    let coin: AssetHandle<SoundData> = cache.get_sound("sfx/coin.wav")?;
    assert_eq!(coin.frame_count(), 32);
    assert_eq!(cache.get_image("bg.png")?.width, 2);
    Ok(())
}

#[test]
fn bogus_pack_entry_is_an_error_not_a_crash() -> Result<()> {
    let dir = tempdir()?;
    let data_path = dir.path().join("data.pack");
    let index_path = dir.path().join("index.bin");
    fs::write(&data_path, b"\x89PNG")?;
    let entries = vec![PackEntry {
        name: "bg.png".to_string(),
        offset: 0,
        size: u64::MAX,
    }];
    fs::write(&index_path, PackIndex::encode(&entries)?)?;

    let config = AssetConfig {
        search_paths: Vec::new(),
        pack_files: vec![PackFileConfig {
            data: data_path,
            index: index_path,
        }],
        warn_on_implicit_load: false,
    };
    let cache = AssetCache::from_config(&config)?;

    assert!(matches!(
        cache.get_image("bg.png"),
        Err(AssetError::Io { .. })
    ));
    assert_eq!(cache.image_count(), 0);
    assert_eq!(cache.stats().failures, 1);
    Ok(())
}

#[test]
fn config_without_sources_is_rejected() {
    let config = AssetConfig {
        search_paths: Vec::new(),
        pack_files: Vec::new(),
        warn_on_implicit_load: true,
    };
    assert!(matches!(
        AssetCache::from_config(&config),
        Err(AssetError::Config(_))
    ));
}
