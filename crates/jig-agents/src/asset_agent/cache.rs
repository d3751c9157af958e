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

//! The asset cache: get-or-load access to images and sounds by name.

use super::DecoderRegistry;
use jig_core::{
    asset::{Asset, AssetHandle, AssetKey},
    config::AssetConfig,
    error::{AssetError, AssetResult},
    vfs::ResourceResolver,
};
use jig_data::assets::{Assets, ImageData, SoundData, SpriteSheet};
use jig_lanes::asset_lane::{AssetLoaderLane, DirectorySource, PackSource};
use jig_telemetry::{CounterHandle, MetricsRegistry};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A snapshot of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Get-or-load requests answered from the cache.
    pub hits: u64,
    /// Get-or-load requests that had to load.
    pub misses: u64,
    /// Successful decodes, explicit loads included.
    pub decodes: u64,
    /// Loads that failed to resolve or decode.
    pub failures: u64,
}

/// A collection of metric handles used by the cache.
struct CacheMetrics {
    hits: CounterHandle,
    misses: CounterHandle,
    decodes: CounterHandle,
    failures: CounterHandle,
}

impl CacheMetrics {
    fn new(registry: &MetricsRegistry) -> Self {
        Self {
            hits: registry.register_counter(
                "assets",
                "cache_hits",
                "Requests served from the asset cache",
            ),
            misses: registry.register_counter(
                "assets",
                "cache_misses",
                "Requests that loaded an asset on demand",
            ),
            decodes: registry.register_counter("assets", "decodes", "Assets decoded"),
            failures: registry.register_counter(
                "assets",
                "load_failures",
                "Loads that could not resolve or decode an asset",
            ),
        }
    }
}

/// One asset class: its decoders and its own locked storage.
struct AssetClass<A: Asset> {
    label: &'static str,
    decoders: DecoderRegistry<A>,
    storage: Mutex<Assets<A>>,
}

impl<A: Asset> AssetClass<A> {
    fn new(label: &'static str, decoders: DecoderRegistry<A>) -> Self {
        Self {
            label,
            decoders,
            storage: Mutex::new(Assets::new()),
        }
    }

    // Insertion is always the last step of a load, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, Assets<A>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Loads images and sounds by name and keeps the decoded results.
///
/// Names are resolved through an ordered [`ResourceResolver`], decoded by
/// extension through a [`DecoderRegistry`], and cached per asset class.
/// Images and sounds live in independent maps: the same name can exist in
/// both, and clearing one never touches the other.
///
/// The cache is `Send + Sync`. Each class is guarded by its own mutex, held
/// for the whole lookup-or-load step, so concurrent first requests for a
/// name decode it exactly once.
///
/// ```no_run
/// use jig_agents::AssetCache;
/// use jig_core::config::AssetConfig;
///
/// let cache = AssetCache::from_config(&AssetConfig::default())?;
/// cache.load_image("bg.png")?;
/// let hero = cache.get_sprite_sheet("sprites/hero.png", 32, 32)?;
/// println!("{} frames", hero.tile_count());
/// # Ok::<(), jig_core::AssetError>(())
/// ```
pub struct AssetCache {
    resolver: ResourceResolver,
    images: AssetClass<ImageData>,
    sounds: AssetClass<SoundData>,
    warn_on_implicit_load: bool,
    metrics_registry: Arc<MetricsRegistry>,
    metrics: CacheMetrics,
}

impl AssetCache {
    /// Creates an empty cache over `resolver` with the default decoders.
    pub fn new(resolver: ResourceResolver) -> Self {
        let metrics_registry = Arc::new(MetricsRegistry::new());
        let metrics = CacheMetrics::new(&metrics_registry);
        Self {
            resolver,
            images: AssetClass::new("image", DecoderRegistry::images()),
            sounds: AssetClass::new("sound", DecoderRegistry::sounds()),
            warn_on_implicit_load: true,
            metrics_registry,
            metrics,
        }
    }

    /// Builds a cache whose resolver searches the configured directories,
    /// then the configured packs, in order.
    ///
    /// # Errors
    /// [`AssetError::Config`] if the configuration has no source at all, or
    /// any error raised while opening a pack.
    pub fn from_config(config: &AssetConfig) -> AssetResult<Self> {
        config.validate()?;

        let mut resolver = ResourceResolver::new();
        for dir in &config.search_paths {
            if !dir.is_dir() {
                log::warn!("Asset search path '{}' does not exist", dir.display());
            }
            resolver.push(DirectorySource::new(dir));
        }
        for pack in &config.pack_files {
            resolver.push(PackSource::open(&pack.data, &pack.index)?);
        }

        log::info!(
            "Asset cache configured with {} search path(s) and {} pack(s)",
            config.search_paths.len(),
            config.pack_files.len()
        );
        Ok(Self::new(resolver).with_implicit_load_warnings(config.warn_on_implicit_load))
    }

    /// Replaces the image decoders.
    pub fn with_image_decoders(mut self, decoders: DecoderRegistry<ImageData>) -> Self {
        self.images.decoders = decoders;
        self
    }

    /// Replaces the sound decoders.
    pub fn with_sound_decoders(mut self, decoders: DecoderRegistry<SoundData>) -> Self {
        self.sounds.decoders = decoders;
        self
    }

    /// Adds or overrides the image decoder for one extension.
    pub fn with_image_loader(
        mut self,
        extension: &str,
        lane: impl AssetLoaderLane<ImageData> + 'static,
    ) -> Self {
        self.images.decoders.register(extension, lane);
        self
    }

    /// Adds or overrides the sound decoder for one extension.
    pub fn with_sound_loader(
        mut self,
        extension: &str,
        lane: impl AssetLoaderLane<SoundData> + 'static,
    ) -> Self {
        self.sounds.decoders.register(extension, lane);
        self
    }

    /// Reports counters into `registry` instead of a private one.
    pub fn with_metrics(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.metrics = CacheMetrics::new(&registry);
        self.metrics_registry = registry;
        self
    }

    /// Whether get-or-load misses are logged as warnings (the default) or at debug level.
    pub fn with_implicit_load_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_implicit_load = enabled;
        self
    }

    /// The resolver names are looked up with.
    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// The registry the cache counters live in.
    pub fn metrics_registry(&self) -> &Arc<MetricsRegistry> {
        &self.metrics_registry
    }

    /// Resolves and decodes `name`, replacing any cached image of that name.
    ///
    /// On failure the cache is left exactly as it was.
    pub fn load_image(&self, name: &str) -> AssetResult<AssetHandle<ImageData>> {
        self.load(&self.images, name)
    }

    /// Returns the cached image for `name`, loading it first if needed.
    pub fn get_image(&self, name: &str) -> AssetResult<AssetHandle<ImageData>> {
        self.get_or_load(&self.images, name)
    }

    /// Returns the cached image for `name` without ever loading it.
    pub fn cached_image(&self, name: &str) -> Option<AssetHandle<ImageData>> {
        self.cached(&self.images, name)
    }

    /// Gets (or loads) the image `name` and views it as a grid of
    /// `tile_width`×`tile_height` tiles.
    ///
    /// The sheet is built fresh on every call; only the image is cached.
    ///
    /// # Errors
    /// [`AssetError::InvalidArgument`] for a zero tile dimension, checked
    /// before the cache is touched, or any error from [`AssetCache::get_image`].
    pub fn get_sprite_sheet(
        &self,
        name: &str,
        tile_width: u32,
        tile_height: u32,
    ) -> AssetResult<SpriteSheet> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AssetError::InvalidArgument(format!(
                "sprite sheet '{name}' needs tiles of at least 1x1 (got {tile_width}x{tile_height})"
            )));
        }
        let image = self.get_image(name)?;
        SpriteSheet::new(image, tile_width, tile_height)
    }

    /// Drops every cached image. Sounds are untouched and handles already
    /// handed out stay valid.
    pub fn clear_image_cache(&self) {
        let mut images = self.images.lock();
        log::debug!("Clearing {} cached image(s)", images.len());
        images.clear();
    }

    /// Drops the cached image `name`. Returns `true` if it was cached.
    pub fn invalidate_image(&self, name: &str) -> bool {
        self.invalidate(&self.images, name)
    }

    /// Number of cached images.
    pub fn image_count(&self) -> usize {
        self.images.lock().len()
    }

    /// Resolves and decodes `name`, replacing any cached sound of that name.
    ///
    /// On failure the cache is left exactly as it was.
    pub fn load_sound(&self, name: &str) -> AssetResult<AssetHandle<SoundData>> {
        self.load(&self.sounds, name)
    }

    /// Returns the cached sound for `name`, loading it first if needed.
    pub fn get_sound(&self, name: &str) -> AssetResult<AssetHandle<SoundData>> {
        self.get_or_load(&self.sounds, name)
    }

    /// Returns the cached sound for `name` without ever loading it.
    pub fn cached_sound(&self, name: &str) -> Option<AssetHandle<SoundData>> {
        self.cached(&self.sounds, name)
    }

    /// Drops every cached sound. Images are untouched and handles already
    /// handed out stay valid.
    pub fn clear_sound_cache(&self) {
        let mut sounds = self.sounds.lock();
        log::debug!("Clearing {} cached sound(s)", sounds.len());
        sounds.clear();
    }

    /// Drops the cached sound `name`. Returns `true` if it was cached.
    pub fn invalidate_sound(&self, name: &str) -> bool {
        self.invalidate(&self.sounds, name)
    }

    /// Number of cached sounds.
    pub fn sound_count(&self) -> usize {
        self.sounds.lock().len()
    }

    /// Current values of the cache counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.metrics.hits.get(),
            misses: self.metrics.misses.get(),
            decodes: self.metrics.decodes.get(),
            failures: self.metrics.failures.get(),
        }
    }

    fn cached<A: Asset>(&self, class: &AssetClass<A>, name: &str) -> Option<AssetHandle<A>> {
        let key = AssetKey::new(name).ok()?;
        class.lock().get(key.as_str()).cloned()
    }

    fn invalidate<A: Asset>(&self, class: &AssetClass<A>, name: &str) -> bool {
        let Ok(key) = AssetKey::new(name) else {
            return false;
        };
        let removed = class.lock().remove(key.as_str()).is_some();
        if removed {
            log::debug!("Invalidated {} '{}'", class.label, key);
        }
        removed
    }

    fn load<A: Asset>(&self, class: &AssetClass<A>, name: &str) -> AssetResult<AssetHandle<A>> {
        let key = AssetKey::new(name)?;
        let mut storage = class.lock();
        self.load_locked(class, &mut storage, key)
    }

    fn get_or_load<A: Asset>(
        &self,
        class: &AssetClass<A>,
        name: &str,
    ) -> AssetResult<AssetHandle<A>> {
        let key = AssetKey::new(name)?;
        let mut storage = class.lock();

        if let Some(handle) = storage.get(key.as_str()) {
            self.metrics.hits.increment();
            return Ok(handle.clone());
        }

        self.metrics.misses.increment();
        if self.warn_on_implicit_load {
            log::warn!(
                "{} '{}' was requested before it was loaded; load it up front to avoid a stall",
                class.label,
                key
            );
        } else {
            log::debug!("Loading {} '{}' on first request", class.label, key);
        }
        self.load_locked(class, &mut storage, key)
    }

    fn load_locked<A: Asset>(
        &self,
        class: &AssetClass<A>,
        storage: &mut Assets<A>,
        key: AssetKey,
    ) -> AssetResult<AssetHandle<A>> {
        match self.resolve_and_decode(class, &key) {
            Ok(asset) => {
                let handle = AssetHandle::new(asset);
                if storage.insert(key, handle.clone()).is_some() {
                    log::debug!("Replaced a previously cached {}", class.label);
                }
                Ok(handle)
            }
            Err(err) => {
                self.metrics.failures.increment();
                log::warn!("Failed to load {} '{}': {}", class.label, key, err);
                Err(err)
            }
        }
    }

    fn resolve_and_decode<A: Asset>(&self, class: &AssetClass<A>, key: &AssetKey) -> AssetResult<A> {
        let resolved = self.resolver.resolve(key)?;
        let asset = class.decoders.decode(key, &resolved.bytes)?;
        self.metrics.decodes.increment();
        log::debug!(
            "Loaded {} '{}' from '{}'",
            class.label,
            key,
            resolved.location
        );
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jig_lanes::asset_lane::MemorySource;
    use std::{
        error::Error,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Decodes "WxH" text into a blank image and counts its calls.
    struct CountingImageLane(Arc<AtomicUsize>);

    impl AssetLoaderLane<ImageData> for CountingImageLane {
        fn load(&self, bytes: &[u8]) -> Result<ImageData, Box<dyn Error + Send + Sync>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            let text = std::str::from_utf8(bytes)?;
            let (w, h) = text.split_once('x').ok_or("expected WxH")?;
            let (w, h): (u32, u32) = (w.parse()?, h.parse()?);
            Ok(ImageData {
                width: w,
                height: h,
                pixels: vec![0; (w * h * 4) as usize],
            })
        }

        fn strategy_name(&self) -> &'static str {
            "CountingImage"
        }
    }

    fn cache_with(entries: &[(&str, &str)]) -> (AssetCache, Arc<AtomicUsize>) {
        let mut source = MemorySource::new();
        for (name, bytes) in entries {
            source.insert(name, bytes.as_bytes().to_vec()).unwrap();
        }
        let calls = Arc::new(AtomicUsize::new(0));
        let mut decoders = DecoderRegistry::new();
        decoders.set_fallback(CountingImageLane(calls.clone()));

        let cache = AssetCache::new(ResourceResolver::new().with_source(source))
            .with_image_decoders(decoders)
            .with_implicit_load_warnings(false);
        (cache, calls)
    }

    #[test]
    fn cache_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AssetCache>();
    }

    #[test]
    fn get_loads_once_then_hits() {
        let (cache, calls) = cache_with(&[("bg.png", "4x4")]);

        let first = cache.get_image("bg.png").unwrap();
        let second = cache.get_image("bg.png").unwrap();

        assert!(AssetHandle::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                decodes: 1,
                failures: 0
            }
        );
    }

    #[test]
    fn explicit_load_always_decodes_and_replaces() {
        let (cache, calls) = cache_with(&[("bg.png", "4x4")]);

        let first = cache.load_image("bg.png").unwrap();
        let second = cache.load_image("bg.png").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!AssetHandle::ptr_eq(&first, &second));
        let cached = cache.cached_image("bg.png").unwrap();
        assert!(AssetHandle::ptr_eq(&cached, &second));
    }

    #[test]
    fn cached_lookup_never_loads() {
        let (cache, calls) = cache_with(&[("bg.png", "4x4")]);

        assert!(cache.cached_image("bg.png").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.image_count(), 0);
    }

    #[test]
    fn decode_failure_keeps_previous_entry() {
        let (cache, _) = cache_with(&[("bg.png", "4x4"), ("broken.png", "garbage")]);

        let good = cache.load_image("bg.png").unwrap();
        let err = cache.load_image("broken.png").unwrap_err();

        assert!(err.is_decode());
        assert!(cache.cached_image("broken.png").is_none());
        let still = cache.cached_image("bg.png").unwrap();
        assert!(AssetHandle::ptr_eq(&good, &still));
        assert_eq!(cache.stats().failures, 1);
    }

    #[test]
    fn invalid_names_are_rejected_before_loading() {
        let (cache, calls) = cache_with(&[]);

        assert!(matches!(
            cache.get_image(""),
            Err(AssetError::InvalidArgument(_))
        ));
        assert!(matches!(
            cache.load_sound("  "),
            Err(AssetError::InvalidArgument(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn sprite_sheet_checks_tile_size_before_loading() {
        let (cache, calls) = cache_with(&[("tiles.png", "64x48")]);

        assert!(matches!(
            cache.get_sprite_sheet("tiles.png", 0, 16),
            Err(AssetError::InvalidArgument(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.image_count(), 0);

        let sheet = cache.get_sprite_sheet("tiles.png", 16, 16).unwrap();
        assert_eq!((sheet.columns(), sheet.rows()), (4, 3));
    }

    #[test]
    fn invalidate_drops_a_single_entry() {
        let (cache, calls) = cache_with(&[("a.png", "1x1"), ("b.png", "2x2")]);
        cache.get_image("a.png").unwrap();
        cache.get_image("b.png").unwrap();

        assert!(cache.invalidate_image("a.png"));
        assert!(!cache.invalidate_image("a.png"));
        assert_eq!(cache.image_count(), 1);

        cache.get_image("a.png").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn lookups_use_the_normalised_name() {
        let (cache, calls) = cache_with(&[("ui/button.png", "2x1")]);
        let loaded = cache.get_image("ui\\button.png").unwrap();

        let cached = cache.cached_image("/ui/button.png").unwrap();
        assert!(AssetHandle::ptr_eq(&loaded, &cached));
        assert!(cache.cached_image("..").is_none());

        assert!(cache.invalidate_image("ui\\button.png"));
        assert_eq!(cache.image_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_metrics_registry_sees_cache_counters() {
        let registry = Arc::new(MetricsRegistry::new());
        let (cache, _) = cache_with(&[("bg.png", "1x1")]);
        let cache = cache.with_metrics(registry.clone());

        cache.get_image("bg.png").unwrap();
        cache.get_image("missing.png").unwrap_err();

        let snapshot: Vec<(String, u64)> = registry
            .namespace_snapshot("assets")
            .into_iter()
            .map(|(id, value)| (id.name, value))
            .collect();
        assert_eq!(
            snapshot,
            vec![
                ("cache_hits".to_string(), 0),
                ("cache_misses".to_string(), 2),
                ("decodes".to_string(), 1),
                ("load_failures".to_string(), 1),
            ]
        );
    }
}
