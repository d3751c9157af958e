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

//! A registry of decoders, selected by file extension.

use jig_core::{
    asset::{Asset, AssetKey},
    error::{AssetError, AssetResult},
};
use jig_data::assets::{ImageData, SoundData};
use jig_lanes::asset_lane::{
    AssetLoaderLane, ImageLoaderLane, SymphoniaLoaderLane, WavLoaderLane,
};
use std::collections::HashMap;

/// Maps lower-case file extensions to the lane that decodes them, with an
/// optional fallback for names whose extension has no dedicated lane.
pub struct DecoderRegistry<A: Asset> {
    by_extension: HashMap<String, Box<dyn AssetLoaderLane<A>>>,
    fallback: Option<Box<dyn AssetLoaderLane<A>>>,
}

impl<A: Asset> Default for DecoderRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> DecoderRegistry<A> {
    /// Creates a registry with no decoders at all.
    pub fn new() -> Self {
        Self {
            by_extension: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers `lane` for `extension` (case-insensitive, without the dot).
    pub fn register(&mut self, extension: &str, lane: impl AssetLoaderLane<A> + 'static) {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension.insert(extension, Box::new(lane));
    }

    /// Sets the lane used when no extension-specific lane matches.
    pub fn set_fallback(&mut self, lane: impl AssetLoaderLane<A> + 'static) {
        self.fallback = Some(Box::new(lane));
    }

    /// The lane that would decode `key`.
    pub fn decoder_for(&self, key: &AssetKey) -> Option<&dyn AssetLoaderLane<A>> {
        key.extension()
            .and_then(|ext| self.by_extension.get(&ext))
            .or(self.fallback.as_ref())
            .map(|lane| &**lane)
    }

    /// Decodes `bytes` as the asset named by `key`.
    ///
    /// # Errors
    /// [`AssetError::Decode`] if no lane matches, the lane rejects the bytes,
    /// or the decoded asset fails [`Asset::validate`].
    pub fn decode(&self, key: &AssetKey, bytes: &[u8]) -> AssetResult<A> {
        let lane = self.decoder_for(key).ok_or_else(|| AssetError::Decode {
            name: key.to_string(),
            reason: format!(
                "no decoder registered for extension {:?}",
                key.extension().unwrap_or_default()
            ),
        })?;

        log::trace!("Decoding '{}' with {}", key, lane.strategy_name());
        let asset = lane
            .load(bytes)
            .map_err(|e| e.to_string())
            .and_then(|asset| asset.validate().map(|()| asset))
            .map_err(|reason| AssetError::Decode {
                name: key.to_string(),
                reason,
            })?;
        Ok(asset)
    }
}

impl DecoderRegistry<ImageData> {
    /// Every format the `image` crate understands, through [`ImageLoaderLane`].
    pub fn images() -> Self {
        let mut registry = Self::new();
        registry.set_fallback(ImageLoaderLane::new());
        registry
    }
}

impl DecoderRegistry<SoundData> {
    /// `.wav` through `hound`, everything else through `symphonia`.
    pub fn sounds() -> Self {
        let mut registry = Self::new();
        registry.register("wav", WavLoaderLane::new());
        for extension in ["ogg", "flac", "mp3", "aiff", "aif"] {
            registry.register(extension, SymphoniaLoaderLane::with_extension_hint(extension));
        }
        registry.set_fallback(SymphoniaLoaderLane::new());
        registry
    }
}
