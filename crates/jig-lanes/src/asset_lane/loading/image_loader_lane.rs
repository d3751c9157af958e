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

//! Image decoding.

use crate::asset_lane::AssetLoaderLane;
use anyhow::Context;
use jig_data::assets::ImageData;
use std::error::Error;

/// A lane dedicated to decoding image files (PNG, JPEG, BMP, ...) on the CPU.
#[derive(Clone, Default)]
pub struct ImageLoaderLane;

impl ImageLoaderLane {
    /// Creates a new instance of `ImageLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane<ImageData> for ImageLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<ImageData, Box<dyn Error + Send + Sync>> {
        // Decode the image using the `image` crate
        let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(ImageData {
            width,
            height,
            pixels: rgba_img.into_raw(),
        })
    }

    fn strategy_name(&self) -> &'static str {
        "ImageLoader"
    }
}
