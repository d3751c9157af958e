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

//! Defines the core asset type for decoded images.

use jig_core::asset::Asset;

/// A decoded image held on the CPU as tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Bytes per RGBA8 pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wraps raw RGBA8 pixels. Returns `None` if the buffer length does not
    /// match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let px = self.pixels.get(start..start + Self::BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copies the region starting at `(x, y)` into a new image.
    ///
    /// The region is clipped to the image bounds. Returns `None` if the
    /// origin lies outside the image or the clipped region is empty.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Option<ImageData> {
        if x >= self.width || y >= self.height || width == 0 || height == 0 {
            return None;
        }
        let w = width.min(self.width - x) as usize;
        let h = height.min(self.height - y) as usize;
        let stride = self.width as usize * Self::BYTES_PER_PIXEL;
        let row_bytes = w * Self::BYTES_PER_PIXEL;

        let mut pixels = Vec::with_capacity(row_bytes * h);
        for row in y as usize..y as usize + h {
            let start = row * stride + x as usize * Self::BYTES_PER_PIXEL;
            pixels.extend_from_slice(self.pixels.get(start..start + row_bytes)?);
        }

        Some(ImageData {
            width: w as u32,
            height: h as u32,
            pixels,
        })
    }
}

impl Asset for ImageData {
    fn validate(&self) -> Result<(), String> {
        let expected = self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL;
        if self.pixels.len() != expected {
            return Err(format!(
                "a {}x{} image needs {} pixel bytes, got {}",
                self.width,
                self.height,
                expected,
                self.pixels.len()
            ));
        }
        Ok(())
    }
}
