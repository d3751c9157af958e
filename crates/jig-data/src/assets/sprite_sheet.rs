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

//! A tiled view over a cached image.

use super::ImageData;
use jig_core::{
    asset::AssetHandle,
    error::{AssetError, AssetResult},
};

/// The pixel rectangle covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels; smaller than the tile width for clipped edge tiles.
    pub width: u32,
    /// Height in pixels; smaller than the tile height for clipped edge tiles.
    pub height: u32,
}

/// Interprets an image as a grid of equally sized tiles.
///
/// The grid covers the whole image: it has `ceil(width / tile_width)` columns
/// and `ceil(height / tile_height)` rows, and tiles on the right and bottom
/// edges are clipped to the image. The sheet keeps its own handle to the
/// image, so clearing the cache it came from does not affect it.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: AssetHandle<ImageData>,
    tile_width: u32,
    tile_height: u32,
    columns: u32,
    rows: u32,
}

impl SpriteSheet {
    /// Creates a sheet over `image` with the given tile size.
    ///
    /// # Errors
    /// Returns [`AssetError::InvalidArgument`] if either tile dimension is zero.
    pub fn new(image: AssetHandle<ImageData>, tile_width: u32, tile_height: u32) -> AssetResult<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AssetError::InvalidArgument(format!(
                "sprite sheet tiles must be at least 1x1 (got {tile_width}x{tile_height})"
            )));
        }
        let columns = image.width.div_ceil(tile_width);
        let rows = image.height.div_ceil(tile_height);

        Ok(Self {
            image,
            tile_width,
            tile_height,
            columns,
            rows,
        })
    }

    /// The underlying image.
    pub fn image(&self) -> &AssetHandle<ImageData> {
        &self.image
    }

    /// Nominal tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Nominal tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Number of tiles across.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tiles down.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// The pixel rectangle of the tile at `(column, row)`.
    pub fn tile_rect(&self, column: u32, row: u32) -> Option<TileRect> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let x = column * self.tile_width;
        let y = row * self.tile_height;
        Some(TileRect {
            x,
            y,
            width: self.tile_width.min(self.image.width - x),
            height: self.tile_height.min(self.image.height - y),
        })
    }

    /// Copies the tile at `(column, row)` out as its own image.
    pub fn sprite(&self, column: u32, row: u32) -> Option<ImageData> {
        let rect = self.tile_rect(column, row)?;
        self.image.sub_image(rect.x, rect.y, rect.width, rect.height)
    }
}
