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

//! Provides the foundational traits and primitive types for Jig's asset system.
//!
//! This module defines the "common language" for all asset-related operations.
//! It has no knowledge of how assets are located, decoded or stored.
//!
//! The key components are:
//! - The [`Asset`] trait: A marker for all types that can be treated as assets.
//! - [`AssetKey`]: the validated name an asset is requested by.
//! - [`AssetHandle`]: a cheap, shared reference to a decoded asset.

mod handle;
mod key;

pub use handle::*;
pub use key::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits let decoded assets be cached once and handed out to any
/// thread:
/// - `Send` + `Sync`: The asset type can be safely shared and sent between threads.
/// - `'static`: The asset type does not borrow anything, so it can live in a
///   cache for the lifetime of the application.
///
/// # Examples
///
/// ```
/// use jig_core::asset::Asset;
///
/// struct Tilemap {
///     // ... fields
/// }
///
/// impl Asset for Tilemap {}
/// ```
pub trait Asset: Send + Sync + 'static {
    /// Checks the decoded value's internal consistency before it is cached.
    ///
    /// The cache calls this on every freshly decoded asset and reports an
    /// `Err` as a decode failure.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
