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

use jig_core::asset::Asset;
use std::error::Error;

/// A trait for types that can decode a specific kind of asset from a byte slice.
///
/// Implementors do the potentially CPU-intensive work of parsing raw file data
/// into a usable, engine-ready asset type. They never touch the cache.
///
/// Each `AssetLoaderLane` is specialized for a single asset type `A`.
pub trait AssetLoaderLane<A: Asset>: Send + Sync {
    /// Parses a byte slice and converts it into an instance of the asset `A`.
    ///
    /// # Returns
    /// The decoded asset, or a boxed error describing why the bytes were
    /// rejected. The error must be thread-safe.
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;

    /// A short name for this decoder, used in logs.
    fn strategy_name(&self) -> &'static str;
}
