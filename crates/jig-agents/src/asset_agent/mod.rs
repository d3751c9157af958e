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

//! Acts as the agent for the asset subsystem.
//!
//! This module holds the tactical logic of asset management: it decides when
//! a name must be resolved and decoded and when a cached handle can be
//! returned. The actual work of finding bytes and decoding them is delegated
//! to the sources and loader lanes of `jig-lanes`.

mod cache;
mod loader;

pub use cache::{AssetCache, CacheStats};
pub use loader::DecoderRegistry;
