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

//! Defines the error type shared by every asset operation.

use std::io;
use thiserror::Error;

/// A convenience alias for results produced by the asset system.
pub type AssetResult<T> = Result<T, AssetError>;

/// An error raised while resolving, decoding, or requesting an asset.
///
/// Every failure is local to the requested name: no variant implies that
/// other cache entries were touched.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No source could provide bytes for the requested name.
    #[error("asset '{name}' was not found (tried: {})", .tried.join(", "))]
    NotFound {
        /// The name that was requested.
        name: String,
        /// Every location that was tried, in resolution order.
        tried: Vec<String>,
    },
    /// Bytes were found but the decoder rejected them.
    #[error("failed to decode asset '{name}': {reason}")]
    Decode {
        /// The name that was requested.
        name: String,
        /// The message reported by the decoder.
        reason: String,
    },
    /// The request itself was malformed (empty name, zero tile size, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A source failed with an I/O error other than "not found".
    #[error("I/O error while reading '{location}'")]
    Io {
        /// The location that failed.
        location: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The asset configuration is unusable.
    #[error("invalid asset configuration: {0}")]
    Config(String),
}

impl AssetError {
    /// Returns `true` for [`AssetError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }

    /// Returns `true` for [`AssetError::Decode`].
    pub fn is_decode(&self) -> bool {
        matches!(self, AssetError::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_location() {
        let err = AssetError::NotFound {
            name: "bg.png".into(),
            tried: vec!["assets/bg.png".into(), "mods/bg.png".into()],
        };
        let message = err.to_string();
        assert!(message.contains("bg.png"));
        assert!(message.contains("assets/bg.png, mods/bg.png"));
        assert!(err.is_not_found());
        assert!(!err.is_decode());
    }
}
