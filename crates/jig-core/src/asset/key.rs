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

use crate::error::{AssetError, AssetResult};
use std::{borrow::Borrow, fmt};

/// The validated name an asset is requested by, such as `"sprites/hero.png"`.
///
/// Keys are always relative: separators are normalised to `/`, leading
/// slashes are stripped, and `..` components are rejected so a key can never
/// point outside the roots it is resolved against. Comparison is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(String);

impl AssetKey {
    /// Validates and normalises `name` into a key.
    ///
    /// # Errors
    /// Returns [`AssetError::InvalidArgument`] if the name is empty,
    /// whitespace-only, or contains a `..` component.
    pub fn new(name: impl AsRef<str>) -> AssetResult<Self> {
        let raw = name.as_ref();
        let normalised = raw.replace('\\', "/");
        let normalised = normalised.trim_start_matches('/');

        if normalised.trim().is_empty() {
            return Err(AssetError::InvalidArgument(format!(
                "asset name must not be empty (got {raw:?})"
            )));
        }
        if normalised.split('/').any(|part| part == "..") {
            return Err(AssetError::InvalidArgument(format!(
                "asset name '{raw}' must not contain '..' components"
            )));
        }

        Ok(Self(normalised.to_string()))
    }

    /// The normalised name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lower-cased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let file_name = self.0.rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AssetKey {
    type Error = AssetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for AssetKey {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank_names() {
        assert!(matches!(
            AssetKey::new(""),
            Err(AssetError::InvalidArgument(_))
        ));
        assert!(matches!(
            AssetKey::new("   "),
            Err(AssetError::InvalidArgument(_))
        ));
        assert!(matches!(
            AssetKey::new("/"),
            Err(AssetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_parent_components() {
        assert!(AssetKey::new("../secret.png").is_err());
        assert!(AssetKey::new("sprites/../../x.png").is_err());
        // A dot-dot inside a file name is fine.
        assert!(AssetKey::new("sprites/hero..png").is_ok());
    }

    #[test]
    fn normalises_separators_and_leading_slash() {
        let key = AssetKey::new("\\sprites\\hero.png").unwrap();
        assert_eq!(key.as_str(), "sprites/hero.png");
        assert_eq!(key, AssetKey::new("/sprites/hero.png").unwrap());
    }

    #[test]
    fn extension_is_lower_cased() {
        assert_eq!(
            AssetKey::new("sfx/Boom.WAV").unwrap().extension().as_deref(),
            Some("wav")
        );
        assert_eq!(AssetKey::new("music/theme").unwrap().extension(), None);
        assert_eq!(AssetKey::new("dir.d/.hidden").unwrap().extension(), None);
    }
}
