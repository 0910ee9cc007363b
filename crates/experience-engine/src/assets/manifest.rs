use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::AssetError;

/// Kind of resource a descriptor points at.
///
/// Serialized with the manifest tags `texture`, `rgbeTexture` and `gltfModel`.
/// Any other tag fails manifest parsing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    /// Plain 8-bit texture (PNG/JPEG).
    Texture,
    /// Panoramic HDR texture (Radiance `.hdr`).
    RgbeTexture,
    /// glTF model.
    GltfModel,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetKind::Texture => "texture",
            AssetKind::RgbeTexture => "rgbeTexture",
            AssetKind::GltfModel => "gltfModel",
        };
        f.write_str(s)
    }
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Path relative to the retriever's base directory.
    pub path: String,
}

impl AssetDescriptor {
    pub fn new(name: impl Into<String>, kind: AssetKind, path: impl Into<String>) -> Self {
        Self { name: name.into(), kind, path: path.into() }
    }
}

/// Immutable, validated list of descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Vec<AssetDescriptor>,
}

impl Manifest {
    /// Validates names: non-empty and unique.
    pub fn new(entries: Vec<AssetDescriptor>) -> Result<Self, AssetError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(AssetError::EmptyName);
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(AssetError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parses a JSON array of `{ name, type, path }` records.
    pub fn from_json_str(src: &str) -> Result<Self, AssetError> {
        let entries: Vec<AssetDescriptor> =
            serde_json::from_str(src).map_err(|e| AssetError::Manifest(e.to_string()))?;
        Self::new(entries)
    }

    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let src = std::fs::read_to_string(path).map_err(|e| AssetError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&src)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&AssetDescriptor> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Distinct kinds in first-use order.
    pub fn kinds(&self) -> Vec<AssetKind> {
        let mut kinds = Vec::new();
        for entry in &self.entries {
            if !kinds.contains(&entry.kind) {
                kinds.push(entry.kind);
            }
        }
        kinds
    }
}
