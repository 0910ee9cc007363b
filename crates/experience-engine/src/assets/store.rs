use std::collections::HashMap;
use std::sync::Arc;

use super::error::AssetError;
use super::manifest::AssetKind;
use super::resource::{Asset, Model, Panorama, Texture};

/// Loaded assets keyed by manifest name.
///
/// Only the [`AssetLoader`](super::AssetLoader) inserts; everyone else reads.
/// Cloning is cheap: payloads are shared.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    items: HashMap<String, Asset>,
}

impl AssetStore {
    pub(crate) fn insert(&mut self, name: String, asset: Asset) {
        self.items.insert(name, asset);
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    fn require(&self, name: &str) -> Result<&Asset, AssetError> {
        self.items.get(name).ok_or_else(|| AssetError::Missing(name.to_string()))
    }

    fn wrong_kind(name: &str, expected: AssetKind, found: &Asset) -> AssetError {
        AssetError::WrongKind { name: name.to_string(), expected, found: found.kind() }
    }

    pub fn texture(&self, name: &str) -> Result<Arc<Texture>, AssetError> {
        match self.require(name)? {
            Asset::Texture(t) => Ok(Arc::clone(t)),
            other => Err(Self::wrong_kind(name, AssetKind::Texture, other)),
        }
    }

    pub fn panorama(&self, name: &str) -> Result<Arc<Panorama>, AssetError> {
        match self.require(name)? {
            Asset::Panorama(p) => Ok(Arc::clone(p)),
            other => Err(Self::wrong_kind(name, AssetKind::RgbeTexture, other)),
        }
    }

    pub fn model(&self, name: &str) -> Result<Arc<Model>, AssetError> {
        match self.require(name)? {
            Asset::Model(m) => Ok(Arc::clone(m)),
            other => Err(Self::wrong_kind(name, AssetKind::GltfModel, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_texture() -> AssetStore {
        let mut store = AssetStore::default();
        store.insert("grass".into(), Asset::Texture(Arc::new(Texture::new(1, 1, vec![0; 4]))));
        store
    }

    #[test]
    fn typed_lookup_succeeds() {
        let store = store_with_texture();
        assert_eq!(store.texture("grass").unwrap().width, 1);
    }

    #[test]
    fn missing_name() {
        let store = store_with_texture();
        assert_eq!(store.model("fox").unwrap_err(), AssetError::Missing("fox".into()));
    }

    #[test]
    fn wrong_kind() {
        let store = store_with_texture();
        let err = store.panorama("grass").unwrap_err();
        assert_eq!(
            err,
            AssetError::WrongKind {
                name: "grass".into(),
                expected: AssetKind::RgbeTexture,
                found: AssetKind::Texture,
            }
        );
    }

    #[test]
    fn clones_share_payloads() {
        let store = store_with_texture();
        let copy = store.clone();
        assert!(Arc::ptr_eq(&store.texture("grass").unwrap(), &copy.texture("grass").unwrap()));
    }
}
