use std::fmt;
use std::sync::Arc;

use super::manifest::AssetKind;

/// Decoded 8-bit RGBA texture.
#[derive(Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self { width, height, pixels }
    }

    /// Mean of every texel, as straight RGBA bytes.
    pub fn average(&self) -> [u8; 4] {
        let count = (self.pixels.len() / 4).max(1) as u64;
        let mut sum = [0u64; 4];
        for px in self.pixels.chunks_exact(4) {
            for (acc, c) in sum.iter_mut().zip(px) {
                *acc += u64::from(*c);
            }
        }
        sum.map(|s| (s / count) as u8)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Texture({}x{})", self.width, self.height)
    }
}

/// Decoded equirectangular HDR image (linear RGB, f32 per channel).
#[derive(Clone, PartialEq)]
pub struct Panorama {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<[f32; 3]>,
}

impl fmt::Debug for Panorama {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Panorama({}x{})", self.width, self.height)
    }
}

/// Named animation with its length in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

/// One glTF mesh with its primitives merged into a single triangle list.
#[derive(Clone, PartialEq)]
pub struct MeshInfo {
    pub name: Option<String>,
    pub primitives: usize,
    /// Mesh-local vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl fmt::Debug for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshInfo")
            .field("name", &self.name)
            .field("primitives", &self.primitives)
            .field("vertices", &self.positions.len())
            .field("indices", &self.indices.len())
            .finish()
    }
}

/// Summary of a glTF document: meshes, node count and animation clips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<MeshInfo>,
    pub node_count: usize,
    pub animations: Vec<AnimationClip>,
}

/// A loaded resource of any kind. Cloning shares the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Texture(Arc<Texture>),
    Panorama(Arc<Panorama>),
    Model(Arc<Model>),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Texture(_) => AssetKind::Texture,
            Asset::Panorama(_) => AssetKind::RgbeTexture,
            Asset::Model(_) => AssetKind::GltfModel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_two_texels() {
        let t = Texture::new(2, 1, vec![0, 100, 200, 255, 100, 100, 0, 255]);
        assert_eq!(t.average(), [50, 100, 100, 255]);
    }

    #[test]
    fn asset_kind_follows_variant() {
        let m = Asset::Model(Arc::new(Model::default()));
        assert_eq!(m.kind(), AssetKind::GltfModel);
    }
}
