//! Decoders used by the threaded retrievers.

use std::path::Path;
use std::sync::Arc;

use super::error::AssetError;
use super::resource::{AnimationClip, Asset, MeshInfo, Model, Panorama, Texture};

fn decode_err(path: &Path, e: impl ToString) -> AssetError {
    AssetError::Decode { path: path.to_path_buf(), message: e.to_string() }
}

/// Loads a PNG/JPEG file as RGBA8.
pub fn decode_texture(path: &Path) -> Result<Asset, AssetError> {
    let img = image::open(path).map_err(|e| decode_err(path, e))?.into_rgba8();
    let (width, height) = img.dimensions();
    Ok(Asset::Texture(Arc::new(Texture::new(width, height, img.into_raw()))))
}

/// Loads a Radiance HDR panorama as linear RGB f32.
pub fn decode_panorama(path: &Path) -> Result<Asset, AssetError> {
    let img = image::open(path).map_err(|e| decode_err(path, e))?.into_rgb32f();
    let (width, height) = img.dimensions();
    let texels = img.pixels().map(|p| p.0).collect();
    Ok(Asset::Panorama(Arc::new(Panorama { width, height, texels })))
}

/// Imports a glTF file with its buffers and summarizes it.
pub fn decode_model(path: &Path) -> Result<Asset, AssetError> {
    let (doc, buffers, _images) = gltf::import(path).map_err(|e| decode_err(path, e))?;

    let meshes = doc
        .meshes()
        .map(|mesh| {
            let mut info = MeshInfo {
                name: mesh.name().map(str::to_string),
                primitives: mesh.primitives().len(),
                positions: Vec::new(),
                indices: Vec::new(),
            };

            // Primitives are merged into one vertex/index pool.
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
                let Some(positions) = reader.read_positions() else { continue };

                let base = info.positions.len() as u32;
                info.positions.extend(positions);
                let added = info.positions.len() as u32 - base;

                match reader.read_indices() {
                    Some(indices) => info.indices.extend(indices.into_u32().map(|i| base + i)),
                    None => info.indices.extend(base..base + added),
                }
            }

            info
        })
        .collect();

    let animations = doc
        .animations()
        .enumerate()
        .map(|(index, anim)| {
            // Clip length is the last keyframe time over all channels.
            let duration = anim
                .channels()
                .filter_map(|channel| {
                    let reader = channel.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
                    reader.read_inputs().map(|times| times.fold(0.0_f32, f32::max))
                })
                .fold(0.0_f32, f32::max);

            AnimationClip {
                name: anim.name().map(str::to_string).unwrap_or_else(|| format!("clip{index}")),
                duration,
            }
        })
        .collect();

    Ok(Asset::Model(Arc::new(Model {
        meshes,
        node_count: doc.nodes().count(),
        animations,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_is_a_decode_error() {
        let err = decode_texture(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn decodes_png_roundtrip_from_disk() {
        let dir = std::env::temp_dir().join(format!("experience-decode-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let Asset::Texture(tex) = decode_texture(&path).unwrap() else {
            panic!("expected a texture");
        };
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(&tex.pixels[..4], &[10, 20, 30, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
