//! CPU-side triangle meshes built from scene nodes.

use std::collections::HashMap;
use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::assets::Model;
use crate::scene::{Geometry, Material, NodeId, NodeKind, Scene};

use super::color::Color;

/// Vertex layout consumed by the scene shader (40 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Local-space triangle list with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CpuMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl CpuMesh {
    /// Disc in the XY plane facing +Z: a center vertex plus `segments + 1`
    /// rim vertices (first and last coincide).
    pub fn circle(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = CpuMesh::default();

        mesh.positions.push(Vec3::ZERO);
        for s in 0..=segments {
            let theta = s as f32 / segments as f32 * TAU;
            mesh.positions.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0));
        }
        mesh.normals = vec![Vec3::Z; mesh.positions.len()];

        for i in 1..=segments {
            mesh.indices.extend([i, i + 1, 0]);
        }
        mesh
    }

    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Circle { radius, segments } => Self::circle(radius, segments),
        }
    }

    /// Every mesh of `model` merged, with smooth normals.
    pub fn from_model(model: &Model) -> Self {
        let mut mesh = CpuMesh::default();
        for part in &model.meshes {
            let base = mesh.positions.len() as u32;
            mesh.positions.extend(part.positions.iter().map(|p| Vec3::from_array(*p)));
            mesh.indices.extend(part.indices.iter().map(|i| base + i));
        }
        mesh.normals = smooth_normals(&mesh.positions, &mesh.indices);
        mesh
    }

    /// Appends this mesh transformed by `model`, with a flat color.
    pub fn append_to(&self, model: Mat4, color: [f32; 4], vertices: &mut Vec<MeshVertex>, indices: &mut Vec<u32>) {
        let base = vertices.len() as u32;
        let normal_matrix = Mat3::from_mat4(model).inverse().transpose();

        vertices.extend(self.positions.iter().zip(&self.normals).map(|(p, n)| MeshVertex {
            position: model.transform_point3(*p).to_array(),
            normal: (normal_matrix * *n).normalize_or_zero().to_array(),
            color,
        }));
        indices.extend(self.indices.iter().map(|i| base + i));
    }
}

fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(a), positions.get(b), positions.get(c)) else {
            continue;
        };
        // Area-weighted face normal.
        let face = (*pb - *pa).cross(*pc - *pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

/// Linear surface color of a material: base color times the mean of its map.
pub(crate) fn material_color(material: &Material) -> [f32; 4] {
    let base = material.base_color.to_linear();
    let Some(map) = &material.map else {
        return base.to_array();
    };

    let [r, g, b, a] = map.texture.average();
    let mut texel = Color::from_srgb_u8(r, g, b, a);
    if map.srgb {
        texel = texel.to_linear();
    }
    [base.r * texel.r, base.g * texel.g, base.b * texel.b, base.a * texel.a]
}

const MODEL_COLOR: [f32; 4] = [0.8, 0.45, 0.2, 1.0];

/// Flattens `scene` into one world-space vertex/index pool.
///
/// Local meshes are cached per node; only the transform is reapplied each frame.
pub(crate) fn build_frame(
    scene: &Scene,
    cache: &mut HashMap<NodeId, CpuMesh>,
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
) {
    vertices.clear();
    indices.clear();

    for (id, node) in scene.nodes() {
        let color = match &node.kind {
            NodeKind::Mesh { material, .. } => material_color(material),
            NodeKind::Model { .. } => MODEL_COLOR,
            NodeKind::Light(_) => continue,
        };

        let mesh = cache.entry(id).or_insert_with(|| match &node.kind {
            NodeKind::Mesh { geometry, .. } => CpuMesh::from_geometry(geometry),
            NodeKind::Model { model, .. } => CpuMesh::from_model(model),
            NodeKind::Light(_) => CpuMesh::default(),
        });

        mesh.append_to(node.transform.matrix(), color, vertices, indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MeshInfo, Texture};
    use crate::scene::{SceneNode, TextureMap, Transform};
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    #[test]
    fn circle_has_center_and_closed_rim() {
        let m = CpuMesh::circle(5.0, 64);
        assert_eq!(m.positions.len(), 66);
        assert_eq!(m.indices.len(), 64 * 3);
        assert!(m.positions.iter().all(|p| p.length() <= 5.0 + 1e-4));
        assert!(m.indices.iter().all(|&i| (i as usize) < m.positions.len()));
    }

    #[test]
    fn model_meshes_are_merged_with_offsets() {
        let tri = MeshInfo {
            name: None,
            primitives: 1,
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
        };
        let model = Model { meshes: vec![tri.clone(), tri], node_count: 2, animations: vec![] };

        let m = CpuMesh::from_model(&model);
        assert_eq!(m.positions.len(), 6);
        assert_eq!(&m.indices[3..], &[3, 4, 5]);
        assert!((m.normals[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn floor_rotation_turns_disc_normal_up() {
        let mut scene = Scene::new();
        scene.add(
            SceneNode::new(
                "floor",
                NodeKind::Mesh {
                    geometry: Geometry::Circle { radius: 5.0, segments: 16 },
                    material: Material::default(),
                    cast_shadow: false,
                    receive_shadow: true,
                },
            )
            .with_transform(Transform::default().with_rotation(Quat::from_rotation_x(-FRAC_PI_2))),
        );

        let (mut cache, mut v, mut i) = (HashMap::new(), Vec::new(), Vec::new());
        build_frame(&scene, &mut cache, &mut v, &mut i);

        assert_eq!(v.len(), 18);
        assert!(v.iter().all(|vx| vx.position[1].abs() < 1e-5));
        assert!((Vec3::from_array(v[0].normal) - Vec3::Y).length() < 1e-5);

        // Second frame reuses the cache and rebuilds the pool from scratch.
        build_frame(&scene, &mut cache, &mut v, &mut i);
        assert_eq!(v.len(), 18);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn material_color_blends_base_and_map() {
        let white = Arc::new(Texture::new(1, 1, vec![255, 255, 255, 255]));
        let material = Material { map: Some(TextureMap::color(white)), ..Material::default() };
        let c = material_color(&material);
        assert!(c.iter().all(|v| (v - 1.0).abs() < 1e-5));
    }
}
