use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use experience_engine::assets::AssetError;
use experience_engine::scene::{
    ComposeCtx, Geometry, Material, NodeId, NodeKind, SceneNode, Subsystem, TextureMap, Transform,
};

use super::names;

const GRASS_REPEAT: f32 = 1.5;

/// Grass-textured disc lying flat on the ground.
pub struct Floor {
    mesh: NodeId,
}

impl Floor {
    pub fn build(ctx: &mut ComposeCtx<'_>) -> Result<Self, AssetError> {
        let color = ctx.assets.texture(names::GRASS_COLOR)?;
        let normal = ctx.assets.texture(names::GRASS_NORMAL)?;

        let material = Material {
            map: Some(TextureMap::color(color).repeated(GRASS_REPEAT)),
            normal_map: Some(TextureMap::data(normal).repeated(GRASS_REPEAT)),
            ..Material::default()
        };

        let mesh = ctx.scene.add(
            SceneNode::new(
                "floor",
                NodeKind::Mesh {
                    geometry: Geometry::Circle { radius: 5.0, segments: 64 },
                    material,
                    cast_shadow: false,
                    receive_shadow: true,
                },
            )
            .with_transform(Transform::from_translation(Vec3::ZERO).with_rotation(Quat::from_rotation_x(-FRAC_PI_2))),
        );

        Ok(Self { mesh })
    }

    pub fn mesh(&self) -> NodeId {
        self.mesh
    }
}

impl Subsystem for Floor {
    fn name(&self) -> &str {
        "floor"
    }
}
