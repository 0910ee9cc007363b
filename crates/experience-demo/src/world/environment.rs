use glam::Vec3;

use experience_engine::assets::AssetError;
use experience_engine::render::Color;
use experience_engine::scene::{
    ComposeCtx, DirectionalLight, EnvironmentMap, NodeId, NodeKind, SceneNode, ShadowSettings, Subsystem,
};

use super::names;

const ENVIRONMENT_INTENSITY: f32 = 0.4;

/// Sun light plus the equirectangular environment map.
pub struct Environment {
    sun: NodeId,
}

impl Environment {
    pub fn build(ctx: &mut ComposeCtx<'_>) -> Result<Self, AssetError> {
        let panorama = ctx.assets.panorama(names::ENVIRONMENT_MAP)?;

        let sun = ctx.scene.add(SceneNode::new(
            "sun",
            NodeKind::Light(DirectionalLight {
                color: Color::white(),
                intensity: 4.0,
                position: Vec3::new(3.5, 2.0, -1.25),
                shadow: Some(ShadowSettings { far: 15.0, map_size: 1024, normal_bias: 0.05 }),
            }),
        ));

        ctx.scene.set_environment(EnvironmentMap { panorama, intensity: ENVIRONMENT_INTENSITY });

        Ok(Self { sun })
    }

    pub fn sun(&self) -> NodeId {
        self.sun
    }
}

impl Subsystem for Environment {
    fn name(&self) -> &str {
        "environment"
    }
}
