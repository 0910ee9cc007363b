use std::sync::Arc;

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::assets::{Model, Panorama, Texture};
use crate::render::Color;

/// Index of a node inside its [`Scene`]. Stable for the scene's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Translation, rotation and scale of a node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::default() }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Procedural geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Geometry {
    /// Disc in the XY plane, facing +Z.
    Circle { radius: f32, segments: u32 },
}

/// Texture slot of a material.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    pub texture: Arc<Texture>,
    /// UV repeat count per axis (wrapping is always "repeat").
    pub repeat: Vec2,
    /// True for color data stored in sRGB.
    pub srgb: bool,
}

impl TextureMap {
    pub fn color(texture: Arc<Texture>) -> Self {
        Self { texture, repeat: Vec2::ONE, srgb: true }
    }

    pub fn data(texture: Arc<Texture>) -> Self {
        Self { texture, repeat: Vec2::ONE, srgb: false }
    }

    pub fn repeated(mut self, repeat: f32) -> Self {
        self.repeat = Vec2::splat(repeat);
        self
    }
}

/// Physically based surface description.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: Color,
    pub map: Option<TextureMap>,
    pub normal_map: Option<TextureMap>,
}

impl Default for Material {
    fn default() -> Self {
        Self { base_color: Color::white(), map: None, normal_map: None }
    }
}

/// Shadow-casting parameters of a light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowSettings {
    pub far: f32,
    pub map_size: u32,
    pub normal_bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self { far: 500.0, map_size: 512, normal_bias: 0.0 }
    }
}

/// Light arriving from `position` towards the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// `None` when the light casts no shadows.
    pub shadow: Option<ShadowSettings>,
}

impl DirectionalLight {
    /// Unit vector the light travels along.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or(Vec3::NEG_Y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh {
        geometry: Geometry,
        material: Material,
        cast_shadow: bool,
        receive_shadow: bool,
    },
    Light(DirectionalLight),
    Model {
        model: Arc<Model>,
        cast_shadow: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self { name: name.into(), transform: Transform::default(), kind }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Equirectangular image lighting the whole scene.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub panorama: Arc<Panorama>,
    pub intensity: f32,
}

/// Flat scene graph. Nodes are never removed, so [`NodeId`]s stay valid.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    environment: Option<EnvironmentMap>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// First node named `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn lights(&self) -> impl Iterator<Item = &DirectionalLight> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_environment(&mut self, environment: EnvironmentMap) {
        self.environment = Some(environment);
    }

    pub fn environment(&self) -> Option<&EnvironmentMap> {
        self.environment.as_ref()
    }
}
