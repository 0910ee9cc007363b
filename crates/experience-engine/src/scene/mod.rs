//! Scene graph and the composer that builds it once assets are ready.
//!
//! Subsystems are declared up front as factories. Nothing is built until the
//! asset loader reports `"ready"`; before that, [`SceneComposer::update`] does
//! nothing.

mod composer;
mod graph;
mod subsystem;

pub use composer::{SceneComposer, COMPOSER_NAMESPACE};
pub use graph::{
    DirectionalLight, EnvironmentMap, Geometry, Material, NodeId, NodeKind, Scene, SceneNode,
    ShadowSettings, TextureMap, Transform,
};
pub use subsystem::{factory, ComposeCtx, Subsystem, SubsystemFactory};
