//! The demo scene: sun and environment map, a grass floor, and the fox.
//!
//! Subsystems are built in this order once every asset has loaded.

mod environment;
mod floor;
mod fox;

pub use environment::Environment;
pub use floor::Floor;
pub use fox::{AnimationMixer, Fox};

use experience_engine::scene::{factory, SubsystemFactory};

/// Manifest names the world reads.
pub mod names {
    pub const ENVIRONMENT_MAP: &str = "environmentMapTexture";
    pub const GRASS_COLOR: &str = "grassColorTexture";
    pub const GRASS_NORMAL: &str = "grassNormalTexture";
    pub const FOX: &str = "foxModel";
}

pub fn factories() -> Vec<SubsystemFactory> {
    vec![
        factory(|ctx| Ok(Box::new(Environment::build(ctx)?))),
        factory(|ctx| Ok(Box::new(Floor::build(ctx)?))),
        factory(|ctx| Ok(Box::new(Fox::build(ctx)?))),
    ]
}
