use crate::assets::{AssetError, AssetStore};
use crate::debug::DebugPanel;
use crate::time::TimeState;

use super::graph::Scene;

/// A scene part built once assets are ready.
pub trait Subsystem {
    fn name(&self) -> &str;

    /// Per-frame hook. Most subsystems are static.
    fn update(&mut self, _time: &TimeState, _scene: &mut Scene) {}
}

/// What a factory may touch while building its subsystem.
pub struct ComposeCtx<'a> {
    pub assets: &'a AssetStore,
    pub scene: &'a mut Scene,
    pub debug: &'a mut DebugPanel,
}

/// Builds one subsystem. A missing or mistyped asset fails the factory.
pub type SubsystemFactory = Box<dyn FnOnce(&mut ComposeCtx<'_>) -> Result<Box<dyn Subsystem>, AssetError>>;

/// Boxes a closure as a [`SubsystemFactory`].
pub fn factory<F>(f: F) -> SubsystemFactory
where
    F: FnOnce(&mut ComposeCtx<'_>) -> Result<Box<dyn Subsystem>, AssetError> + 'static,
{
    Box::new(f)
}
