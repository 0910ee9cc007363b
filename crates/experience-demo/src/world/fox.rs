use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use experience_engine::assets::{AnimationClip, AssetError, Model};
use experience_engine::scene::{ComposeCtx, NodeId, NodeKind, Scene, SceneNode, Subsystem, Transform};
use experience_engine::time::TimeState;

use super::names;

const FOX_SCALE: f32 = 0.02;

/// Plays one clip on a loop.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationMixer {
    clip: usize,
    duration: f32,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clip: usize, info: &AnimationClip) -> Self {
        Self { clip, duration: info.duration, time: 0.0 }
    }

    /// Advances playback by `delta` seconds, wrapping at the clip's end.
    pub fn update(&mut self, delta: f32) {
        self.time += delta;
        if self.duration > 0.0 {
            self.time %= self.duration;
        }
    }

    pub fn clip(&self) -> usize {
        self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// The animated fox.
///
/// Each debug button press restarts its clip from the beginning on the next
/// update, even when that clip is already playing.
pub struct Fox {
    node: NodeId,
    model: Arc<Model>,
    mixer: Option<AnimationMixer>,
    requested: Rc<Cell<Option<usize>>>,
}

impl Fox {
    pub fn build(ctx: &mut ComposeCtx<'_>) -> Result<Self, AssetError> {
        let model = ctx.assets.model(names::FOX)?;

        let node = ctx.scene.add(
            SceneNode::new("fox", NodeKind::Model { model: Arc::clone(&model), cast_shadow: true })
                .with_transform(Transform::default().with_uniform_scale(FOX_SCALE)),
        );

        let requested = Rc::new(Cell::new(None));
        if let Some(folder) = ctx.debug.add_folder("Fox") {
            for (title, clip) in [("Animation 1", 0), ("Animation 2", 1)] {
                let requested = Rc::clone(&requested);
                folder.add_button(title, move || requested.set(Some(clip)));
            }
        }

        let mut fox = Self { node, model, mixer: None, requested };
        fox.play(0);
        Ok(fox)
    }

    /// Restarts playback on `clip`. An unknown clip keeps the current one.
    fn play(&mut self, clip: usize) {
        match self.model.animations.get(clip) {
            Some(info) => {
                log::debug!("fox plays `{}`", info.name);
                self.mixer = Some(AnimationMixer::new(clip, info));
            }
            None => log::warn!("fox has no animation {clip}"),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }
}

impl Subsystem for Fox {
    fn name(&self) -> &str {
        "fox"
    }

    fn update(&mut self, time: &TimeState, _scene: &mut Scene) {
        if let Some(clip) = self.requested.take() {
            self.play(clip);
        }

        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(time.delta_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::testing::world_store;
    use experience_engine::debug::DebugPanel;
    use std::time::Duration;

    fn tick(delta_ms: u64) -> TimeState {
        TimeState {
            start: Duration::ZERO,
            current: Duration::from_millis(delta_ms),
            elapsed: Duration::from_millis(delta_ms),
            delta: Duration::from_millis(delta_ms),
            frame_index: 1,
        }
    }

    fn build(clips: usize, debug: &mut DebugPanel, scene: &mut Scene) -> Fox {
        let store = world_store(clips);
        Fox::build(&mut ComposeCtx { assets: &store, scene, debug }).unwrap()
    }

    // ── model ─────────────────────────────────────────────────────────────

    #[test]
    fn fox_is_scaled_and_casts_shadows() {
        let mut scene = Scene::new();
        let fox = build(2, &mut DebugPanel::new(false), &mut scene);

        let node = scene.node(fox.node()).unwrap();
        assert_eq!(node.transform.scale.x, 0.02);
        assert!(matches!(node.kind, NodeKind::Model { cast_shadow: true, .. }));
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn mixer_advances_by_frame_delta_and_loops() {
        let mut scene = Scene::new();
        let mut fox = build(2, &mut DebugPanel::new(false), &mut scene);

        fox.update(&tick(250), &mut scene);
        assert!((fox.mixer().unwrap().time() - 0.25).abs() < 1e-6);

        for _ in 0..4 {
            fox.update(&tick(250), &mut scene);
        }
        // Clip 0 lasts one second.
        assert!((fox.mixer().unwrap().time() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn debug_buttons_switch_clips() {
        let mut scene = Scene::new();
        let mut debug = DebugPanel::new(true);
        let mut fox = build(2, &mut debug, &mut scene);

        fox.update(&tick(100), &mut scene);
        assert!(debug.press(1));
        fox.update(&tick(100), &mut scene);

        let mixer = fox.mixer().unwrap();
        assert_eq!(mixer.clip(), 1);
        assert!((mixer.time() - 0.1).abs() < 1e-6);

        assert!(debug.press(0));
        fox.update(&tick(100), &mut scene);
        assert_eq!(fox.mixer().unwrap().clip(), 0);
    }

    #[test]
    fn pressing_the_playing_clip_restarts_it() {
        let mut scene = Scene::new();
        let mut debug = DebugPanel::new(true);
        let mut fox = build(2, &mut debug, &mut scene);

        fox.update(&tick(400), &mut scene);
        assert!((fox.mixer().unwrap().time() - 0.4).abs() < 1e-6);

        assert!(debug.press(0));
        fox.update(&tick(100), &mut scene);
        let mixer = fox.mixer().unwrap();
        assert_eq!(mixer.clip(), 0);
        assert!((mixer.time() - 0.1).abs() < 1e-6);

        // Without a new press playback just continues.
        fox.update(&tick(100), &mut scene);
        assert!((fox.mixer().unwrap().time() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn missing_clip_keeps_the_current_one() {
        let mut scene = Scene::new();
        let mut debug = DebugPanel::new(true);
        let mut fox = build(1, &mut debug, &mut scene);

        debug.press(1);
        fox.update(&tick(100), &mut scene);
        assert_eq!(fox.mixer().unwrap().clip(), 0);
    }

    #[test]
    fn model_without_animations_has_no_mixer() {
        let mut scene = Scene::new();
        let mut fox = build(0, &mut DebugPanel::new(false), &mut scene);
        fox.update(&tick(16), &mut scene);
        assert!(fox.mixer().is_none());
    }
}
