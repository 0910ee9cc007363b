use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::{AssetEvent, AssetLoader, AssetStore};
use crate::debug::DebugPanel;
use crate::events::EventError;
use crate::time::TimeState;

use super::graph::Scene;
use super::subsystem::{ComposeCtx, Subsystem, SubsystemFactory};

/// Namespace of the composer's `"ready"` subscription.
pub const COMPOSER_NAMESPACE: &str = "composer";

/// Builds the subsystems once assets are ready, then fans out updates.
pub struct SceneComposer {
    factories: Vec<SubsystemFactory>,
    subsystems: Vec<Box<dyn Subsystem>>,
    composed: bool,
}

impl SceneComposer {
    /// Factories run in the given order.
    pub fn new(factories: Vec<SubsystemFactory>) -> Self {
        Self { factories, subsystems: Vec::new(), composed: false }
    }

    /// Subscribes `composer` to the loader's `"ready"` event.
    ///
    /// The subscription lives under [`COMPOSER_NAMESPACE`] and can be removed
    /// with `off(".composer")`.
    pub fn attach(
        composer: &Rc<RefCell<Self>>,
        loader: &mut AssetLoader,
        scene: Rc<RefCell<Scene>>,
        debug: Rc<RefCell<DebugPanel>>,
    ) -> Result<(), EventError> {
        let composer = Rc::clone(composer);
        loader.events_mut().on(&format!("ready.{COMPOSER_NAMESPACE}"), move |ev: &AssetEvent| {
            if let AssetEvent::Ready(assets) = ev {
                composer
                    .borrow_mut()
                    .compose(assets, &mut scene.borrow_mut(), &mut debug.borrow_mut());
            }
        })?;
        Ok(())
    }

    /// Runs every factory once. Later calls are ignored.
    ///
    /// A failing factory is logged and its subsystem skipped; the rest still
    /// build. Returns the number of subsystems built by this call.
    pub fn compose(&mut self, assets: &AssetStore, scene: &mut Scene, debug: &mut DebugPanel) -> usize {
        if self.composed {
            log::debug!("scene already composed; ignoring");
            return 0;
        }
        self.composed = true;

        let mut ctx = ComposeCtx { assets, scene, debug };
        for factory in std::mem::take(&mut self.factories) {
            match factory(&mut ctx) {
                Ok(subsystem) => {
                    log::debug!("subsystem `{}` ready", subsystem.name());
                    self.subsystems.push(subsystem);
                }
                Err(e) => log::warn!("skipping subsystem: {e}"),
            }
        }

        log::info!("scene composed with {} subsystem(s)", self.subsystems.len());
        self.subsystems.len()
    }

    /// No-op until composed.
    pub fn update(&mut self, time: &TimeState, scene: &mut Scene) {
        for subsystem in &mut self.subsystems {
            subsystem.update(time, scene);
        }
    }

    pub fn is_composed(&self) -> bool {
        self.composed
    }

    pub fn subsystem_names(&self) -> Vec<&str> {
        self.subsystems.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{
        Asset, AssetDescriptor, AssetError, AssetKind, ManualRetriever, Manifest, Texture,
    };
    use crate::scene::{factory, Geometry, Material, NodeKind, SceneNode};
    use std::cell::Cell;
    use std::sync::Arc;
    use std::time::Duration;

    struct Counter {
        name: &'static str,
        updates: Rc<Cell<u32>>,
    }

    impl Subsystem for Counter {
        fn name(&self) -> &str {
            self.name
        }

        fn update(&mut self, _time: &TimeState, _scene: &mut Scene) {
            self.updates.set(self.updates.get() + 1);
        }
    }

    fn counter(name: &'static str, updates: &Rc<Cell<u32>>) -> SubsystemFactory {
        let updates = Rc::clone(updates);
        factory(move |ctx| {
            ctx.scene.add(SceneNode::new(
                name,
                NodeKind::Mesh {
                    geometry: Geometry::Circle { radius: 1.0, segments: 8 },
                    material: Material::default(),
                    cast_shadow: false,
                    receive_shadow: false,
                },
            ));
            Ok(Box::new(Counter { name, updates }))
        })
    }

    fn failing() -> SubsystemFactory {
        factory(|ctx| {
            ctx.assets.texture("missing")?;
            unreachable!()
        })
    }

    fn time() -> TimeState {
        TimeState {
            start: Duration::ZERO,
            current: Duration::from_millis(16),
            elapsed: Duration::from_millis(16),
            delta: Duration::from_millis(16),
            frame_index: 1,
        }
    }

    // ── compose ───────────────────────────────────────────────────────────

    #[test]
    fn update_before_compose_is_a_no_op() {
        let updates = Rc::new(Cell::new(0));
        let mut composer = SceneComposer::new(vec![counter("floor", &updates)]);
        let mut scene = Scene::new();

        composer.update(&time(), &mut scene);
        assert_eq!(updates.get(), 0);
        assert!(!composer.is_composed());
        assert!(scene.is_empty());
    }

    #[test]
    fn compose_builds_in_order_and_only_once() {
        let updates = Rc::new(Cell::new(0));
        let mut composer =
            SceneComposer::new(vec![counter("environment", &updates), counter("floor", &updates)]);
        let mut scene = Scene::new();
        let mut debug = DebugPanel::new(false);

        assert_eq!(composer.compose(&AssetStore::default(), &mut scene, &mut debug), 2);
        assert_eq!(composer.subsystem_names(), vec!["environment", "floor"]);

        assert_eq!(composer.compose(&AssetStore::default(), &mut scene, &mut debug), 0);
        assert_eq!(scene.len(), 2);

        composer.update(&time(), &mut scene);
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn failing_factory_is_skipped() {
        let updates = Rc::new(Cell::new(0));
        let mut composer = SceneComposer::new(vec![failing(), counter("fox", &updates)]);
        let mut scene = Scene::new();

        composer.compose(&AssetStore::default(), &mut scene, &mut DebugPanel::new(false));
        assert_eq!(composer.subsystem_names(), vec!["fox"]);
        assert!(composer.is_composed());
    }

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn attached_composer_builds_on_ready() {
        let textures = ManualRetriever::new(AssetKind::Texture);
        let manifest = Manifest::new(vec![AssetDescriptor::new("grass", AssetKind::Texture, "grass.jpg")]).unwrap();
        let mut loader = AssetLoader::new(manifest, vec![Box::new(textures.clone())]).unwrap();

        let updates = Rc::new(Cell::new(0));
        let composer = Rc::new(RefCell::new(SceneComposer::new(vec![counter("floor", &updates)])));
        let scene = Rc::new(RefCell::new(Scene::new()));
        let debug = Rc::new(RefCell::new(DebugPanel::new(false)));
        SceneComposer::attach(&composer, &mut loader, Rc::clone(&scene), debug).unwrap();
        assert!(loader.events().has_namespace(COMPOSER_NAMESPACE));

        loader.poll();
        assert!(!composer.borrow().is_composed());

        textures.take("grass.jpg").unwrap().resolve(Ok(Asset::Texture(Arc::new(Texture::new(1, 1, vec![0; 4])))));
        loader.poll();

        assert!(composer.borrow().is_composed());
        assert_eq!(scene.borrow().len(), 1);
    }

    #[test]
    fn detached_composer_never_builds() {
        let mut loader = AssetLoader::new(Manifest::default(), vec![]).unwrap();
        let composer = Rc::new(RefCell::new(SceneComposer::new(vec![])));
        SceneComposer::attach(
            &composer,
            &mut loader,
            Rc::new(RefCell::new(Scene::new())),
            Rc::new(RefCell::new(DebugPanel::new(false))),
        )
        .unwrap();

        loader.events_mut().off(".composer").unwrap();
        loader.poll();
        assert!(loader.is_ready());
        assert!(!composer.borrow().is_composed());
    }

    #[test]
    fn factories_can_read_assets() {
        let mut composer = SceneComposer::new(vec![factory(|ctx| {
            ctx.assets.texture("grass")?;
            Err(AssetError::Missing("never".into()))
        })]);
        let built = composer.compose(&AssetStore::default(), &mut Scene::new(), &mut DebugPanel::new(false));
        assert_eq!(built, 0);
    }
}
