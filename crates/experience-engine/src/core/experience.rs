use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::assets::{AssetEvent, AssetLoader, Manifest, Retriever};
use crate::camera::{CameraRig, PerspectiveCamera};
use crate::debug::DebugPanel;
use crate::input::InputEvent;
use crate::render::{RenderBackend, RenderSettings, RenderTarget};
use crate::scene::{Scene, SceneComposer, SubsystemFactory};
use crate::time::{Clock, FrameOutcome, FrameScheduler, StopHandle, TimeSource, TimeState};
use crate::viewport::{HostWindow, Viewport, ViewportTracker, DEFAULT_PIXEL_RATIO_CAP};

use super::app::{App, AppControl};
use super::error::ExperienceError;

/// Namespace of the root's own subscriptions.
pub const EXPERIENCE_NAMESPACE: &str = "experience";

/// Settings for [`Experience::new`].
#[derive(Debug, Clone)]
pub struct ExperienceConfig {
    /// Builds the debug panel's widgets. Without it no folder is ever created.
    pub debug: bool,
    pub pixel_ratio_cap: f32,
    pub camera: PerspectiveCamera,
    pub settings: RenderSettings,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            debug: false,
            pixel_ratio_cap: DEFAULT_PIXEL_RATIO_CAP,
            camera: PerspectiveCamera::default(),
            settings: RenderSettings::default(),
        }
    }
}

/// Composition root.
///
/// Built once by `main` and handed to the runtime. Viewport `"resize"`
/// resizes the render target; clock `"tick"` updates the camera, then the
/// subsystems, then draws. A fatal render error stops the clock.
pub struct Experience<B: RenderBackend + 'static> {
    viewport: ViewportTracker,
    clock: Clock,
    loader: AssetLoader,
    target: Rc<RefCell<RenderTarget<B>>>,
    scene: Rc<RefCell<Scene>>,
    composer: Rc<RefCell<SceneComposer>>,
    debug: Rc<RefCell<DebugPanel>>,
}

impl<B: RenderBackend + 'static> Experience<B> {
    /// Wires every component and starts loading `manifest`.
    pub fn new(
        config: ExperienceConfig,
        host: Box<dyn HostWindow>,
        time_source: Box<dyn TimeSource>,
        backend: B,
        manifest: Manifest,
        retrievers: Vec<Box<dyn Retriever>>,
        factories: Vec<SubsystemFactory>,
    ) -> Result<Self, ExperienceError> {
        let mut viewport = ViewportTracker::new(host, config.pixel_ratio_cap);
        let debug = Rc::new(RefCell::new(DebugPanel::new(config.debug)));
        let scene = Rc::new(RefCell::new(Scene::new()));

        let target = RenderTarget::new(
            backend,
            CameraRig::new(config.camera),
            config.settings,
            viewport.viewport(),
        );
        target.add_debug(&mut debug.borrow_mut());
        let target = Rc::new(RefCell::new(target));

        let mut clock = Clock::new(time_source);
        let mut loader = AssetLoader::new(manifest, retrievers)?;
        log::info!("loading {} asset(s)", loader.to_load());

        let composer = Rc::new(RefCell::new(SceneComposer::new(factories)));
        SceneComposer::attach(&composer, &mut loader, Rc::clone(&scene), Rc::clone(&debug))?;

        loader.events_mut().on(
            &format!("progress.{EXPERIENCE_NAMESPACE}"),
            |ev: &AssetEvent| {
                if let AssetEvent::Progress { name, loaded, to_load } = ev {
                    log::debug!("asset `{name}` resolved ({loaded}/{to_load})");
                }
            },
        )?;

        {
            let target = Rc::clone(&target);
            viewport.events_mut().on(
                &format!("resize.{EXPERIENCE_NAMESPACE}"),
                move |vp: &Viewport| target.borrow_mut().resize(vp),
            )?;
        }

        {
            let target = Rc::clone(&target);
            let composer = Rc::clone(&composer);
            let scene = Rc::clone(&scene);
            let stop = clock.stop_handle();
            clock.events_mut().on(
                &format!("tick.{EXPERIENCE_NAMESPACE}"),
                move |time: &TimeState| {
                    target.borrow_mut().update(time);
                    composer.borrow_mut().update(time, &mut scene.borrow_mut());
                    if target.borrow_mut().render(&scene.borrow()).is_err() {
                        log::error!("stopping the frame loop after a fatal render error");
                        stop.stop();
                    }
                },
            )?;
        }

        Ok(Self { viewport, clock, loader, target, scene, composer, debug })
    }

    /// Arms the first frame.
    pub fn start(&self, scheduler: &mut dyn FrameScheduler) {
        self.clock.start(scheduler);
    }

    /// Runs one scheduled frame: drain finished loads, then tick.
    pub fn frame(&mut self, scheduler: &mut dyn FrameScheduler) -> AppControl {
        self.loader.poll();
        match self.clock.on_frame(scheduler) {
            FrameOutcome::Ticked => AppControl::Continue,
            FrameOutcome::Stopped => AppControl::Exit,
        }
    }

    /// Host resize notification.
    pub fn handle_resize(&mut self) {
        self.viewport.handle_host_resize();
    }

    /// Debug panel first, then the camera rig.
    pub fn handle_input(&mut self, event: &InputEvent) -> AppControl {
        if self.debug.borrow_mut().handle_input(event) {
            return AppControl::Continue;
        }
        self.target.borrow_mut().handle_input(event);
        AppControl::Continue
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.clock.stop_handle()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn time(&self) -> TimeState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    pub fn composer(&self) -> Ref<'_, SceneComposer> {
        self.composer.borrow()
    }

    pub fn render_target(&self) -> Ref<'_, RenderTarget<B>> {
        self.target.borrow()
    }

    pub fn debug(&self) -> Ref<'_, DebugPanel> {
        self.debug.borrow()
    }
}

impl<B: RenderBackend + 'static> App for Experience<B> {
    fn on_start(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.start(scheduler);
    }

    fn on_resize(&mut self) {
        self.handle_resize();
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        self.handle_input(event)
    }

    fn on_frame(&mut self, scheduler: &mut dyn FrameScheduler) -> AppControl {
        self.frame(scheduler)
    }
}
