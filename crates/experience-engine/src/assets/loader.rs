use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};
use indexmap::IndexMap;

use crate::events::{EventHub, EventName};

use super::error::AssetError;
use super::manifest::{AssetKind, Manifest};
use super::retrieve::{Completion, CompletionMsg, Retriever, ThreadedRetriever};
use super::store::AssetStore;

/// Base directories for the standard retrievers.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Plain and panoramic textures.
    pub textures_dir: PathBuf,
    /// glTF models.
    pub models_dir: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            textures_dir: PathBuf::from("assets/textures"),
            models_dir: PathBuf::from("assets/models"),
        }
    }
}

impl LoaderConfig {
    /// Builds one threaded retriever per kind used by `manifest`.
    pub fn retrievers_for(&self, manifest: &Manifest) -> Vec<Box<dyn Retriever>> {
        manifest
            .kinds()
            .into_iter()
            .map(|kind| -> Box<dyn Retriever> {
                match kind {
                    AssetKind::Texture => Box::new(ThreadedRetriever::textures(&self.textures_dir)),
                    AssetKind::RgbeTexture => {
                        Box::new(ThreadedRetriever::panoramas(&self.textures_dir))
                    }
                    AssetKind::GltfModel => Box::new(ThreadedRetriever::models(&self.models_dir)),
                }
            })
            .collect()
    }
}

/// Events published by [`AssetLoader`].
#[derive(Debug, Clone)]
pub enum AssetEvent {
    /// One descriptor resolved (successfully or not).
    Progress { name: String, loaded: usize, to_load: usize },
    /// A descriptor resolved with an error.
    Failed { name: String, error: AssetError },
    /// Every descriptor resolved. Carries a snapshot of the store.
    Ready(AssetStore),
}

impl EventName for AssetEvent {
    fn event_name(&self) -> &'static str {
        match self {
            AssetEvent::Progress { .. } => "progress",
            AssetEvent::Failed { .. } => "failed",
            AssetEvent::Ready(_) => "ready",
        }
    }
}

/// Loads a manifest and reports readiness exactly once.
///
/// Dispatch happens in [`new`](Self::new); results are only observed in
/// [`poll`](Self::poll), so subscribers registered right after construction
/// never miss an event.
pub struct AssetLoader {
    manifest: Manifest,
    retrievers: HashMap<AssetKind, Box<dyn Retriever>>,

    sender: Sender<CompletionMsg>,
    receiver: Receiver<CompletionMsg>,

    store: AssetStore,
    resolved: HashSet<String>,
    failures: IndexMap<String, AssetError>,

    to_load: usize,
    loaded: usize,
    ready_fired: bool,

    events: EventHub<AssetEvent>,
}

impl AssetLoader {
    /// Validates the retriever set against the manifest, then dispatches every
    /// descriptor.
    pub fn new(manifest: Manifest, retrievers: Vec<Box<dyn Retriever>>) -> Result<Self, AssetError> {
        let mut by_kind: HashMap<AssetKind, Box<dyn Retriever>> = HashMap::new();
        for retriever in retrievers {
            let kind = retriever.kind();
            if by_kind.insert(kind, retriever).is_some() {
                return Err(AssetError::DuplicateRetriever(kind));
            }
        }

        if let Some(kind) = manifest.kinds().into_iter().find(|k| !by_kind.contains_key(k)) {
            return Err(AssetError::NoRetriever(kind));
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        let to_load = manifest.len();

        let loader = Self {
            manifest,
            retrievers: by_kind,
            sender,
            receiver,
            store: AssetStore::default(),
            resolved: HashSet::new(),
            failures: IndexMap::new(),
            to_load,
            loaded: 0,
            ready_fired: false,
            events: EventHub::new(),
        };

        loader.dispatch();
        Ok(loader)
    }

    fn dispatch(&self) {
        for descriptor in self.manifest.iter() {
            // Presence was checked in `new`.
            if let Some(retriever) = self.retrievers.get(&descriptor.kind) {
                log::debug!("loading `{}` ({}) from {}", descriptor.name, descriptor.kind, descriptor.path);
                let done = Completion::new(descriptor.name.clone(), self.sender.clone());
                retriever.fetch(&descriptor.path, done);
            }
        }
    }

    /// Drains finished retrievals. Returns how many were accepted.
    pub fn poll(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(msg) = self.receiver.try_recv() {
            if self.accept(msg) {
                accepted += 1;
            }
        }

        // An empty manifest is ready as soon as anyone asks.
        self.fire_ready_if_complete();
        accepted
    }

    fn accept(&mut self, msg: CompletionMsg) -> bool {
        let CompletionMsg { name, result } = msg;

        let Some(expected) = self.manifest.get(&name).map(|d| d.kind) else {
            log::warn!("ignoring completion for `{name}`: not in the manifest");
            return false;
        };

        if !self.resolved.insert(name.clone()) {
            log::warn!("ignoring duplicate completion for `{name}`");
            return false;
        }

        let result = result.and_then(|asset| {
            if asset.kind() == expected {
                Ok(asset)
            } else {
                Err(AssetError::WrongKind { name: name.clone(), expected, found: asset.kind() })
            }
        });

        match result {
            Ok(asset) => self.store.insert(name.clone(), asset),
            Err(error) => {
                log::warn!("asset `{name}` failed: {error}");
                self.failures.insert(name.clone(), error.clone());
                let failed = AssetEvent::Failed { name: name.clone(), error };
                let _ = self.events.trigger(failed.event_name(), &failed);
            }
        }

        self.loaded += 1;
        log::debug!("asset `{name}` resolved ({}/{})", self.loaded, self.to_load);

        let progress = AssetEvent::Progress { name, loaded: self.loaded, to_load: self.to_load };
        let _ = self.events.trigger(progress.event_name(), &progress);

        self.fire_ready_if_complete();
        true
    }

    fn fire_ready_if_complete(&mut self) {
        if self.ready_fired || self.loaded != self.to_load {
            return;
        }
        self.ready_fired = true;

        if self.failures.is_empty() {
            log::info!("all {} assets loaded", self.to_load);
        } else {
            log::warn!(
                "assets resolved with {} failure(s) out of {}",
                self.failures.len(),
                self.to_load
            );
        }

        let ready = AssetEvent::Ready(self.store.clone());
        let _ = self.events.trigger(ready.event_name(), &ready);
    }

    #[inline]
    pub fn to_load(&self) -> usize {
        self.to_load
    }

    #[inline]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// True once `"ready"` has fired.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready_fired
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn items(&self) -> &AssetStore {
        &self.store
    }

    /// Descriptors that resolved with an error, in resolution order.
    pub fn failures(&self) -> &IndexMap<String, AssetError> {
        &self.failures
    }

    pub fn events(&self) -> &EventHub<AssetEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventHub<AssetEvent> {
        &mut self.events
    }
}
