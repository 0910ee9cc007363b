use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crossbeam_channel::Sender;

use super::decode::{decode_model, decode_panorama, decode_texture};
use super::error::AssetError;
use super::manifest::AssetKind;
use super::resource::Asset;

/// Result of one retrieval, sent back to the loader.
pub(crate) struct CompletionMsg {
    pub name: String,
    pub result: Result<Asset, AssetError>,
}

/// Completion callback handed to a retriever for one descriptor.
///
/// Safe to call from any thread. Resolving more than once is tolerated: the
/// loader ignores every resolution after the first.
#[derive(Clone)]
pub struct Completion {
    name: String,
    sender: Sender<CompletionMsg>,
}

impl Completion {
    pub(crate) fn new(name: String, sender: Sender<CompletionMsg>) -> Self {
        Self { name, sender }
    }

    /// Descriptor name this completion belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&self, result: Result<Asset, AssetError>) {
        let msg = CompletionMsg { name: self.name.clone(), result };
        if self.sender.send(msg).is_err() {
            log::debug!("asset loader gone; dropping result for `{}`", self.name);
        }
    }
}

/// Retrieval mechanism for one asset kind.
///
/// `fetch` is fire-and-forget: it must return promptly and resolve `done`
/// later, from whatever thread finishes the work.
pub trait Retriever {
    fn kind(&self) -> AssetKind;

    fn fetch(&self, path: &str, done: Completion);
}

type DecodeFn = fn(&Path) -> Result<Asset, AssetError>;

/// Decodes each fetch on its own worker thread.
pub struct ThreadedRetriever {
    kind: AssetKind,
    base: PathBuf,
    decode: DecodeFn,
}

impl ThreadedRetriever {
    pub fn new(kind: AssetKind, base: impl Into<PathBuf>, decode: DecodeFn) -> Self {
        Self { kind, base: base.into(), decode }
    }

    pub fn textures(base: impl Into<PathBuf>) -> Self {
        Self::new(AssetKind::Texture, base, decode_texture)
    }

    pub fn panoramas(base: impl Into<PathBuf>) -> Self {
        Self::new(AssetKind::RgbeTexture, base, decode_panorama)
    }

    pub fn models(base: impl Into<PathBuf>) -> Self {
        Self::new(AssetKind::GltfModel, base, decode_model)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Retriever for ThreadedRetriever {
    fn kind(&self) -> AssetKind {
        self.kind
    }

    fn fetch(&self, path: &str, done: Completion) {
        let full = self.base.join(path);
        let decode = self.decode;
        let worker = done.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("asset:{}", done.name()))
            .spawn(move || worker.resolve(decode(&full)));

        if let Err(e) = spawned {
            done.resolve(Err(AssetError::Io {
                path: self.base.join(path),
                message: format!("could not start loader thread: {e}"),
            }));
        }
    }
}

struct PendingFetch {
    path: String,
    completion: Completion,
}

/// Retriever that queues fetches for the caller to resolve in any order.
///
/// Clones share the queue, so a test keeps one clone and gives the other to
/// the loader.
#[derive(Clone)]
pub struct ManualRetriever {
    kind: AssetKind,
    queue: Rc<RefCell<Vec<PendingFetch>>>,
}

impl ManualRetriever {
    pub fn new(kind: AssetKind) -> Self {
        Self { kind, queue: Rc::new(RefCell::new(Vec::new())) }
    }

    /// Paths fetched and not yet taken.
    pub fn pending_paths(&self) -> Vec<String> {
        self.queue.borrow().iter().map(|p| p.path.clone()).collect()
    }

    /// Removes and returns the completion for `path`.
    pub fn take(&self, path: &str) -> Option<Completion> {
        let mut queue = self.queue.borrow_mut();
        let index = queue.iter().position(|p| p.path == path)?;
        Some(queue.remove(index).completion)
    }
}

impl Retriever for ManualRetriever {
    fn kind(&self) -> AssetKind {
        self.kind
    }

    fn fetch(&self, path: &str, done: Completion) {
        self.queue.borrow_mut().push(PendingFetch { path: path.to_string(), completion: done });
    }
}
