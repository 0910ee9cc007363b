//! Asset manifest, retrieval and the loader that signals readiness.
//!
//! Flow:
//! 1. a [`Manifest`] of named, typed descriptors is declared up front
//! 2. [`AssetLoader::new`] dispatches every descriptor to the [`Retriever`]
//!    registered for its kind (one retriever per kind)
//! 3. retrievers finish in any order and hand results to a [`Completion`]
//! 4. [`AssetLoader::poll`] runs on the owning thread, fills the
//!    [`AssetStore`] and publishes `"progress"`, `"failed"` and, exactly once,
//!    `"ready"`
//!
//! Readiness counts resolutions, not successes: a failed descriptor still
//! resolves, and is reported through `"failed"` and
//! [`AssetLoader::failures`].

mod decode;
mod error;
mod loader;
mod manifest;
mod resource;
mod retrieve;
mod store;

pub use decode::{decode_model, decode_panorama, decode_texture};
pub use error::AssetError;
pub use loader::{AssetEvent, AssetLoader, LoaderConfig};
pub use manifest::{AssetDescriptor, AssetKind, Manifest};
pub use resource::{AnimationClip, Asset, MeshInfo, Model, Panorama, Texture};
pub use retrieve::{Completion, ManualRetriever, Retriever, ThreadedRetriever};
pub use store::AssetStore;
