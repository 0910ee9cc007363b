use std::fmt;
use std::path::PathBuf;

use super::manifest::AssetKind;

/// Errors raised while validating a manifest, retrieving an asset or reading
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The manifest source could not be parsed.
    Manifest(String),
    /// Two descriptors share a name.
    DuplicateName(String),
    /// A descriptor has an empty name.
    EmptyName,
    /// The manifest needs a kind nobody can retrieve.
    NoRetriever(AssetKind),
    /// Two retrievers were registered for the same kind.
    DuplicateRetriever(AssetKind),
    /// Reading a file failed.
    Io { path: PathBuf, message: String },
    /// A file was read but could not be decoded.
    Decode { path: PathBuf, message: String },
    /// No asset with that name is in the store.
    Missing(String),
    /// The asset exists but is of another kind.
    WrongKind { name: String, expected: AssetKind, found: AssetKind },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Manifest(msg) => write!(f, "invalid asset manifest: {msg}"),
            AssetError::DuplicateName(name) => write!(f, "duplicate asset name `{name}`"),
            AssetError::EmptyName => write!(f, "asset descriptor with an empty name"),
            AssetError::NoRetriever(kind) => write!(f, "no retriever registered for {kind}"),
            AssetError::DuplicateRetriever(kind) => {
                write!(f, "more than one retriever registered for {kind}")
            }
            AssetError::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            AssetError::Decode { path, message } => {
                write!(f, "failed to decode {}: {message}", path.display())
            }
            AssetError::Missing(name) => write!(f, "asset `{name}` is not loaded"),
            AssetError::WrongKind { name, expected, found } => {
                write!(f, "asset `{name}` is a {found}, expected a {expected}")
            }
        }
    }
}

impl std::error::Error for AssetError {}
