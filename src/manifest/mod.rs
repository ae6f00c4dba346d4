//! Persistent sync manifest.
//!
//! The manifest remembers, per Workshop item, the remote metadata that was
//! current when its files were last downloaded. Comparing it against freshly
//! resolved metadata is how the sync engine decides what is stale:
//! - Pure data model ([`Manifest`], [`ManifestEntry`]) with no I/O
//! - A scoped file handle ([`ManifestFile`]) that owns the backing JSON file
//!   and rewrites it in full after every committed item

pub mod error;
pub mod file;
pub mod types;

pub use file::ManifestFile;
pub use types::{Manifest, ManifestEntry};
