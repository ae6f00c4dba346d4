//! File-backed manifest handle.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::error::ManifestError;
use super::types::{Manifest, ManifestEntry};

/// An open manifest file together with its parsed contents.
///
/// The handle is held for the whole sync run. Every [`add_entry`] rewrites
/// the entire file (seek, truncate, write) so that the file on disk always
/// holds a complete JSON document covering every committed item.
/// Dropping the value releases the handle; [`close`] additionally flushes
/// and syncs it.
///
/// [`add_entry`]: ManifestFile::add_entry
/// [`close`]: ManifestFile::close
pub struct ManifestFile {
    file: File,
    path: PathBuf,
    manifest: Manifest,
}

impl std::fmt::Debug for ManifestFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestFile")
            .field("path", &self.path)
            .field("entries", &self.manifest.len())
            .finish_non_exhaustive()
    }
}

impl ManifestFile {
    /// Open the manifest at `path`, creating an empty file if it doesn't exist.
    pub async fn open(path: &Path) -> Result<Self, ManifestError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await
            .map_err(|e| ManifestError::io(path, e))?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .await
            .map_err(|e| ManifestError::io(path, e))?;

        let manifest = Manifest::from_json(&buffer).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(
            path = %path.display(),
            entries = manifest.len(),
            "Loaded manifest"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Upsert `entry` and persist the whole manifest immediately.
    pub async fn add_entry(&mut self, entry: ManifestEntry) -> Result<(), ManifestError> {
        self.manifest.upsert(entry);
        self.persist().await
    }

    async fn persist(&mut self) -> Result<(), ManifestError> {
        let bytes = self.manifest.to_json().map_err(ManifestError::Serialize)?;
        let path = &self.path;

        self.file
            .seek(SeekFrom::Start(0))
            .await
            .map_err(|e| ManifestError::io(path, e))?;
        self.file
            .set_len(0)
            .await
            .map_err(|e| ManifestError::io(path, e))?;
        self.file
            .write_all(&bytes)
            .await
            .map_err(|e| ManifestError::io(path, e))?;
        self.file
            .flush()
            .await
            .map_err(|e| ManifestError::io(path, e))?;
        Ok(())
    }

    /// Flush, sync, and release the backing file.
    pub async fn close(mut self) -> Result<(), ManifestError> {
        self.file
            .flush()
            .await
            .map_err(|e| ManifestError::io(&self.path, e))?;
        self.file
            .sync_all()
            .await
            .map_err(|e| ManifestError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "Closed manifest");
        Ok(())
    }
}
