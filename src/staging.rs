//! # Staging Area Module
//!
//! Questo modulo gestisce i file temporanei su disco per le operazioni di
//! compressione.
//!
//! ## Responsabilità:
//! - Alloca path univoci (nomi random, mai contatori sequenziali) sotto una
//!   root directory pre-validata
//! - Persiste byte di input su disco e rilegge i risultati
//! - Garantisce la cancellazione di ogni file allocato su ogni percorso di
//!   uscita (successo, errore gestito, panic)
//!
//! ## Ciclo di vita:
//! `allocate()` restituisce una [`StagedFile`] guard: la release esplicita
//! copre il percorso felice, il `Drop` copre tutti gli altri. Nessun file
//! temporaneo sopravvive all'operazione che lo ha creato, quindi la root
//! resta vuota tra una chiamata e l'altra anche sotto alta concorrenza.
//!
//! ## Esempio:
//! ```no_run
//! use simple_media_compress::{CompressError, StagingArea};
//!
//! # async fn demo(bytes: &[u8]) -> Result<(), CompressError> {
//! let staging = StagingArea::new("/tmp/media-staging")?;
//! let staged = staging.allocate(".mp4")?;
//! staging.persist(staged.path(), bytes).await?;
//! let result = staging.harvest(staged.path()).await?;
//! staged.release().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::CompressError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Allocates and tears down uniquely named temp files under a fixed root
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at an existing directory.
    ///
    /// Fails fast with a configuration error if the root does not exist;
    /// nothing is written to the filesystem in that case.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CompressError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CompressError::Configuration(format!(
                "staging root must be an existing directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// The validated root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a unique temp file with the given suffix (e.g. ".mp4").
    ///
    /// The name is randomized by `tempfile`, so concurrent callers against
    /// the same root never collide. The returned guard owns the path and
    /// deletes it when released or dropped.
    pub fn allocate(&self, suffix: &str) -> Result<StagedFile, CompressError> {
        let temp = tempfile::Builder::new()
            .prefix("stage-")
            .suffix(suffix)
            .tempfile_in(&self.root)?;
        // Detach from tempfile's own auto-delete: the StagedFile guard owns
        // cleanup from here on.
        let (_handle, path) = temp.keep().map_err(|e| CompressError::Io(e.error))?;
        debug!("Allocated staged file: {}", path.display());
        Ok(StagedFile {
            path,
            released: false,
        })
    }

    /// Write bytes to a staged path.
    pub async fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), CompressError> {
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Read the full contents of a staged path.
    pub async fn harvest(&self, path: &Path) -> Result<Vec<u8>, CompressError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(bytes)
    }
}

/// Guard for one allocated temp path.
///
/// Owned exclusively by the operation that created it; the file is removed
/// on explicit [`release`](StagedFile::release) or, failing that, on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file. A missing file is a silent no-op.
    pub async fn release(mut self) -> Result<(), CompressError> {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Released staged file: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        "Failed to clean up staged file {}: {}",
                        self.path.display(),
                        e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_fails_without_writes() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = StagingArea::new(&missing);
        assert!(matches!(result, Err(CompressError::Configuration(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn test_allocate_unique_paths() {
        let temp_dir = TempDir::new().unwrap();
        let staging = StagingArea::new(temp_dir.path()).unwrap();

        let a = staging.allocate(".mp4").unwrap();
        let b = staging.allocate(".mp4").unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(temp_dir.path()));
        assert!(a.path().to_string_lossy().ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_persist_harvest_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let staging = StagingArea::new(temp_dir.path()).unwrap();

        let staged = staging.allocate(".bin").unwrap();
        staging.persist(staged.path(), b"payload").await.unwrap();
        let bytes = staging.harvest(staged.path()).await.unwrap();
        assert_eq!(bytes, b"payload");

        staged.release().await.unwrap();
        assert!(std::fs::read_dir(staging.root()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_release_missing_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let staging = StagingArea::new(temp_dir.path()).unwrap();

        let staged = staging.allocate(".tmp").unwrap();
        std::fs::remove_file(staged.path()).unwrap();
        assert!(staged.release().await.is_ok());
    }

    #[test]
    fn test_drop_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let staging = StagingArea::new(temp_dir.path()).unwrap();

        let path = {
            let staged = staging.allocate(".tmp").unwrap();
            staged.path().to_path_buf()
        };

        assert!(!path.exists());
    }
}
