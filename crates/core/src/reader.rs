//! The sole I/O boundary the core crosses.
//!
//! Every byte the core ever looks at — source files, `go.mod`, supplemental
//! manifests — comes through a caller-supplied [`ContentReader`]. The core
//! never touches `std::fs` directly; this is what lets a caller serve
//! content from a working tree, a VCS snapshot, or an in-memory fixture
//! without the core knowing the difference.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure reading a path through a [`ContentReader`].
#[derive(Debug, Clone, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {message}")]
    NotFound { path: PathBuf, message: String },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// Caller-supplied capability mapping a path to bytes.
///
/// Implementations may be backed by the filesystem, a git blob store, or a
/// fixed in-memory map built for a test. The core may call `read` more than
/// once for the same path within a single build; a caller that cares about
/// that cost should add memoization in its own implementation.
pub trait ContentReader: Send + Sync {
    /// Read the full contents of `path`. Returns [`ReadError::NotFound`] when
    /// the path does not exist or cannot be read through this reader.
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError>;

    /// Convenience wrapper around [`ContentReader::read`] for text sources.
    fn read_to_string(&self, path: &Path) -> Result<String, ReadError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|_| ReadError::NotUtf8 {
            path: path.to_path_buf(),
        })
    }
}

/// A [`ContentReader`] backed directly by the local filesystem.
///
/// Provided as a convenience for callers (such as the CLI) that want to
/// point the core at a real working tree without writing their own
/// adapter. The core itself never constructs this type.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsContentReader;

impl ContentReader for FsContentReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        std::fs::read(path).map_err(|e| ReadError::NotFound {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// A [`ContentReader`] backed by a fixed in-memory map, for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryContentReader {
    files: std::collections::HashMap<PathBuf, Vec<u8>>,
}

impl MemoryContentReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl ContentReader for MemoryContentReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ReadError::NotFound {
                path: path.to_path_buf(),
                message: "not present in fixture".to_string(),
            })
    }
}
