//! Error types for the three failure modes spec'd for the core: fatal read
//! errors, non-fatal parse errors (recorded, never abort the build), and
//! resolution ambiguity (silently skipped, never surfaced as an error).

use crate::reader::ReadError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal error aborting a [`crate::builder::build_dependency_graph`] call.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read {0}")]
    Read(#[from] ReadError),

    #[error("path could not be made absolute: {0}")]
    InvalidPath(PathBuf),
}

/// A resolver-local failure. `Read` is a genuine content-reader failure on a
/// supplied source file (missing, unreadable, not UTF-8) and is fatal —
/// the builder maps it straight onto [`BuildError::Read`] and aborts
/// (spec.md §7 point 1). `ParseFailed` is a tree-sitter/regex parse failure
/// local to one file; it is never fatal — the builder records it as a
/// diagnostic and that file simply contributes no edges (spec.md §7 point 2).
#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("failed to parse imports in {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// A non-fatal diagnostic surfaced alongside a successfully built graph.
#[derive(Debug, Clone)]
pub struct BuildDiagnostic {
    pub file: PathBuf,
    pub message: String,
}

impl BuildDiagnostic {
    pub fn new(file: PathBuf, message: impl Into<String>) -> Self {
        Self {
            file,
            message: message.into(),
        }
    }
}
