//! The `Import` entity from the data model: a single import/reference
//! directive extracted from a source file, tagged with a language-specific
//! classification, before cross-file resolution decides whether it yields
//! an edge.

use serde::{Deserialize, Serialize};

/// How an import's target was classified by its owning language module.
///
/// Classification happens at extraction time and may be provisional — e.g.
/// Go import paths are only known to be `Internal` once the module's
/// `go.mod` prefix is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportKind {
    /// Part of the language's standard library — never an edge.
    StandardLibrary,
    /// A third-party / registry package outside the supplied set.
    External,
    /// Resolves to a file within the supplied set.
    Internal,
    /// A Node.js built-in module (`fs`, `node:fs`, …).
    NodeBuiltin,
    /// `#include <...>` — angle-bracket system header.
    SystemInclude,
    /// `#include "..."` — quoted, project-relative header.
    LocalInclude,
    /// Dart `package:` URI.
    PackageUri,
    /// Dart project-relative `import`/`export`/`part` URI.
    ProjectUri,
}

/// A single import/reference directive as it appeared in source, before
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Raw path/specifier text as written in source.
    pub path: String,
    pub kind: ImportKind,
    pub is_wildcard: bool,
    pub is_relative: bool,
    pub is_type_only: bool,
}

impl Import {
    pub fn new(path: impl Into<String>, kind: ImportKind) -> Self {
        Self {
            path: path.into(),
            kind,
            is_wildcard: false,
            is_relative: false,
            is_type_only: false,
        }
    }

    pub fn wildcard(mut self) -> Self {
        self.is_wildcard = true;
        self
    }

    pub fn relative(mut self) -> Self {
        self.is_relative = true;
        self
    }

    pub fn type_only(mut self) -> Self {
        self.is_type_only = true;
        self
    }
}
