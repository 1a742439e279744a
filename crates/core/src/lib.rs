//! Polyglot static dependency-graph core.
//!
//! Given a bag of source files drawn from one repository, resolves
//! inter-file "project" dependencies per supported language and returns a
//! file-to-files directed graph restricted to the supplied set. The only
//! capabilities this crate consumes are a [`reader::ContentReader`] and a
//! list of supplied paths; everything else — discovery, VCS decoration,
//! rendering — lives outside this crate.

pub mod builder;
pub mod classify;
pub mod context;
pub mod error;
pub mod graph;
pub mod import;
pub mod reader;
pub mod registry;

pub use builder::{build_dependency_graph, BuildOutcome};
pub use classify::is_test_file;
pub use context::Context;
pub use error::{BuildDiagnostic, BuildError, ResolveError};
pub use graph::{find_path_nodes, DependencyGraph, EdgeAnnotation, FileDependencyGraph, FileMetadata};
pub use import::{Import, ImportKind};
pub use reader::{ContentReader, FsContentReader, MemoryContentReader, ReadError};
pub use registry::{registry, LanguageModule, Maturity, Resolver};

/// Crate version, exposed for diagnostics and UI display only.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
