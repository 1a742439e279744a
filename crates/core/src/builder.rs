//! The graph builder (orchestrator) — spec.md §4.8.
//!
//! Sequential, single-pass over the supplied paths (spec.md §5): normalize
//! → build context → instantiate one resolver per module → resolve every
//! file → finalize each resolver in registry order → return.
//!
//! Unlike the teacher's `ParserDispatcher::parse_files_parallel`, the
//! per-file resolve loop here is a plain sequential walk: spec.md §5 states
//! the core's scheduling model explicitly ("no implicit parallelism... a
//! purely sequential walk over the supplied paths"), so the teacher's
//! `rayon`-parallel shape is not carried over for this phase. `FinalizeGraph`
//! is likewise strictly sequential, one resolver at a time, in registry
//! order.

use crate::context::Context;
use crate::error::{BuildDiagnostic, BuildError, ResolveError};
use crate::graph::DependencyGraph;
use crate::reader::ContentReader;
use crate::registry::{self, LanguageModule};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Result of one `build_dependency_graph` call: the graph plus any
/// non-fatal per-file diagnostics collected along the way (spec.md §7).
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub graph: DependencyGraph,
    pub diagnostics: Vec<BuildDiagnostic>,
}

/// Build the dependency graph for `paths`, using `reader` as the sole I/O
/// boundary.
///
/// `paths` may be relative or absolute; they are normalized (not
/// canonicalized — the core does not touch the filesystem) against the
/// current directory before use. Order is irrelevant to the final graph.
pub fn build_dependency_graph(
    paths: &[PathBuf],
    reader: &dyn ContentReader,
) -> Result<BuildOutcome, BuildError> {
    let normalized = normalize_all(paths)?;
    debug!(files = normalized.len(), "building dependency graph");

    let modules = registry::registry();
    let ctx = Context::build(&normalized, &modules);

    let mut graph = DependencyGraph::new();
    for path in &normalized {
        graph.ensure_node(path.clone());
    }

    let mut diagnostics = Vec::new();

    // Phase 1: resolve every file's out-edges, one file at a time, in
    // supplied order (spec.md §5: "a purely sequential walk").
    for path in &normalized {
        let Some(ext) = registry::extension_of(path) else {
            continue;
        };
        let Some(module) = registry::module_for_path(&modules, path) else {
            continue;
        };
        let resolver = module.make_resolver(&ctx, reader);
        trace!(file = %path.display(), language = module.name(), "resolving imports");
        match resolver.resolve_project_imports(path, path, &ext) {
            Ok(targets) => {
                for target in targets {
                    if ctx.contains(&target) {
                        graph.add_edge(path.clone(), target);
                    }
                }
            }
            // A genuine read failure is fatal and aborts the whole build
            // (spec.md §7 point 1); a parse failure is recorded and the
            // file simply contributes no edges (spec.md §7 point 2).
            Err(ResolveError::Read(read_err)) => {
                return Err(BuildError::Read(read_err));
            }
            Err(err @ ResolveError::ParseFailed { .. }) => {
                let message = err.to_string();
                warn!(file = %path.display(), %message, "failed to parse imports");
                diagnostics.push(BuildDiagnostic::new(path.clone(), message));
            }
        }
    }

    // Phase 2: finalize passes, strictly sequential, registry order.
    for module in &modules {
        let resolver = module.make_resolver(&ctx, reader);
        resolver.finalize_graph(&mut graph);
    }

    Ok(BuildOutcome { graph, diagnostics })
}

fn normalize_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BuildError> {
    let cwd = std::env::current_dir().unwrap_or_default();
    paths
        .iter()
        .map(|p| normalize_one(&cwd, p))
        .collect()
}

fn normalize_one(cwd: &Path, path: &Path) -> Result<PathBuf, BuildError> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if abs.as_os_str().is_empty() {
        return Err(BuildError::InvalidPath(path.to_path_buf()));
    }
    Ok(normalize_lexically(&abs))
}

/// Collapse `.`/`..` components without touching the filesystem (the core
/// never canonicalizes — spec.md §6 "no environment dependencies").
fn normalize_lexically(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryContentReader;

    #[test]
    fn unsupported_extension_is_a_leaf() {
        let reader = MemoryContentReader::new().with_file("/repo/README.md", "hi");
        let outcome =
            build_dependency_graph(&[PathBuf::from("/repo/README.md")], &reader).unwrap();
        assert_eq!(outcome.graph.node_count(), 1);
        assert!(outcome.graph.edges_of(Path::new("/repo/README.md")).is_empty());
    }

    #[test]
    fn every_supplied_path_becomes_a_node() {
        let reader = MemoryContentReader::new()
            .with_file("/repo/a.rb", "")
            .with_file("/repo/b.rb", "");
        let outcome = build_dependency_graph(
            &[PathBuf::from("/repo/a.rb"), PathBuf::from("/repo/b.rb")],
            &reader,
        )
        .unwrap();
        assert_eq!(outcome.graph.node_count(), 2);
    }
}
