//! File discovery with gitignore-aware filtering.
//!
//! Uses the `ignore` crate (from ripgrep) so `.gitignore`, `.ignore`, and
//! `.git/info/exclude` are respected without the caller re-implementing
//! glob semantics.

use anyhow::Result;
use depgraph_core::registry;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Discover every file under `root` whose extension is claimed by a
/// registered language module, respecting `.gitignore` and any extra
/// `ignore_patterns` from `depgraph.toml`.
///
/// Returns absolute paths; order follows the underlying directory walk and
/// is not itself meaningful (the core treats input order as irrelevant to
/// the resulting graph).
pub fn discover_files(root: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let root = root.canonicalize()?;
    let modules = registry::registry();
    let extensions = registry::registered_extensions(&modules);

    let mut builder = WalkBuilder::new(&root);
    builder.hidden(true).git_ignore(true).git_global(true).git_exclude(true);

    if !ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(&root);
        for pattern in ignore_patterns {
            let glob = if pattern.ends_with('/') {
                format!("!{pattern}**")
            } else {
                format!("!{pattern}")
            };
            overrides.add(&glob)?;
        }
        builder.overrides(overrides.build()?);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        let Some(ext) = registry::extension_of(&path) else {
            continue;
        };
        if extensions.contains(&ext.as_str()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
