//! The global, read-only context built once before any resolver runs
//! (spec.md §3, §5).
//!
//! Every index here is immutable for the lifetime of one
//! [`crate::builder::build_dependency_graph`] call; resolvers borrow it
//! without locking.

use crate::registry::LanguageModule;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Context {
    supplied: HashSet<PathBuf>,
    by_dir: HashMap<PathBuf, Vec<PathBuf>>,
    by_language: HashMap<&'static str, Vec<PathBuf>>,
}

impl Context {
    pub fn build(paths: &[PathBuf], modules: &[Box<dyn LanguageModule>]) -> Self {
        let mut supplied = HashSet::with_capacity(paths.len());
        let mut by_dir: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();

        for path in paths {
            supplied.insert(path.clone());
            let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            by_dir.entry(dir).or_default().push(path.clone());
        }

        let mut by_language: HashMap<&'static str, Vec<PathBuf>> = HashMap::new();
        for path in paths {
            if let Some(module) = crate::registry::module_for_path(modules, path) {
                by_language.entry(module.name()).or_default().push(path.clone());
            }
        }

        Self {
            supplied,
            by_dir,
            by_language,
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.supplied.contains(path)
    }

    pub fn supplied(&self) -> impl Iterator<Item = &PathBuf> {
        self.supplied.iter()
    }

    pub fn supplied_len(&self) -> usize {
        self.supplied.len()
    }

    /// Files that live directly inside `dir` (not recursively).
    pub fn files_in_dir(&self, dir: &Path) -> &[PathBuf] {
        self.by_dir.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Supplied files claimed by the named language module.
    pub fn files_for_language(&self, name: &str) -> &[PathBuf] {
        self.by_language.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walk up from `dir`'s ancestors (including `dir` itself) looking for
    /// one that directly contains a supplied file whose name matches
    /// `predicate`. Used for `go.mod`/`.csproj`-style scope discovery
    /// without a directory-listing side channel: the supplied set is the
    /// only enumerable universe the core is given (spec.md §6).
    pub fn find_ancestor_with<'a>(
        &self,
        start_dir: &'a Path,
        mut predicate: impl FnMut(&Path) -> bool,
    ) -> Option<PathBuf> {
        let mut current = Some(start_dir);
        while let Some(dir) = current {
            if self.files_in_dir(dir).iter().any(|f| predicate(f)) {
                return Some(dir.to_path_buf());
            }
            current = dir.parent();
        }
        None
    }
}
