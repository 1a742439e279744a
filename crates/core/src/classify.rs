//! The test-file classifier (spec.md §4.10): dispatch by extension to the
//! owning module's `IsTestFile`. Unrecognized extensions return `false`.

use crate::reader::ContentReader;
use crate::registry;
use std::path::Path;

pub fn is_test_file(path: &Path, reader: &dyn ContentReader) -> bool {
    let modules = registry::registry();
    match registry::module_for_path(&modules, path) {
        Some(module) => module.is_test_file(path, reader),
        None => false,
    }
}

/// Shared default: any path component equals one of `dirs`.
pub(crate) fn path_crosses_any_dir(path: &Path, dirs: &[&str]) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| dirs.contains(&s))
            .unwrap_or(false)
    })
}
