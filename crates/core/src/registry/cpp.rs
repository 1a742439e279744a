//! C++ resolver (spec.md §4.7). See [`super::c`] for the shared
//! include-resolution logic; the include-extension set and ancestor search
//! are heuristic, as spec.md §9's open questions note — there is no
//! equivalent of a compiler `-I` path here.

use super::support::{extract_includes, read_source, resolve_quoted_include};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use std::path::{Path, PathBuf};

pub struct CppModule;

impl LanguageModule for CppModule {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".cpp", ".cc", ".cxx", ".hpp", ".hh", ".hxx"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::Untested
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.contains("_test.") || name.contains(".test.")
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(CppResolver { ctx, reader })
    }
}

struct CppResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for CppResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));
        let language: tree_sitter::Language = tree_sitter_cpp::LANGUAGE.into();

        let mut out = Vec::new();
        for include in extract_includes(&source, &language) {
            if include.is_system {
                continue;
            }
            for candidate in resolve_quoted_include(self.ctx, dir, &include.path) {
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        Ok(out)
    }
}
