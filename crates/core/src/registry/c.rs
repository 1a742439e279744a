//! C resolver (spec.md §4.7). Shares its include-resolution rule with
//! [`super::cpp`] — only the tree-sitter grammar and extension set differ.

use super::support::{extract_includes, read_source, resolve_quoted_include};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use std::path::{Path, PathBuf};

pub struct CModule;

impl LanguageModule for CModule {
    fn name(&self) -> &'static str {
        "c"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".c", ".h"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::Untested
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.ends_with("_test.c") || name.ends_with("_test.h")
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(CResolver { ctx, reader })
    }
}

struct CResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for CResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));
        let language: tree_sitter::Language = tree_sitter_c::LANGUAGE.into();

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
