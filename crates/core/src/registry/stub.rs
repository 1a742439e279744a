//! Extension-only stub modules (spec.md §1, §2): Python, Rust, Swift, and
//! JavaScript are registered purely so their files become graph nodes and
//! route to the right `IsTestFile` default; they extract no imports at all.
//! (TypeScript resolvers may still point *at* `.js`/`.jsx` files — see
//! [`super::typescript`].)

use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::graph::DependencyGraph;
use crate::reader::ContentReader;
use std::path::{Path, PathBuf};

struct NoopResolver;

impl Resolver for NoopResolver {
    fn resolve_project_imports(
        &self,
        _abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        Ok(Vec::new())
    }

    fn finalize_graph(&self, _graph: &mut DependencyGraph) {}
}

macro_rules! stub_module {
    ($name:ident, $display:literal, $exts:expr, $is_test:expr) => {
        pub struct $name;

        impl LanguageModule for $name {
            fn name(&self) -> &'static str {
                $display
            }

            fn extensions(&self) -> &'static [&'static str] {
                $exts
            }

            fn maturity(&self) -> Maturity {
                Maturity::Untested
            }

            fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
                ($is_test)(path)
            }

            fn make_resolver<'a>(
                &self,
                _ctx: &'a Context,
                _reader: &'a dyn ContentReader,
            ) -> Box<dyn Resolver + 'a> {
                Box::new(NoopResolver)
            }
        }
    };
}

fn python_test(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.starts_with("test_") || name.ends_with("_test.py")
}

fn rust_test(path: &Path) -> bool {
    path.to_string_lossy().replace('\\', "/").contains("/tests/")
}

fn swift_test(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with("Tests.swift"))
        .unwrap_or(false)
}

stub_module!(PythonModule, "python", &[".py"], python_test);
stub_module!(RustModule, "rust", &[".rs"], rust_test);
stub_module!(SwiftModule, "swift", &[".swift"], swift_test);
stub_module!(
    JavaScriptModule,
    "javascript",
    &[".js", ".jsx"],
    super::typescript::is_js_family_test_file
);
