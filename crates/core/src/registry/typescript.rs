//! TypeScript / TSX resolver (spec.md §4.5).
//!
//! `.js`/`.jsx` themselves are the JavaScript stub module's territory —
//! this module only parses `.ts`/`.tsx` sources, but its resolution
//! candidates may land on `.js`/`.jsx` files that are already part of the
//! supplied set.

use super::support::{join_normalize, read_source};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::graph::DependencyGraph;
use crate::import::{Import, ImportKind};
use crate::reader::ContentReader;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tree_sitter::Parser;

pub struct TypeScriptModule;

impl LanguageModule for TypeScriptModule {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".tsx"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::Stable
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        is_js_family_test_file(path)
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(TypeScriptResolver { ctx, reader })
    }
}

/// Shared by the JavaScript stub module, whose `is_test_file` is identical
/// (spec.md §4.10).
pub(crate) fn is_js_family_test_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let base_matches = ["test", "spec"]
        .iter()
        .any(|marker| name.contains(&format!(".{marker}.")));
    base_matches || crate::classify::path_crosses_any_dir(path, &["__tests__"])
}

struct TypeScriptResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

const RESOLUTION_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];
const INDEX_CANDIDATES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx"];

impl<'a> Resolver for TypeScriptResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));

        let mut out = Vec::new();
        for import in classify_specifiers(extract_specifiers(&source)) {
            if import.kind != ImportKind::Internal {
                continue;
            }
            let base = join_normalize(dir, &import.path);
            for candidate in self.candidates(&base) {
                if self.ctx.contains(&candidate) && !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        Ok(out)
    }
}

impl<'a> TypeScriptResolver<'a> {
    fn candidates(&self, base: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        if base.extension().is_some() && self.ctx.contains(base) {
            out.push(base.to_path_buf());
            return out;
        }
        for ext in RESOLUTION_EXTENSIONS {
            let candidate = super::support::append_extension(base, ext);
            if self.ctx.contains(&candidate) {
                out.push(candidate);
            }
        }
        for name in INDEX_CANDIDATES {
            let candidate = base.join(name);
            if self.ctx.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

const NODE_BUILTINS: &[&str] = &[
    "fs", "path", "http", "https", "os", "crypto", "util", "events", "stream", "url", "assert",
    "child_process", "net", "buffer", "querystring", "zlib",
];

fn is_node_builtin(spec: &str) -> bool {
    NODE_BUILTINS.contains(&spec)
}

/// Classify every extracted specifier per spec.md §4.5. Only `Internal`
/// imports go on to produce edges; the others are kept on the `Import`
/// value for a caller that wants the full picture (e.g. a future formatter
/// distinguishing `NodeBuiltin` from `External`).
fn classify_specifiers(specs: Vec<RawSpecifier>) -> Vec<Import> {
    specs
        .into_iter()
        .map(|raw| {
            let kind = if raw.path.starts_with("node:") || is_node_builtin(&raw.path) {
                ImportKind::NodeBuiltin
            } else if raw.path.starts_with("./") || raw.path.starts_with("../") {
                ImportKind::Internal
            } else {
                ImportKind::External
            };
            let is_relative = raw.path.starts_with("./") || raw.path.starts_with("../");
            let mut import = Import::new(raw.path, kind);
            if is_relative {
                import = import.relative();
            }
            if raw.is_type_only {
                import = import.type_only();
            }
            import
        })
        .collect()
}

struct RawSpecifier {
    path: String,
    is_type_only: bool,
}

fn import_from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(import|export)(\s+type)?\b[^;'"]*\sfrom\s+['"]([^'"]+)['"]"#)
            .unwrap()
    })
}

fn bare_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#).unwrap())
}

fn extract_specifiers(source: &str) -> Vec<RawSpecifier> {
    if let Some(specs) = extract_via_tree_sitter(source) {
        if !specs.is_empty() {
            return specs;
        }
    }
    let mut out: Vec<RawSpecifier> = import_from_re()
        .captures_iter(source)
        .map(|c| RawSpecifier {
            path: c[3].to_string(),
            is_type_only: c.get(2).is_some(),
        })
        .collect();
    out.extend(bare_import_re().captures_iter(source).map(|c| RawSpecifier {
        path: c[1].to_string(),
        is_type_only: false,
    }));
    out
}

fn extract_via_tree_sitter(source: &str) -> Option<Vec<RawSpecifier>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut out = Vec::new();

    for child in root.children(&mut cursor) {
        if !matches!(child.kind(), "import_statement" | "export_statement") {
            continue;
        }
        let Some(source_node) = child.child_by_field_name("source") else {
            continue;
        };
        let Ok(text) = source_node.utf8_text(source.as_bytes()) else {
            continue;
        };
        let is_type_only = child
            .child(1)
            .map(|n| n.kind() == "type")
            .unwrap_or(false);
        out.push(RawSpecifier {
            path: text.trim_matches(|c| c == '\'' || c == '"').to_string(),
            is_type_only,
        });
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_relative_import_specifier() {
        let src = "import {Button} from \"./Button\";\n";
        let specs = extract_specifiers(src);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].path, "./Button");
        assert!(!specs[0].is_type_only);
    }

    #[test]
    fn type_only_import_is_flagged_but_still_classified_internal() {
        let src = "import type { Props } from \"./Props\";\n";
        let imports = classify_specifiers(extract_specifiers(src));
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].kind, ImportKind::Internal);
        assert!(imports[0].is_type_only);
    }

    #[test]
    fn test_file_matches_dot_test_dot_extension() {
        assert!(is_js_family_test_file(Path::new("/repo/App.test.tsx")));
        assert!(is_js_family_test_file(Path::new("/repo/__tests__/App.tsx")));
        assert!(!is_js_family_test_file(Path::new("/repo/App.tsx")));
    }
}
