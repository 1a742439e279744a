//! Dart resolver (spec.md §4.2).
//!
//! Parses `import`/`export`/`part` directives via tree-sitter with a regex
//! fallback, classifies each URI as `dart:` (standard library), `package:`
//! (external), or project-relative, and resolves only the latter.

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

pub struct DartModule;

impl LanguageModule for DartModule {
    fn name(&self) -> &'static str {
        "dart"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".dart"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::BasicTests
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        crate::classify::path_crosses_any_dir(path, &["test"])
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(DartResolver { ctx, reader })
    }
}

struct DartResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for DartResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));

        let mut out = Vec::new();
        for import in classify_uris(extract_directive_uris(&source)) {
            if import.kind != ImportKind::ProjectUri {
                continue;
            }
            let mut candidate = join_normalize(dir, &import.path);
            if candidate.extension().is_none() {
                candidate.set_extension("dart");
            }
            if self.ctx.contains(&candidate) && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        Ok(out)
    }
}

fn classify_uris(uris: Vec<String>) -> Vec<Import> {
    uris.into_iter()
        .map(|uri| {
            let kind = if uri.starts_with("dart:") {
                ImportKind::StandardLibrary
            } else if uri.starts_with("package:") {
                ImportKind::PackageUri
            } else {
                ImportKind::ProjectUri
            };
            let mut import = Import::new(uri, kind);
            if import.kind == ImportKind::ProjectUri {
                import = import.relative();
            }
            import
        })
        .collect()
}

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(?:import|export|part(?:\s+of)?)\s+['"]([^'"]+)['"]"#).unwrap()
    })
}

/// Tree-sitter traversal, falling back to a line-oriented regex scan when
/// the grammar finds nothing (malformed source, or a grammar/version drift
/// in node names — spec.md §7 point 2).
fn extract_directive_uris(source: &str) -> Vec<String> {
    if let Some(uris) = extract_via_tree_sitter(source) {
        if !uris.is_empty() {
            return uris;
        }
    }
    directive_regex()
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect()
}

fn extract_via_tree_sitter(source: &str) -> Option<Vec<String>> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_dart::language()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut uris = Vec::new();

    for child in root.children(&mut cursor) {
        match child.kind() {
            "import_or_export" | "library_import" | "library_export" | "part_directive" => {
                collect_uri(&child, source, &mut uris);
            }
            _ => {}
        }
    }
    Some(uris)
}

fn collect_uri(node: &tree_sitter::Node, source: &str, uris: &mut Vec<String>) {
    if node.kind() == "uri" || node.kind() == "string_literal" {
        if let Ok(text) = node.utf8_text(source.as_bytes()) {
            uris.push(text.trim_matches(|c| c == '\'' || c == '"').to_string());
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_uri(&child, source, uris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_fallback_extracts_relative_import() {
        let src = "import 'models/u.dart';\nimport 'dart:core';\n";
        let uris = directive_regex()
            .captures_iter(src)
            .map(|c| c[1].to_string())
            .collect::<Vec<_>>();
        assert_eq!(uris, vec!["models/u.dart".to_string(), "dart:core".to_string()]);
    }
}
