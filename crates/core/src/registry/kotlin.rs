//! Kotlin resolver (spec.md §4.4), same shared design as Java: a
//! package→type→files index, symbol-directed wildcard/specific import
//! resolution, same-package fallback, and ambiguity-skip.

use super::java::PackageTypeIndex;
use super::support::{read_source, referenced_type_identifiers};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tree_sitter::Parser;

pub struct KotlinModule;

impl LanguageModule for KotlinModule {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".kt", ".kts"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::ActivelyTested
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.ends_with("Test.kt") || name.ends_with("Tests.kt")
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(KotlinResolver { ctx, reader })
    }
}

struct KotlinResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

const STDLIB_PREFIXES: &[&str] = &["kotlin.", "kotlinx.", "java.", "javax.", "android."];

impl<'a> Resolver for KotlinResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let index = PackageTypeIndex::build_with(
            self.ctx,
            self.reader,
            "kotlin",
            extract_package,
            extract_top_level_type_names,
        );
        let own_package = extract_package(&source).unwrap_or_default();
        let own_types = extract_top_level_type_names(&source);
        let referenced = referenced_type_identifiers(&source);

        let mut out = Vec::new();
        let mut satisfied: HashSet<String> = own_types.clone();

        for imp in extract_imports(&source) {
            if STDLIB_PREFIXES.iter().any(|p| imp.path.starts_with(p)) {
                continue;
            }
            if imp.is_wildcard {
                let Some(types) = index.types.get(&imp.path) else {
                    continue;
                };
                for (type_name, files) in types {
                    if !referenced.contains(type_name) {
                        continue;
                    }
                    satisfied.insert(type_name.clone());
                    if files.len() == 1 && files[0] != abs_path {
                        push_unique(&mut out, files[0].clone());
                    }
                }
            } else {
                let Some((pkg, type_name)) = imp.path.rsplit_once('.') else {
                    continue;
                };
                satisfied.insert(type_name.to_string());
                if !referenced.contains(type_name) {
                    continue;
                }
                let Some(files) = index.types.get(pkg).and_then(|t| t.get(type_name)) else {
                    continue;
                };
                if files.len() == 1 && files[0] != abs_path {
                    push_unique(&mut out, files[0].clone());
                }
            }
        }

        if let Some(siblings) = index.types.get(&own_package) {
            for type_name in &referenced {
                if satisfied.contains(type_name) {
                    continue;
                }
                let Some(files) = siblings.get(type_name) else {
                    continue;
                };
                if files.len() == 1 && files[0] != abs_path {
                    push_unique(&mut out, files[0].clone());
                }
            }
        }

        Ok(out)
    }
}

fn push_unique(out: &mut Vec<PathBuf>, path: PathBuf) {
    if !out.contains(&path) {
        out.push(path);
    }
}

struct KotlinImport {
    path: String,
    is_wildcard: bool,
}

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*$").unwrap())
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+([\w.]+)(\.\*)?(?:\s+as\s+\w+)?\s*$").unwrap())
}

fn type_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:class|interface|object|enum\s+class|typealias)\s+(\w+)").unwrap()
    })
}

/// Tree-sitter first, regex fallback (spec.md §9) — the `tree-sitter-kotlin-ng`
/// grammar's node names are less battle-tested in this crate than Java's, so
/// an empty or unparsable tree-sitter result always defers to the regex scan
/// rather than reporting "no package"/"no imports".
pub(crate) fn extract_package(source: &str) -> Option<String> {
    extract_package_tree_sitter(source).or_else(|| package_re().captures(source).map(|c| c[1].to_string()))
}

fn extract_imports(source: &str) -> Vec<KotlinImport> {
    if let Some(imports) = extract_imports_tree_sitter(source) {
        if !imports.is_empty() {
            return imports;
        }
    }
    import_re()
        .captures_iter(source)
        .map(|c| KotlinImport {
            path: c[1].to_string(),
            is_wildcard: c.get(2).is_some(),
        })
        .collect()
}

pub(crate) fn extract_top_level_type_names(source: &str) -> HashSet<String> {
    if let Some(names) = extract_top_level_type_names_tree_sitter(source) {
        if !names.is_empty() {
            return names;
        }
    }
    let cleaned = super::support::strip_comments_and_strings(source);
    type_decl_re()
        .captures_iter(&cleaned)
        .map(|c| c[1].to_string())
        .collect()
}

fn kotlin_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_kotlin_ng::LANGUAGE.into())
        .ok()?;
    Some(parser)
}

fn extract_package_tree_sitter(source: &str) -> Option<String> {
    let mut parser = kotlin_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_header" {
            let text = child.utf8_text(source.as_bytes()).ok()?;
            return Some(text.trim_start_matches("package").trim().to_string());
        }
    }
    None
}

/// The grammar's `import` node is `"import" qualified_identifier
/// ("." "*")? ("as" identifier)?` — no trailing semicolon, unlike Java.
fn extract_imports_tree_sitter(source: &str) -> Option<Vec<KotlinImport>> {
    let mut parser = kotlin_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut out = Vec::new();
    for child in root.children(&mut cursor) {
        if child.kind() != "import" {
            continue;
        }
        let mut parts = Vec::new();
        let mut is_wildcard = false;
        let mut ic = child.walk();
        for inner in child.children(&mut ic) {
            match inner.kind() {
                "qualified_identifier" => {
                    let mut qc = inner.walk();
                    for ident in inner.children(&mut qc) {
                        if ident.kind() == "identifier" {
                            if let Ok(text) = ident.utf8_text(source.as_bytes()) {
                                parts.push(text.to_string());
                            }
                        }
                    }
                }
                "*" => is_wildcard = true,
                _ => {}
            }
        }
        if !parts.is_empty() {
            out.push(KotlinImport {
                path: parts.join("."),
                is_wildcard,
            });
        }
    }
    Some(out)
}

const KOTLIN_TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "object_declaration",
    "type_alias",
];

fn extract_top_level_type_names_tree_sitter(source: &str) -> Option<HashSet<String>> {
    let mut parser = kotlin_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut names = HashSet::new();
    collect_type_names(&root, source, &mut names);
    Some(names)
}

fn collect_type_names(node: &tree_sitter::Node, source: &str, names: &mut HashSet<String>) {
    if KOTLIN_TYPE_DECL_KINDS.contains(&node.kind()) {
        if let Some(name_node) = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("identifier"))
        {
            if let Ok(text) = name_node.utf8_text(source.as_bytes()) {
                names.insert(text.to_string());
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_type_names(&child, source, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_import_only_edges_referenced_type() {
        let src = "package com.example\nimport com.example.models.*\nclass Main { val p: Product }\n";
        let imports = extract_imports(src);
        assert_eq!(imports.len(), 1);
        assert!(imports[0].is_wildcard);
        assert_eq!(imports[0].path, "com.example.models");
        assert!(referenced_type_identifiers(src).contains("Product"));
    }
}
