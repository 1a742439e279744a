//! Java resolver (spec.md §4.4).
//!
//! Builds a package→files index and a package→type→files index over every
//! supplied `.java` file, then resolves each file's imports and bare
//! same-package references against them. Ambiguous type names (more than
//! one file defining the same name in the same scope) are silently
//! skipped, per spec.md §7 point 3.

use super::support::{read_source, referenced_type_identifiers};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::graph::DependencyGraph;
use crate::reader::ContentReader;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tree_sitter::Parser;

pub struct JavaModule;

impl LanguageModule for JavaModule {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".java"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::ActivelyTested
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.ends_with("Test.java")
            || name.ends_with("Tests.java")
            || path.to_string_lossy().replace('\\', "/").contains("/src/test/")
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(JavaResolver { ctx, reader })
    }
}

struct JavaResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

const STDLIB_PREFIXES: &[&str] = &["java.", "javax.", "kotlin.", "kotlinx.", "android."];

impl<'a> Resolver for JavaResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let index = PackageTypeIndex::build(self.ctx, self.reader, "java");
        let own_package = extract_package(&source).unwrap_or_default();
        let own_types = extract_top_level_type_names(&source);
        let referenced = referenced_type_identifiers(&source);

        let mut out = Vec::new();
        let mut satisfied: HashSet<String> = own_types.clone();

        for imp in extract_imports(&source) {
            if STDLIB_PREFIXES.iter().any(|p| imp.path.starts_with(p)) || imp.path == "System" {
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

        // Same-package fallback: referenced types not covered by an import
        // and not declared locally.
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

/// Package → (type name → defining files), shared shape for Java/Kotlin;
/// C# wraps this per `.csproj` scope instead of building one global index.
pub(crate) struct PackageTypeIndex {
    pub(crate) types: HashMap<String, HashMap<String, Vec<PathBuf>>>,
}

impl PackageTypeIndex {
    pub(crate) fn build(ctx: &Context, reader: &dyn ContentReader, language: &str) -> Self {
        Self::build_with(ctx, reader, language, extract_package, extract_top_level_type_names)
    }

    /// Same shape, but with caller-supplied package/type extractors — used
    /// by Kotlin, whose directive syntax differs from Java's.
    pub(crate) fn build_with(
        ctx: &Context,
        reader: &dyn ContentReader,
        language: &str,
        package_of: impl Fn(&str) -> Option<String>,
        type_names_of: impl Fn(&str) -> HashSet<String>,
    ) -> Self {
        let mut types: HashMap<String, HashMap<String, Vec<PathBuf>>> = HashMap::new();
        for file in ctx.files_for_language(language) {
            let Ok(source) = reader.read_to_string(file) else {
                continue;
            };
            let package = package_of(&source).unwrap_or_default();
            for type_name in type_names_of(&source) {
                types
                    .entry(package.clone())
                    .or_default()
                    .entry(type_name)
                    .or_default()
                    .push(file.clone());
            }
        }
        Self { types }
    }
}

struct JavaImport {
    path: String,
    is_wildcard: bool,
}

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap())
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([\w.]+)(\.\*)?\s*;").unwrap()
    })
}

fn type_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:class|interface|enum|record)\s+(\w+)").unwrap()
    })
}

/// Tree-sitter traversal first, regex fallback on a missing or unparsable
/// grammar result (spec.md §9 "tree-sitter + regex fallback").
pub(crate) fn extract_package(source: &str) -> Option<String> {
    extract_package_tree_sitter(source).or_else(|| package_re().captures(source).map(|c| c[1].to_string()))
}

fn extract_imports(source: &str) -> Vec<JavaImport> {
    if let Some(imports) = extract_imports_tree_sitter(source) {
        if !imports.is_empty() {
            return imports;
        }
    }
    import_re()
        .captures_iter(source)
        .map(|c| JavaImport {
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

fn java_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .ok()?;
    Some(parser)
}

fn extract_package_tree_sitter(source: &str) -> Option<String> {
    let mut parser = java_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let text = child.utf8_text(source.as_bytes()).ok()?;
            return Some(
                text.trim_start_matches("package")
                    .trim_end_matches(';')
                    .trim()
                    .to_string(),
            );
        }
    }
    None
}

fn extract_imports_tree_sitter(source: &str) -> Option<Vec<JavaImport>> {
    let mut parser = java_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut out = Vec::new();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let Ok(text) = child.utf8_text(source.as_bytes()) else {
            continue;
        };
        let body = text
            .trim_start_matches("import")
            .trim_end_matches(';')
            .trim()
            .trim_start_matches("static")
            .trim();
        let is_wildcard = body.ends_with(".*");
        let path = body.trim_end_matches(".*").to_string();
        out.push(JavaImport { path, is_wildcard });
    }
    Some(out)
}

const JAVA_TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

fn extract_top_level_type_names_tree_sitter(source: &str) -> Option<HashSet<String>> {
    let mut parser = java_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut names = HashSet::new();
    collect_type_names(&root, source, &mut names);
    Some(names)
}

fn collect_type_names(node: &tree_sitter::Node, source: &str, names: &mut HashSet<String>) {
    if JAVA_TYPE_DECL_KINDS.contains(&node.kind()) {
        if let Some(name_node) = node.child_by_field_name("name") {
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
    fn extracts_package_and_wildcard_import() {
        let src = "package com.example.models;\nimport com.example.util.*;\nclass Foo {}\n";
        assert_eq!(extract_package(src), Some("com.example.models".to_string()));
        let imports = extract_imports(src);
        assert_eq!(imports.len(), 1);
        assert!(imports[0].is_wildcard);
    }
}
