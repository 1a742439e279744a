//! Go resolver (spec.md §4.3).
//!
//! Two subsystems: cross-package resolution driven by `go.mod` plus
//! symbol-level filtering of the resulting package directory, and an
//! intra-package `FinalizeGraph` pass that links siblings purely by
//! defined/referenced free identifiers, independent of imports.

use super::support::{join_normalize, read_source};
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

pub struct GoModule;

impl LanguageModule for GoModule {
    fn name(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::ActivelyTested
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with("_test.go"))
            .unwrap_or(false)
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(GoResolver { ctx, reader })
    }
}

/// Export info for one non-test file of a package (spec.md §3).
struct GoExportInfo {
    file: PathBuf,
    exported: HashSet<String>,
}

/// Defined/referenced free-identifier info for one file, used only by the
/// intra-package finalize pass (spec.md §3).
struct GoSymbolInfo {
    file: PathBuf,
    is_test: bool,
    defined: HashSet<String>,
    referenced: HashSet<String>,
}

struct GoResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for GoResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));

        let mut out = Vec::new();

        if let Some((module_root, module_path)) = self.find_module(dir) {
            let imports = extract_imports(&source);
            let refs = extract_alias_references(&source);

            for imp in &imports {
                let Some(suffix) = internal_suffix(&module_path, &imp.path) else {
                    continue;
                };
                let package_dir = if suffix.is_empty() {
                    module_root.clone()
                } else {
                    module_root.join(suffix)
                };
                if package_dir == dir {
                    continue;
                }

                let candidates = self.package_candidates(&package_dir);
                let alias = imp.alias.clone().unwrap_or_else(|| last_segment(&imp.path));
                let used = refs.get(&alias);

                let export_index = self.export_index(&candidates);
                for candidate in &candidates {
                    let keep = match used {
                        Some(names) if !names.is_empty() && !export_index.is_empty() => {
                            export_index
                                .get(candidate)
                                .map(|exported| exported.iter().any(|n| names.contains(n)))
                                .unwrap_or(false)
                        }
                        _ => true,
                    };
                    if keep && !out.contains(candidate) {
                        out.push(candidate.clone());
                    }
                }
            }
        }

        for embed_target in self.resolve_embeds(&source, dir) {
            if !out.contains(&embed_target) {
                out.push(embed_target);
            }
        }

        Ok(out)
    }

    /// Intra-package edges: link siblings by defined/referenced free
    /// identifiers alone, regardless of imports (spec.md §4.3, §8).
    fn finalize_graph(&self, graph: &mut DependencyGraph) {
        let mut by_dir: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
        for path in self.ctx.files_for_language("go") {
            let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            by_dir.entry(dir).or_default().push(path.clone());
        }

        for files in by_dir.values() {
            if files.len() < 2 {
                continue;
            }
            let mut infos = Vec::new();
            for file in files {
                let Ok(source) = self.reader.read_to_string(file) else {
                    continue;
                };
                let defined = top_level_defined_names(&source);
                let referenced = referenced_free_identifiers(&source, &defined);
                let is_test = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with("_test.go"))
                    .unwrap_or(false);
                infos.push(GoSymbolInfo {
                    file: file.clone(),
                    is_test,
                    defined,
                    referenced,
                });
            }

            for a in &infos {
                for b in &infos {
                    if a.file == b.file {
                        continue;
                    }
                    if !a.is_test && b.is_test {
                        continue;
                    }
                    if b.defined.iter().any(|name| a.referenced.contains(name)) {
                        graph.add_edge(a.file.clone(), b.file.clone());
                    }
                }
            }
        }
    }
}

impl<'a> GoResolver<'a> {
    fn find_module(&self, start_dir: &Path) -> Option<(PathBuf, String)> {
        let root = self
            .ctx
            .find_ancestor_with(start_dir, |f| f.file_name().map(|n| n == "go.mod").unwrap_or(false))?;
        let gomod = root.join("go.mod");
        let contents = self.reader.read_to_string(&gomod).ok()?;
        let module_path = contents.lines().find_map(|line| {
            let line = line.trim();
            line.strip_prefix("module ").map(|m| m.trim().to_string())
        })?;
        Some((root, module_path))
    }

    /// Supplied `.go` files in `package_dir`, applying the test/CGO
    /// exclusion rules of spec.md §4.3.
    fn package_candidates(&self, package_dir: &Path) -> Vec<PathBuf> {
        self.ctx
            .files_in_dir(package_dir)
            .iter()
            .filter(|f| {
                let name = f.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if name.ends_with("_test.go") {
                    return false;
                }
                if name.ends_with(".go") {
                    return true;
                }
                // CGO-adjacent non-Go sources are kept when the import
                // crosses directories (spec.md §4.3).
                name.ends_with(".c") || name.ends_with(".h")
            })
            .cloned()
            .collect()
    }

    fn export_index(&self, candidates: &[PathBuf]) -> HashMap<PathBuf, HashSet<String>> {
        let mut index = HashMap::new();
        for file in candidates {
            if !file.extension().map(|e| e == "go").unwrap_or(false) {
                continue;
            }
            let Ok(source) = self.reader.read_to_string(file) else {
                continue;
            };
            let exported: HashSet<String> = top_level_defined_names(&source)
                .into_iter()
                .filter(|n| n.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
                .collect();
            index.insert(file.clone(), exported);
        }
        index
    }

    fn resolve_embeds(&self, source: &str, dir: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for line in source.lines() {
            let Some(rest) = line.trim_start().strip_prefix("//go:embed") else {
                continue;
            };
            for pattern in rest.split_whitespace() {
                let pattern = pattern.strip_prefix("all:").unwrap_or(pattern);
                if pattern.contains('*') || pattern.contains('?') {
                    let Ok(glob) = glob::Pattern::new(pattern) else {
                        continue;
                    };
                    for candidate in self.ctx.files_in_dir(dir) {
                        if let Some(name) = candidate.file_name().and_then(|n| n.to_str()) {
                            if glob.matches(name) {
                                out.push(candidate.clone());
                            }
                        }
                    }
                } else {
                    let candidate = join_normalize(dir, pattern);
                    if self.ctx.contains(&candidate) {
                        out.push(candidate);
                    }
                }
            }
        }
        out
    }
}

struct GoImport {
    path: String,
    alias: Option<String>,
}

fn import_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(?:(\w+)\s+)?"([^"]+)"\s*$"#).unwrap()
    })
}

fn import_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?s)import\s*\(\s*(.*?)\)"#).unwrap())
}

fn single_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*import\s+(?:(\w+)\s+)?"([^"]+)"\s*$"#).unwrap())
}

/// Extract import paths via tree-sitter, falling back to a regex scan of
/// `import (...)` blocks and single-line `import "..."` statements.
fn extract_imports(source: &str) -> Vec<GoImport> {
    if let Some(imports) = extract_imports_tree_sitter(source) {
        if !imports.is_empty() {
            return imports;
        }
    }

    let mut out = Vec::new();
    for caps in import_block_re().captures_iter(source) {
        for line_caps in import_line_re().captures_iter(&caps[1]) {
            out.push(GoImport {
                alias: line_caps.get(1).map(|m| m.as_str().to_string()),
                path: line_caps[2].to_string(),
            });
        }
    }
    for caps in single_import_re().captures_iter(source) {
        out.push(GoImport {
            alias: caps.get(1).map(|m| m.as_str().to_string()),
            path: caps[2].to_string(),
        });
    }
    out
}

fn extract_imports_tree_sitter(source: &str) -> Option<Vec<GoImport>> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut out = Vec::new();

    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut ic = child.walk();
        for inner in child.children(&mut ic) {
            match inner.kind() {
                "import_spec" => collect_import_spec(&inner, source, &mut out),
                "import_spec_list" => {
                    let mut lc = inner.walk();
                    for spec in inner.children(&mut lc) {
                        if spec.kind() == "import_spec" {
                            collect_import_spec(&spec, source, &mut out);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Some(out)
}

fn collect_import_spec(node: &tree_sitter::Node, source: &str, out: &mut Vec<GoImport>) {
    let Some(path_node) = node.child_by_field_name("path") else {
        return;
    };
    let Ok(raw) = path_node.utf8_text(source.as_bytes()) else {
        return;
    };
    let path = raw.trim_matches('"').to_string();
    let alias = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|s| s.to_string());
    out.push(GoImport { path, alias });
}

fn internal_suffix(module_path: &str, import_path: &str) -> Option<String> {
    if import_path == module_path {
        return Some(String::new());
    }
    import_path
        .strip_prefix(module_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|s| s.to_string())
}

fn last_segment(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

fn alias_selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z_]\w*)\.([A-Za-z_]\w*)\b").unwrap())
}

/// `alias -> {selector names}` built from every `alias.Selector` occurrence
/// in the source (spec.md §4.3 "qualified-reference map").
fn extract_alias_references(source: &str) -> HashMap<String, HashSet<String>> {
    let mut map: HashMap<String, HashSet<String>> = HashMap::new();
    for caps in alias_selector_re().captures_iter(source) {
        map.entry(caps[1].to_string())
            .or_default()
            .insert(caps[2].to_string());
    }
    map
}

const GO_BUILTINS: &[&str] = &[
    "len", "cap", "make", "new", "append", "copy", "delete", "panic", "recover", "print",
    "println", "close", "complex", "real", "imag", "nil", "true", "false", "iota", "error",
    "string", "bool", "byte", "rune", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128",
    "any", "comparable",
];

fn toplevel_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(?:func\s+(\w+)\s*\(|type\s+(\w+)\b|var\s+(\w+)\b|const\s+(\w+)\b)")
            .unwrap()
    })
}

/// Top-level defined names: functions without a receiver, types, vars,
/// consts (spec.md §3 `GoSymbolInfo`). Methods (`func (r T) Name()`) are
/// intentionally excluded — they are not referenced as free identifiers.
fn top_level_defined_names(source: &str) -> HashSet<String> {
    let cleaned = super::support::strip_comments_and_strings(source);
    toplevel_decl_re()
        .captures_iter(&cleaned)
        .filter_map(|c| c.get(1).or(c.get(2)).or(c.get(3)).or(c.get(4)))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\b").unwrap())
}

fn referenced_free_identifiers(source: &str, defined: &HashSet<String>) -> HashSet<String> {
    let cleaned = super::support::strip_comments_and_strings(source);
    identifier_re()
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|name| !defined.contains(*name) && !GO_BUILTINS.contains(name))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_suffix_strips_module_prefix() {
        assert_eq!(
            internal_suffix("importtest", "importtest/pkg"),
            Some("pkg".to_string())
        );
        assert_eq!(internal_suffix("importtest", "fmt"), None);
    }

    #[test]
    fn embed_glob_matches_simple_star() {
        let pattern = glob::Pattern::new("*.txt").unwrap();
        assert!(pattern.matches("a.txt"));
        assert!(!pattern.matches("a.md"));
    }

    #[test]
    fn top_level_defined_names_skips_methods() {
        let src = "func Helper() {}\nfunc (r Receiver) Method() {}\ntype User struct{}\n";
        let names = top_level_defined_names(src);
        assert!(names.contains("Helper"));
        assert!(names.contains("User"));
        assert!(!names.contains("Method"));
    }
}
