//! C# resolver (spec.md §4.4), scoped by nearest ancestor `.csproj`
//! (spec.md §4.4 "C# scoping", glossary "Scope").
//!
//! Unlike Java/Kotlin, C# has no wildcard import syntax — every `using`
//! directive behaves like a Kotlin wildcard import: it brings a whole
//! namespace into scope, and only referenced types within it produce
//! edges.

use super::support::{read_source, referenced_type_identifiers};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tree_sitter::Parser;

pub struct CSharpModule;

impl LanguageModule for CSharpModule {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".cs"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::BasicTests
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.ends_with("Tests.cs") || name.ends_with("Test.cs")
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(CSharpResolver { ctx, reader })
    }
}

struct CSharpResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for CSharpResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));
        let scope = self.project_scope(dir);
        let own_namespace = extract_namespace(&source).unwrap_or_default();
        let own_types = extract_top_level_type_names(&source);
        let referenced = referenced_type_identifiers(&source);

        let index = self.scoped_type_index(&scope);

        let mut out = Vec::new();
        let mut satisfied: HashSet<String> = own_types.clone();

        for ns in extract_usings(&source) {
            let Some(types) = index.get(&ns) else {
                continue;
            };
            for name in &referenced {
                if satisfied.contains(name) {
                    continue;
                }
                let Some(files) = types.get(name) else {
                    continue;
                };
                if files.len() == 1 && files[0] != abs_path {
                    satisfied.insert(name.clone());
                    push_unique(&mut out, files[0].clone());
                }
            }
        }

        if let Some(types) = index.get(&own_namespace) {
            for name in &referenced {
                if satisfied.contains(name) {
                    continue;
                }
                let Some(files) = types.get(name) else {
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

impl<'a> CSharpResolver<'a> {
    /// The nearest ancestor directory containing a `.csproj`. When no file
    /// in the whole supplied set carries one — no project structure at all
    /// — every `.cs` file shares one implicit scope (the empty path)
    /// rather than being isolated to its own directory; scoping exists to
    /// separate *actual* sibling `.csproj` roots (spec.md §4.4), not to
    /// block ordinary same-repo resolution in a project with no `.csproj`.
    fn project_scope(&self, dir: &Path) -> PathBuf {
        self.ctx
            .find_ancestor_with(dir, |f| {
                f.extension().map(|e| e == "csproj").unwrap_or(false)
            })
            .unwrap_or_default()
    }

    fn scoped_type_index(&self, scope: &Path) -> HashMap<String, HashMap<String, Vec<PathBuf>>> {
        let mut index: HashMap<String, HashMap<String, Vec<PathBuf>>> = HashMap::new();
        for file in self.ctx.files_for_language("csharp") {
            let file_dir = file.parent().unwrap_or_else(|| Path::new(""));
            if self.project_scope(file_dir) != scope {
                continue;
            }
            let Ok(source) = self.reader.read_to_string(file) else {
                continue;
            };
            let namespace = extract_namespace(&source).unwrap_or_default();
            for type_name in extract_top_level_type_names(&source) {
                index
                    .entry(namespace.clone())
                    .or_default()
                    .entry(type_name)
                    .or_default()
                    .push(file.clone());
            }
        }
        index
    }
}

fn push_unique(out: &mut Vec<PathBuf>, path: PathBuf) {
    if !out.contains(&path) {
        out.push(path);
    }
}

fn namespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*namespace\s+([\w.]+)\s*[{;]").unwrap())
}

fn using_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*using\s+(?:static\s+)?([\w.]+)\s*;").unwrap())
}

fn type_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:class|interface|struct|enum|record|delegate)\s+(\w+)").unwrap()
    })
}

/// Tree-sitter first, regex fallback (spec.md §9). Handles both classic
/// block-scoped `namespace App { ... }` and the C# 10 file-scoped
/// `namespace App;` form, since `tree-sitter-c-sharp` models them as
/// distinct node kinds.
fn extract_namespace(source: &str) -> Option<String> {
    extract_namespace_tree_sitter(source).or_else(|| namespace_re().captures(source).map(|c| c[1].to_string()))
}

fn extract_usings(source: &str) -> Vec<String> {
    if let Some(usings) = extract_usings_tree_sitter(source) {
        if !usings.is_empty() {
            return usings;
        }
    }
    using_re()
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect()
}

fn extract_top_level_type_names(source: &str) -> HashSet<String> {
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

fn csharp_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .ok()?;
    Some(parser)
}

fn extract_namespace_tree_sitter(source: &str) -> Option<String> {
    let mut parser = csharp_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut found = None;
    find_namespace(&root, source, &mut found);
    found
}

fn find_namespace(node: &tree_sitter::Node, source: &str, found: &mut Option<String>) {
    if found.is_some() {
        return;
    }
    if matches!(
        node.kind(),
        "namespace_declaration" | "file_scoped_namespace_declaration"
    ) {
        if let Some(name_node) = node.child_by_field_name("name") {
            if let Ok(text) = name_node.utf8_text(source.as_bytes()) {
                *found = Some(text.to_string());
                return;
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        find_namespace(&child, source, found);
    }
}

fn extract_usings_tree_sitter(source: &str) -> Option<Vec<String>> {
    let mut parser = csharp_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut out = Vec::new();
    for child in root.children(&mut cursor) {
        if child.kind() != "using_directive" {
            continue;
        }
        let Ok(text) = child.utf8_text(source.as_bytes()) else {
            continue;
        };
        let name = text
            .trim_start_matches("using")
            .trim_end_matches(';')
            .trim()
            .trim_start_matches("static")
            .trim();
        if !name.is_empty() {
            out.push(name.to_string());
        }
    }
    Some(out)
}

const CSHARP_TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "struct_declaration",
    "enum_declaration",
    "record_declaration",
    "delegate_declaration",
];

fn extract_top_level_type_names_tree_sitter(source: &str) -> Option<HashSet<String>> {
    let mut parser = csharp_parser()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut names = HashSet::new();
    collect_type_names(&root, source, &mut names);
    Some(names)
}

fn collect_type_names(node: &tree_sitter::Node, source: &str, names: &mut HashSet<String>) {
    if CSHARP_TYPE_DECL_KINDS.contains(&node.kind()) {
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
    fn extracts_namespace_and_usings() {
        let src = "using Lib.Core;\n\nnamespace App {\n  class Program { Logger l; FileLogger f; }\n}\n";
        assert_eq!(extract_usings(src), vec!["Lib.Core".to_string()]);
        assert_eq!(extract_namespace(src), Some("App".to_string()));
        let refs = referenced_type_identifiers(src);
        assert!(refs.contains("Logger"));
        assert!(refs.contains("FileLogger"));
    }
}
