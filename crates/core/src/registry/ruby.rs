//! Ruby resolver (spec.md §4.6).

use super::support::{join_normalize, read_source};
use super::{LanguageModule, Maturity, Resolver};
use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tree_sitter::Parser;

pub struct RubyModule;

impl LanguageModule for RubyModule {
    fn name(&self) -> &'static str {
        "ruby"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".rb"]
    }

    fn maturity(&self) -> Maturity {
        Maturity::BasicTests
    }

    fn is_test_file(&self, path: &Path, _reader: &dyn ContentReader) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        name.ends_with("_test.rb")
            || name.ends_with("_spec.rb")
            || crate::classify::path_crosses_any_dir(path, &["test", "tests", "spec"])
    }

    fn make_resolver<'a>(
        &self,
        ctx: &'a Context,
        reader: &'a dyn ContentReader,
    ) -> Box<dyn Resolver + 'a> {
        Box::new(RubyResolver { ctx, reader })
    }
}

struct RubyResolver<'a> {
    ctx: &'a Context,
    reader: &'a dyn ContentReader,
}

impl<'a> Resolver for RubyResolver<'a> {
    fn resolve_project_imports(
        &self,
        abs_path: &Path,
        _display_path: &Path,
        _ext: &str,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let source = read_source(self.reader, abs_path)?;
        let dir = abs_path.parent().unwrap_or_else(|| Path::new(""));
        let mut out = Vec::new();

        for req in extract_requires(&source) {
            if req.is_relative {
                for candidate in relative_candidates(dir, &req.path) {
                    if self.ctx.contains(&candidate) && !out.contains(&candidate) {
                        out.push(candidate);
                    }
                }
            } else {
                for candidate in self.absolute_matches(&req.path) {
                    if !out.contains(&candidate) {
                        out.push(candidate);
                    }
                }
            }
        }
        Ok(out)
    }
}

impl<'a> RubyResolver<'a> {
    fn absolute_matches(&self, path: &str) -> Vec<PathBuf> {
        let suffix_rb = format!("/{path}.rb");
        let suffix_bare = format!("/{path}");
        self.ctx
            .supplied()
            .filter(|f| {
                let s = f.to_string_lossy().replace('\\', "/");
                s.ends_with(&suffix_rb) || s.ends_with(&suffix_bare)
            })
            .cloned()
            .collect()
    }
}

fn relative_candidates(dir: &Path, rel: &str) -> Vec<PathBuf> {
    vec![
        join_normalize(dir, rel),
        join_normalize(dir, &format!("{rel}.rb")),
        join_normalize(dir, &format!("{rel}/init.rb")),
    ]
}

struct RubyRequire {
    path: String,
    is_relative: bool,
}

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(require_relative|require)\s*\(?\s*['"]([^'"]+)['"]\s*\)?"#).unwrap()
    })
}

fn extract_requires(source: &str) -> Vec<RubyRequire> {
    if let Some(reqs) = extract_via_tree_sitter(source) {
        if !reqs.is_empty() {
            return reqs;
        }
    }
    require_re()
        .captures_iter(source)
        .map(|c| RubyRequire {
            is_relative: &c[1] == "require_relative",
            path: c[2].to_string(),
        })
        .collect()
}

fn extract_via_tree_sitter(source: &str) -> Option<Vec<RubyRequire>> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_ruby::LANGUAGE.into()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut out = Vec::new();
    walk_calls(&root, source, &mut out);
    Some(out)
}

fn walk_calls(node: &tree_sitter::Node, source: &str, out: &mut Vec<RubyRequire>) {
    if node.kind() == "call" {
        if let Some(method) = node.child_by_field_name("method") {
            if let Ok(name) = method.utf8_text(source.as_bytes()) {
                if name == "require" || name == "require_relative" {
                    if let Some(args) = node.child_by_field_name("arguments") {
                        let mut cursor = args.walk();
                        for arg in args.children(&mut cursor) {
                            if arg.kind() == "string" {
                                if let Some(content) = first_named_child(&arg) {
                                    if let Ok(text) = content.utf8_text(source.as_bytes()) {
                                        out.push(RubyRequire {
                                            is_relative: name == "require_relative",
                                            path: text.to_string(),
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_calls(&child, source, out);
    }
}

fn first_named_child<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.is_named())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_extracts_relative_and_absolute_requires() {
        let src = "require 'json'\nrequire_relative \"./helpers\"\n";
        let reqs = require_re()
            .captures_iter(src)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect::<Vec<_>>();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].1, "json");
        assert_eq!(reqs[1].1, "./helpers");
    }
}
