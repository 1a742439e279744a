//! Helpers shared by the real per-language resolvers: source reading,
//! lexical path joining, and the comment/string-stripped identifier scan
//! used by the symbol-directed Java/Kotlin/C# resolvers.

use crate::context::Context;
use crate::error::ResolveError;
use crate::reader::ContentReader;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

const HEADER_FALLBACK_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx"];

/// Resolve a `#include "quoted/path"` the way C/C++ do (spec.md §4.7): join
/// onto the source directory first; if that misses, walk up the source's
/// ancestor directories and retry `ancestor/quoted-path`; the extension may
/// be absent from the directive, so the literal path and each of
/// `.h`/`.hpp`/`.hh`/`.hxx` are all tried. Every resolved candidate is
/// returned, deduplicated by the caller.
pub(crate) fn resolve_quoted_include(ctx: &Context, source_dir: &Path, quoted: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut try_base = |base: &Path, out: &mut Vec<PathBuf>| {
        if let Some(hit) =
            first_existing_with_extensions(base, HEADER_FALLBACK_EXTENSIONS, |p| ctx.contains(p))
        {
            out.push(hit);
        }
    };

    try_base(&join_normalize(source_dir, quoted), &mut out);

    let mut ancestor = Some(source_dir);
    while let Some(dir) = ancestor {
        try_base(&join_normalize(dir, quoted), &mut out);
        ancestor = dir.parent();
    }

    let mut seen = HashSet::new();
    out.retain(|p| seen.insert(p.clone()));
    out
}

/// Read `path` as UTF-8. A genuine content-reader failure (missing file,
/// not UTF-8) is a [`ResolveError::Read`] — distinct from a parse failure,
/// and fatal once it reaches the builder (spec.md §7 point 1).
pub(crate) fn read_source(reader: &dyn ContentReader, path: &Path) -> Result<String, ResolveError> {
    Ok(reader.read_to_string(path)?)
}

/// Join `rel` onto `base_dir` and collapse `.`/`..` components lexically.
/// Mirrors `builder::normalize_lexically` but takes a directory + relative
/// string instead of one absolute path.
pub(crate) fn join_normalize(base_dir: &Path, rel: &str) -> PathBuf {
    let mut out = base_dir.to_path_buf();
    for part in Path::new(rel).components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Try `base` verbatim, then `base` with each of `extensions` appended, in
/// order; the first member of `supplied` wins.
pub(crate) fn first_existing_with_extensions(
    base: &Path,
    extensions: &[&str],
    contains: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    if contains(base) {
        return Some(base.to_path_buf());
    }
    for ext in extensions {
        let candidate = append_extension(base, ext);
        if contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Append `.ext` to `base`'s file name, regardless of any extension `base`
/// already carries (`foo` + `rb` -> `foo.rb`, not `foo.Path::set_extension`'s
/// replace semantics).
pub(crate) fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ext);
    match base.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn upper_identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z][A-Za-z0-9_]*\b").unwrap())
}

/// Blank out `//`/`#` line comments, `/* */` block comments, and quoted
/// string/char literals, preserving line breaks so later position-sensitive
/// scans (none currently) would still line up.
pub(crate) fn strip_comments_and_strings(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut in_string: Option<u8> = None;

    while i < bytes.len() {
        let c = bytes[i];
        if in_line_comment {
            if c == b'\n' {
                in_line_comment = false;
                out.push('\n');
            } else {
                out.push(' ');
            }
            i += 1;
            continue;
        }
        if in_block_comment {
            if c == b'*' && bytes.get(i + 1) == Some(&b'/') {
                in_block_comment = false;
                out.push_str("  ");
                i += 2;
                continue;
            }
            out.push(if c == b'\n' { '\n' } else { ' ' });
            i += 1;
            continue;
        }
        if let Some(quote) = in_string {
            if c == b'\\' && i + 1 < bytes.len() {
                out.push_str("  ");
                i += 2;
                continue;
            }
            if c == quote {
                in_string = None;
                out.push(' ');
            } else {
                out.push(if c == b'\n' { '\n' } else { ' ' });
            }
            i += 1;
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            in_line_comment = true;
            out.push_str("  ");
            i += 2;
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            in_block_comment = true;
            out.push_str("  ");
            i += 2;
            continue;
        }
        if c == b'"' || c == b'\'' {
            in_string = Some(c);
            out.push(' ');
            i += 1;
            continue;
        }
        out.push(c as char);
        i += 1;
    }
    out
}

/// The set of capitalized identifiers referenced in `src`, outside comments
/// and string literals: a string-level approximation of "referenced type
/// identifiers" used by the Java/Kotlin/C# resolvers (spec.md §4.4).
pub(crate) fn referenced_type_identifiers(src: &str) -> HashSet<String> {
    let cleaned = strip_comments_and_strings(src);
    upper_identifier_re()
        .find_iter(&cleaned)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(crate) struct Include {
    pub(crate) path: String,
    pub(crate) is_system: bool,
}

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*#\s*include\s+([<"])([^>"]+)[>"]"#).unwrap())
}

/// Extract `#include` directives via tree-sitter, falling back to a regex
/// scan. Shared by the C and C++ modules (spec.md §4.7), which differ only
/// in grammar and extension set.
pub(crate) fn extract_includes(source: &str, language: &tree_sitter::Language) -> Vec<Include> {
    if let Some(includes) = extract_includes_tree_sitter(source, language) {
        if !includes.is_empty() {
            return includes;
        }
    }
    include_re()
        .captures_iter(source)
        .map(|c| Include {
            is_system: &c[1] == "<",
            path: c[2].to_string(),
        })
        .collect()
}

fn extract_includes_tree_sitter(source: &str, language: &tree_sitter::Language) -> Option<Vec<Include>> {
    use tree_sitter::Parser;
    let mut parser = Parser::new();
    parser.set_language(language).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut out = Vec::new();
    walk_includes(&root, source, &mut out);
    Some(out)
}

fn walk_includes(node: &tree_sitter::Node, source: &str, out: &mut Vec<Include>) {
    if node.kind() == "preproc_include" {
        if let Some(path_node) = node.child_by_field_name("path") {
            if let Ok(text) = path_node.utf8_text(source.as_bytes()) {
                let is_system = path_node.kind() == "system_lib_string";
                let trimmed = text.trim_matches(|c| c == '"' || c == '<' || c == '>');
                out.push(Include {
                    path: trimmed.to_string(),
                    is_system,
                });
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_includes(&child, source, out);
    }
}
