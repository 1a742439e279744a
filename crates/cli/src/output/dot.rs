//! Graphviz DOT rendering. Purely a text formatter over a
//! [`depgraph_core::DependencyGraph`] — no graph semantics live here.

use depgraph_core::DependencyGraph;
use std::path::{Path, PathBuf};

pub fn render(graph: &DependencyGraph, root: &Path) -> String {
    let mut nodes: Vec<&PathBuf> = graph.nodes().collect();
    nodes.sort();

    let mut out = String::from("digraph depgraph {\n");
    out.push_str("  rankdir=LR;\n");
    for node in &nodes {
        out.push_str(&format!(
            "  \"{}\";\n",
            escape(&display_path(node, root))
        ));
    }
    for node in &nodes {
        for target in graph.edges_of(node) {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape(&display_path(node, root)),
                escape(&display_path(target, root))
            ));
        }
    }
    out.push_str("}\n");
    out
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_one_edge() {
        let mut g = DependencyGraph::new();
        g.add_edge(PathBuf::from("/repo/a.rb"), PathBuf::from("/repo/b.rb"));

        let dot = render(&g, Path::new("/repo"));

        assert!(dot.contains("\"a.rb\" -> \"b.rb\";"));
        assert!(dot.starts_with("digraph depgraph {"));
    }
}
