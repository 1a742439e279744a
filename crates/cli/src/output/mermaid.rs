//! Mermaid `flowchart` rendering, for embedding in Markdown/docs.

use depgraph_core::DependencyGraph;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn render(graph: &DependencyGraph, root: &Path) -> String {
    let mut nodes: Vec<&PathBuf> = graph.nodes().collect();
    nodes.sort();

    let ids: HashMap<&PathBuf, String> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (*node, format!("n{i}")))
        .collect();

    let mut out = String::from("flowchart LR\n");
    for node in &nodes {
        let id = &ids[node];
        out.push_str(&format!(
            "  {id}[\"{}\"]\n",
            escape(&display_path(node, root))
        ));
    }
    for node in &nodes {
        let from_id = &ids[node];
        for target in graph.edges_of(node) {
            let Some(to_id) = ids.get(target) else {
                continue;
            };
            out.push_str(&format!("  {from_id} --> {to_id}\n"));
        }
    }
    out
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn escape(s: &str) -> String {
    s.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_one_edge() {
        let mut g = DependencyGraph::new();
        g.add_edge(PathBuf::from("/repo/a.rb"), PathBuf::from("/repo/b.rb"));

        let mermaid = render(&g, Path::new("/repo"));

        assert!(mermaid.starts_with("flowchart LR"));
        assert!(mermaid.contains("-->"));
    }
}
