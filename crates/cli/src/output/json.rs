//! JSON rendering — the one format a downstream tool is expected to parse
//! programmatically rather than just display.

use anyhow::Result;
use depgraph_core::DependencyGraph;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonGraph {
    nodes: Vec<String>,
    edges: BTreeMap<String, Vec<String>>,
}

pub fn render(graph: &DependencyGraph, root: &Path) -> Result<String> {
    let mut nodes: Vec<String> = graph.nodes().map(|n| display_path(n, root)).collect();
    nodes.sort();

    let mut edges = BTreeMap::new();
    for node in graph.nodes() {
        let targets: Vec<String> = graph
            .edges_of(node)
            .iter()
            .map(|t| display_path(t, root))
            .collect();
        edges.insert(display_path(node, root), targets);
    }

    let doc = JsonGraph { nodes, edges };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_nodes_and_edges() {
        let mut g = DependencyGraph::new();
        g.add_edge(PathBuf::from("/repo/a.rb"), PathBuf::from("/repo/b.rb"));

        let json = render(&g, Path::new("/repo")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["edges"]["a.rb"][0], "b.rb");
    }
}
