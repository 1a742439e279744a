//! The path/subgraph engine: `FindPathNodes` (spec.md §4.9).
//!
//! Grounded on the teacher's `GraphQuery` BFS helpers
//! (`crates/core/src/graph/query.rs` in the source repo this crate was
//! adapted from) — `transitive_dependents`/`transitive_dependencies` are the
//! same forward/reverse BFS shape, just over `PathBuf` nodes instead of
//! petgraph `NodeIndex`es and run once per target pair instead of once per
//! node.

use super::DependencyGraph;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

/// Compute the subgraph induced by the union, over every ordered pair
/// `(a, b)` of distinct targets, of all nodes lying on some directed path
/// from `a` to `b`.
///
/// Targets absent from `graph` are dropped. The targets themselves are
/// always retained (even when disconnected from every other target), so a
/// caller always sees the nodes it asked about.
pub fn find_path_nodes(graph: &DependencyGraph, targets: &[PathBuf]) -> DependencyGraph {
    let valid: Vec<PathBuf> = targets
        .iter()
        .filter(|t| graph.contains(t))
        .cloned()
        .collect();

    let mut survivors: HashSet<PathBuf> = valid.iter().cloned().collect();

    if valid.len() >= 2 {
        let reverse = build_reverse_adjacency(graph);
        for a in &valid {
            for b in &valid {
                if a == b {
                    continue;
                }
                let forward = bfs(graph.as_map(), a);
                let backward = bfs(&reverse, b);
                for node in forward.intersection(&backward) {
                    survivors.insert(node.clone());
                }
            }
        }
    }

    let mut result = DependencyGraph::new();
    for node in &survivors {
        result.ensure_node(node.clone());
    }
    for node in &survivors {
        for target in graph.edges_of(node) {
            if survivors.contains(target) {
                result.add_edge(node.clone(), target.clone());
            }
        }
    }
    result
}

fn build_reverse_adjacency(graph: &DependencyGraph) -> HashMap<PathBuf, Vec<PathBuf>> {
    let mut reverse: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    for node in graph.nodes() {
        reverse.entry(node.clone()).or_default();
    }
    for node in graph.nodes() {
        for target in graph.edges_of(node) {
            reverse.entry(target.clone()).or_default().push(node.clone());
        }
    }
    reverse
}

fn bfs(adjacency: &HashMap<PathBuf, Vec<PathBuf>>, start: &PathBuf) -> HashSet<PathBuf> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start.clone());
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adjacency.get(&current) {
            for neighbor in neighbors {
                if visited.insert(neighbor.clone()) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn linear_chain_keeps_the_middle() {
        let mut g = DependencyGraph::new();
        g.add_edge(p("/a"), p("/b"));
        g.add_edge(p("/b"), p("/c"));

        let sub = find_path_nodes(&g, &[p("/a"), p("/c")]);

        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edges_of(&p("/a")), &[p("/b")]);
        assert_eq!(sub.edges_of(&p("/b")), &[p("/c")]);
        assert!(sub.edges_of(&p("/c")).is_empty());
    }

    #[test]
    fn diamond_keeps_both_branches() {
        let mut g = DependencyGraph::new();
        g.add_edge(p("/a"), p("/b"));
        g.add_edge(p("/a"), p("/c"));
        g.add_edge(p("/b"), p("/d"));
        g.add_edge(p("/c"), p("/d"));

        let sub = find_path_nodes(&g, &[p("/a"), p("/d")]);

        assert_eq!(sub.node_count(), 4);
        assert_eq!(sub.edge_count(), 4);
    }

    #[test]
    fn disconnected_targets_have_no_edges() {
        let mut g = DependencyGraph::new();
        g.add_edge(p("/a"), p("/b"));
        g.ensure_node(p("/z"));

        let sub = find_path_nodes(&g, &[p("/a"), p("/z")]);

        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn target_order_does_not_matter() {
        let mut g = DependencyGraph::new();
        g.add_edge(p("/a"), p("/b"));

        let ab = find_path_nodes(&g, &[p("/a"), p("/b")]);
        let ba = find_path_nodes(&g, &[p("/b"), p("/a")]);

        assert_eq!(ab.node_count(), ba.node_count());
        assert_eq!(ab.edge_count(), ba.edge_count());
    }

    #[test]
    fn missing_targets_are_dropped() {
        let mut g = DependencyGraph::new();
        g.add_edge(p("/a"), p("/b"));

        let sub = find_path_nodes(&g, &[p("/a"), p("/missing")]);

        assert_eq!(sub.node_count(), 1);
        assert!(sub.contains(&p("/a")));
    }
}
