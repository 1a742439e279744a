use depgraph_cli::{discovery, output};
use depgraph_core::{build_dependency_graph, FsContentReader};
use std::fs;
use tempfile::tempdir;

#[test]
fn discovers_and_renders_a_small_ruby_project() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();

    fs::write(root.join("a.rb"), "require_relative 'b'\n").unwrap();
    fs::write(root.join("b.rb"), "").unwrap();
    fs::write(root.join("README.md"), "not a source file\n").unwrap();

    let files = discovery::discover_files(&root, &[]).unwrap();
    assert_eq!(files.len(), 2, "README.md must not be discovered: {files:?}");

    let reader = FsContentReader;
    let outcome = build_dependency_graph(&files, &reader).unwrap();
    assert_eq!(outcome.graph.node_count(), 2);

    let dot = output::dot::render(&outcome.graph, &root);
    assert!(dot.contains("\"a.rb\" -> \"b.rb\";"));

    let json = output::json::render(&outcome.graph, &root).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn gitignored_files_are_not_discovered() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();

    fs::write(root.join(".gitignore"), "ignored.rb\n").unwrap();
    fs::write(root.join("kept.rb"), "").unwrap();
    fs::write(root.join("ignored.rb"), "").unwrap();

    let files = discovery::discover_files(&root, &[]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert!(names.contains(&"kept.rb".to_string()));
    assert!(!names.contains(&"ignored.rb".to_string()));
}

#[test]
fn extra_ignore_patterns_from_config_are_honored() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();

    fs::create_dir(root.join("vendor")).unwrap();
    fs::write(root.join("vendor/dep.rb"), "").unwrap();
    fs::write(root.join("kept.rb"), "").unwrap();

    let patterns = vec!["vendor/".to_string()];
    let files = discovery::discover_files(&root, &patterns).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert!(names.contains(&"kept.rb".to_string()));
    assert!(!names.contains(&"dep.rb".to_string()));
}
