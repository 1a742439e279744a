//! End-to-end seed scenarios (spec.md §8) driven against an in-memory
//! [`MemoryContentReader`] — the core must not require a real filesystem to
//! be tested.

use depgraph_core::{build_dependency_graph, find_path_nodes, MemoryContentReader};
use std::path::{Path, PathBuf};

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn dart_relative_import_resolves_within_supplied_set() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/m.dart", "import 'models/u.dart';\n")
        .with_file("/repo/models/u.dart", "");

    let outcome = build_dependency_graph(
        &[p("/repo/m.dart"), p("/repo/models/u.dart")],
        &reader,
    )
    .unwrap();

    assert_eq!(
        outcome.graph.edges_of(Path::new("/repo/m.dart")),
        &[p("/repo/models/u.dart")]
    );
    assert!(outcome
        .graph
        .edges_of(Path::new("/repo/models/u.dart"))
        .is_empty());
}

#[test]
fn go_cross_package_edge_via_module_path_and_symbol_use() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/go.mod", "module importtest\n\ngo 1.21\n")
        .with_file(
            "/repo/main.go",
            "package main\n\nimport \"importtest/pkg\"\n\nfunc main() {\n\tpkg.Helper()\n}\n",
        )
        .with_file(
            "/repo/pkg/lib.go",
            "package pkg\n\nfunc Helper() {}\n",
        )
        .with_file("/repo/pkg/README.md", "# pkg\n");

    let outcome = build_dependency_graph(
        &[
            p("/repo/go.mod"),
            p("/repo/main.go"),
            p("/repo/pkg/lib.go"),
            p("/repo/pkg/README.md"),
        ],
        &reader,
    )
    .unwrap();

    assert_eq!(
        outcome.graph.edges_of(Path::new("/repo/main.go")),
        &[p("/repo/pkg/lib.go")]
    );
    assert!(outcome
        .graph
        .edges_of(Path::new("/repo/pkg/README.md"))
        .is_empty());
}

#[test]
fn kotlin_wildcard_import_edges_only_referenced_type() {
    let reader = MemoryContentReader::new()
        .with_file(
            "/repo/Main.kt",
            "package app\n\nimport com.example.models.*\n\nclass Main {\n  val p: Product\n}\n",
        )
        .with_file(
            "/repo/models/Product.kt",
            "package com.example.models\n\nclass Product\n",
        )
        .with_file(
            "/repo/models/Unused.kt",
            "package com.example.models\n\nclass Unused\n",
        );

    let outcome = build_dependency_graph(
        &[
            p("/repo/Main.kt"),
            p("/repo/models/Product.kt"),
            p("/repo/models/Unused.kt"),
        ],
        &reader,
    )
    .unwrap();

    assert_eq!(
        outcome.graph.edges_of(Path::new("/repo/Main.kt")),
        &[p("/repo/models/Product.kt")]
    );
}

#[test]
fn tsx_relative_import_resolves_to_sibling_component() {
    let reader = MemoryContentReader::new()
        .with_file(
            "/repo/App.tsx",
            "import {Button} from \"./Button\";\n",
        )
        .with_file("/repo/Button.tsx", "export const Button = () => null;\n");

    let outcome = build_dependency_graph(
        &[p("/repo/App.tsx"), p("/repo/Button.tsx")],
        &reader,
    )
    .unwrap();

    assert_eq!(
        outcome.graph.edges_of(Path::new("/repo/App.tsx")),
        &[p("/repo/Button.tsx")]
    );
}

#[test]
fn csharp_scoped_using_edges_both_referenced_types() {
    let reader = MemoryContentReader::new()
        .with_file(
            "/repo/Program.cs",
            "using Lib.Core;\n\nnamespace App {\n  class Program {\n    Logger l;\n    FileLogger f;\n  }\n}\n",
        )
        .with_file(
            "/repo/Lib/Logger.cs",
            "namespace Lib.Core {\n  class Logger {}\n}\n",
        )
        .with_file(
            "/repo/Lib/FileLogger.cs",
            "namespace Lib.Core {\n  class FileLogger {}\n}\n",
        )
        .with_file(
            "/repo/App/Helper.cs",
            "namespace App {\n  class Helper {}\n}\n",
        );

    let outcome = build_dependency_graph(
        &[
            p("/repo/Program.cs"),
            p("/repo/Lib/Logger.cs"),
            p("/repo/Lib/FileLogger.cs"),
            p("/repo/App/Helper.cs"),
        ],
        &reader,
    )
    .unwrap();

    let mut edges = outcome
        .graph
        .edges_of(Path::new("/repo/Program.cs"))
        .to_vec();
    edges.sort();
    let mut expected = vec![p("/repo/Lib/Logger.cs"), p("/repo/Lib/FileLogger.cs")];
    expected.sort();
    assert_eq!(edges, expected);
}

#[test]
fn find_path_nodes_over_a_linear_chain() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/a.rb", "require_relative 'b'\n")
        .with_file("/repo/b.rb", "require_relative 'c'\n")
        .with_file("/repo/c.rb", "");

    let outcome = build_dependency_graph(
        &[p("/repo/a.rb"), p("/repo/b.rb"), p("/repo/c.rb")],
        &reader,
    )
    .unwrap();

    let sub = find_path_nodes(&outcome.graph, &[p("/repo/a.rb"), p("/repo/c.rb")]);

    assert_eq!(sub.node_count(), 3);
    assert_eq!(sub.edges_of(Path::new("/repo/a.rb")), &[p("/repo/b.rb")]);
    assert_eq!(sub.edges_of(Path::new("/repo/b.rb")), &[p("/repo/c.rb")]);
}

#[test]
fn go_intra_package_edge_independent_of_imports() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/go.mod", "module sample\n\ngo 1.21\n")
        .with_file("/repo/pkg/a.go", "package pkg\n\ntype User struct{}\n")
        .with_file(
            "/repo/pkg/b.go",
            "package pkg\n\nfunc Greet(u User) {\n\t_ = u\n}\n",
        );

    let outcome = build_dependency_graph(
        &[p("/repo/go.mod"), p("/repo/pkg/a.go"), p("/repo/pkg/b.go")],
        &reader,
    )
    .unwrap();

    assert!(outcome
        .graph
        .edges_of(Path::new("/repo/pkg/b.go"))
        .contains(&p("/repo/pkg/a.go")));
}

#[test]
fn csharp_sibling_projects_with_same_namespace_never_cross_edge() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/ProjectA/ProjectA.csproj", "<Project/>")
        .with_file(
            "/repo/ProjectA/Widget.cs",
            "namespace Shared {\n  class Widget {}\n}\n",
        )
        .with_file(
            "/repo/ProjectA/Consumer.cs",
            "namespace Shared {\n  class Consumer {\n    Widget w;\n  }\n}\n",
        )
        .with_file("/repo/ProjectB/ProjectB.csproj", "<Project/>")
        .with_file(
            "/repo/ProjectB/Widget.cs",
            "namespace Shared {\n  class Widget {}\n}\n",
        );

    let outcome = build_dependency_graph(
        &[
            p("/repo/ProjectA/ProjectA.csproj"),
            p("/repo/ProjectA/Widget.cs"),
            p("/repo/ProjectA/Consumer.cs"),
            p("/repo/ProjectB/ProjectB.csproj"),
            p("/repo/ProjectB/Widget.cs"),
        ],
        &reader,
    )
    .unwrap();

    // Ambiguity within ProjectA's own scope alone would be fine (one
    // `Widget` definition there), but the resolver must never consider
    // ProjectB's `Widget.cs` a candidate at all.
    assert_eq!(
        outcome.graph.edges_of(Path::new("/repo/ProjectA/Consumer.cs")),
        &[p("/repo/ProjectA/Widget.cs")]
    );
}

#[test]
fn unsupported_extension_is_always_a_graph_leaf() {
    let reader = MemoryContentReader::new().with_file("/repo/notes.txt", "hello");

    let outcome = build_dependency_graph(&[p("/repo/notes.txt")], &reader).unwrap();

    assert_eq!(outcome.graph.node_count(), 1);
    assert!(outcome.graph.edges_of(Path::new("/repo/notes.txt")).is_empty());
}

#[test]
fn every_edge_target_is_closed_over_the_supplied_set() {
    let reader = MemoryContentReader::new()
        .with_file("/repo/a.rb", "require_relative 'missing'\n");

    let outcome = build_dependency_graph(&[p("/repo/a.rb")], &reader).unwrap();

    for node in outcome.graph.nodes() {
        for target in outcome.graph.edges_of(node) {
            assert!(outcome.graph.contains(target));
        }
    }
}
