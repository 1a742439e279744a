//! Rendering formats for a built [`depgraph_core::DependencyGraph`]. The
//! core makes no format decisions (spec.md §6) — these live entirely in the
//! CLI.

pub mod dot;
pub mod json;
pub mod mermaid;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Dot,
    Mermaid,
    Json,
}
