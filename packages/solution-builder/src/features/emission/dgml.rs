//! Dependency graph markup (DGML)
//!
//! Covers the whole node set, in build or not. Nodes are addressed by
//! descriptor file name.

use std::fmt::Write;

use crate::features::dependency_graph::ProjectGraph;

pub const DGML_NAMESPACE: &str = "http://schemas.microsoft.com/vs/2009/dgml";

pub fn render_dgml(graph: &ProjectGraph) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n");
    let _ = writeln!(out, "<DirectedGraph xmlns=\"{}\">", DGML_NAMESPACE);

    out.push_str("  <Nodes>\n");
    for (idx, node) in graph.nodes() {
        let _ = writeln!(
            out,
            "    <Node Id=\"{}\" FullPath=\"{}\" OutputBinary=\"{}\" UsedByCount=\"{}\" />",
            escape(&node.file_name()),
            escape(&node.full_path.to_string_lossy()),
            escape(&node.output_path),
            graph.used_by_count(idx)
        );
    }
    out.push_str("  </Nodes>\n");

    out.push_str("  <Links>\n");
    for (from, to) in graph.edges() {
        let _ = writeln!(
            out,
            "    <Link Source=\"{}\" Target=\"{}\" />",
            escape(&graph.node(from).file_name()),
            escape(&graph.node(to).file_name())
        );
    }
    out.push_str("  </Links>\n");

    out.push_str("  <Styles />\n");
    out.push_str("  <Categories />\n");
    out.push_str("</DirectedGraph>\n");
    out
}

/// Attribute-value escaping
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
