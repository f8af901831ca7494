//! Graphviz DOT output
//!
//! Consumes a validated [`DagExport`]. Image generation is left to `dot`.

use crate::config::RenderOptions;
use crate::dag::{Dag, DagExport, NodeKind};
use crate::error::Result;

fn shape(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "Mdiamond",
        NodeKind::Ingredient => "diamond",
        NodeKind::Step => "oval",
    }
}

/// Quote a DOT identifier or label
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render an export as a `digraph`
pub fn render_export(export: &DagExport<'_>, options: &RenderOptions) -> String {
    let mut lines = vec![format!("    splines={};", quote(&options.splines))];
    if let Some(rankdir) = &options.rankdir {
        lines.push(format!("    rankdir={};", quote(rankdir)));
    }

    lines.extend(export.nodes.iter().map(|node| {
        format!(
            "    {} [label={}, shape={}];",
            quote(node.id()),
            quote(node.label()),
            shape(node.kind())
        )
    }));

    lines.extend(
        export
            .edges
            .iter()
            .filter(|edge| options.draw_trivial_edges || !edge.kind.is_suppressible())
            .map(|edge| format!("    {} -> {};", quote(edge.from.id()), quote(edge.to.id()))),
    );

    let mut dot = String::from("digraph recipe {\n");
    for line in lines {
        dot.push_str(&line);
        dot.push('\n');
    }
    dot.push_str("}\n");
    dot
}

/// Validate and render a DAG
pub fn render_dot(dag: &Dag, options: &RenderOptions) -> Result<String> {
    let export = dag.export()?;
    Ok(render_export(&export, options))
}
