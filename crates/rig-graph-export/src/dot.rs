//! DOT serialization of the annotated bone graph.
//!
//! Emits Graphviz source: a fixed preamble, one statement per node in graph
//! node order, one statement per edge grouped by source node, and a closing
//! brace. Labels are always quoted so the output is deterministic and
//! diff-stable. The attribute names and values written here are the wire
//! contract with downstream renderers.

use std::io::Write;

use tracing::debug;

use rig_graph_core::{BoneGraph, BoneNode, RigModel, EDGE_ATTR_WEIGHT};

use crate::annotate::{ATTR_BONE_FOLLOW, ATTR_DYNAMIC_PHYSICS};
use crate::error::ExportResult;
use crate::legend::{color_legend, shape_legend, style_legend, Legend};

struct NodeLegends {
    shape: Legend,
    color: Legend,
    style: Legend,
}

fn write_header<W: Write>(writer: &mut W) -> ExportResult<()> {
    writeln!(writer, "digraph Bone_Graph {{")?;
    writeln!(writer, "graph [charset = \"UTF-8\"];")?;
    writeln!(writer, "node[fontname=\"meiryo\", fillcolor=\"white\"];")?;
    Ok(())
}

fn write_footer<W: Write>(writer: &mut W) -> ExportResult<()> {
    writeln!(writer, "}}")?;
    Ok(())
}

fn write_node<W: Write>(
    graph: &BoneGraph,
    rig: &RigModel,
    legends: &NodeLegends,
    node: &BoneNode,
    writer: &mut W,
) -> ExportResult<()> {
    let Some(attrs) = graph.attrs(node) else {
        return Ok(());
    };
    let shape = legends.shape.resolve(attrs);
    let color = legends.color.resolve(attrs);
    let style = legends.style.resolve(attrs);

    let name = rig
        .bones
        .get(node.bone)
        .map(|bone| bone.name.as_str())
        .unwrap_or("");
    let node_label = format!("{}: {}", node.bone, name);

    // Dynamic physics takes precedence; the annotator never sets both.
    let body_label = attrs
        .get(ATTR_DYNAMIC_PHYSICS)
        .or_else(|| attrs.get(ATTR_BONE_FOLLOW));
    let label = match body_label {
        None => format!("\"{}\"", node_label),
        Some(bodies) => format!("\"{}\\n({})\"", node_label, bodies),
    };

    writeln!(
        writer,
        "{} [shape={}, label={}, style =\"{}\",fillcolor=\"{}\"];",
        node.id, shape, label, style, color
    )?;
    Ok(())
}

fn write_edges<W: Write>(graph: &BoneGraph, node: &BoneNode, writer: &mut W) -> ExportResult<()> {
    for edge in graph.edges(node) {
        let mut modifier = format!(
            "style=\"{}\", arrowhead=\"{}\"",
            edge.kind.line_style(),
            edge.kind.arrowhead()
        );
        if let Some(weight) = edge.attr(EDGE_ATTR_WEIGHT) {
            modifier.push_str(&format!(", headlabel=\"{}\"", weight));
        }
        writeln!(writer, "{} -> {} [{}];", node.id, edge.to.id, modifier)?;
    }
    Ok(())
}

/// Serialize the graph as DOT to `writer`.
///
/// All node statements come first, in node order, then all edge statements
/// grouped by source node in the same order. Output is UTF-8 without a BOM
/// and uses `\n` line endings.
pub fn write_dot<W: Write>(graph: &BoneGraph, rig: &RigModel, writer: &mut W) -> ExportResult<()> {
    let legends = NodeLegends {
        shape: shape_legend(),
        color: color_legend(),
        style: style_legend(),
    };

    write_header(writer)?;
    for node in graph.nodes() {
        write_node(graph, rig, &legends, node, writer)?;
    }
    for node in graph.nodes() {
        write_edges(graph, node, writer)?;
    }
    write_footer(writer)?;

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "dot description written"
    );
    Ok(())
}
