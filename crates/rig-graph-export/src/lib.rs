//! Bone graph export pipeline: build, annotate, serialize.
//!
//! Turns a [`rig_graph_core::RigModel`] into a Graphviz DOT description of
//! its bone connections:
//!
//! - **build** — one node per bone in input order, plus typed edges for
//!   parent-child, append-parent, IK target, and IK link relations
//! - **annotate** — semantic attributes per node (IK root, controllability,
//!   visibility, attached physics bodies)
//! - **serialize** — deterministic DOT text, visuals resolved through
//!   first-match-wins legends
//!
//! The pipeline is synchronous and runs to completion or aborts on the
//! first error; a failed write may leave partial content behind, but is
//! never reported as success.

mod annotate;
mod builder;
mod dot;
mod error;
mod legend;

pub use annotate::{
    annotate, ATTR_BONE_FOLLOW, ATTR_CONTROLLABLE, ATTR_DYNAMIC_PHYSICS, ATTR_HIDDEN, ATTR_IK,
    ATTR_NOT_CONTROLLABLE, ATTR_VISIBLE,
};
pub use builder::{bone_body_map, build_graph, validate_refs, BoneBodyMap};
pub use dot::write_dot;
pub use error::{ExportError, ExportResult};
pub use legend::{color_legend, shape_legend, style_legend, Legend, NodeSifter};

use std::io::Write;

use tracing::info;

use rig_graph_core::RigModel;

/// Run the full pipeline: build the graph, annotate it, and write DOT to
/// `writer`.
pub fn export_dot<W: Write>(rig: &RigModel, writer: &mut W) -> ExportResult<()> {
    let mut graph = build_graph(rig)?;
    let bodies = bone_body_map(rig);
    annotate(&mut graph, rig, &bodies);
    write_dot(&graph, rig, writer)?;
    info!(
        bones = rig.bone_count(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "rig exported"
    );
    Ok(())
}
