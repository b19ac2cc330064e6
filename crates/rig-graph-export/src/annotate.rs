//! Semantic node attributes, derived after the full graph exists.
//!
//! Runs as a separate pass because physics-body composition needs the
//! complete bone → bodies lookup, not just the bone being visited.

use tracing::debug;

use rig_graph_core::{BoneGraph, RigModel};

use crate::builder::BoneBodyMap;

/// Set on IK root bones.
pub const ATTR_IK: &str = "is-ik";
/// Set on user-manipulable bones. Mutually exclusive with [`ATTR_NOT_CONTROLLABLE`].
pub const ATTR_CONTROLLABLE: &str = "controllable";
/// Set on bones the user cannot manipulate.
pub const ATTR_NOT_CONTROLLABLE: &str = "not-controllable";
/// Set on visible bones. Mutually exclusive with [`ATTR_HIDDEN`].
pub const ATTR_VISIBLE: &str = "visible";
/// Set on hidden bones.
pub const ATTR_HIDDEN: &str = "hidden";
/// Composed body text, set when at least one attached body is simulated.
pub const ATTR_DYNAMIC_PHYSICS: &str = "dynamic-physics";
/// Composed body text, set when all attached bodies are bone-following.
pub const ATTR_BONE_FOLLOW: &str = "bone-follow";

/// Annotate every node with its semantic attributes.
///
/// Exactly one of controllable/not-controllable and one of visible/hidden is
/// set per node. At most one of dynamic-physics/bone-follow is set: the body
/// list renders as `"index: name"` entries joined by `", "` in body input
/// order, stored under dynamic-physics when any attached body is simulated.
pub fn annotate(graph: &mut BoneGraph, rig: &RigModel, bodies: &BoneBodyMap) {
    let nodes: Vec<_> = graph.nodes().cloned().collect();
    for node in nodes {
        let Some(bone) = rig.bones.get(node.bone) else {
            continue;
        };
        let Some(attrs) = graph.attrs_mut(&node) else {
            continue;
        };

        if bone.is_ik {
            attrs.set(ATTR_IK, "");
        }
        if bone.controllable {
            attrs.set(ATTR_CONTROLLABLE, "");
        } else {
            attrs.set(ATTR_NOT_CONTROLLABLE, "");
        }
        if bone.visible {
            attrs.set(ATTR_VISIBLE, "");
        } else {
            attrs.set(ATTR_HIDDEN, "");
        }

        if let Some(body_indices) = bodies.get(&node.bone) {
            let mut text = String::new();
            let mut dynamic = false;
            for &body_index in body_indices {
                let Some(body) = rig.bodies.get(body_index) else {
                    continue;
                };
                if !text.is_empty() {
                    text.push_str(", ");
                }
                text.push_str(&format!("{}: {}", body_index, body.name));
                if body.mode.is_dynamic() {
                    dynamic = true;
                }
            }
            if dynamic {
                attrs.set(ATTR_DYNAMIC_PHYSICS, text);
            } else {
                attrs.set(ATTR_BONE_FOLLOW, text);
            }
        }
    }
    debug!(nodes = graph.node_count(), "node attributes annotated");
}
