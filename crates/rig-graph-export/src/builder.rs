//! Graph construction from rig data.
//!
//! Translates bone facts into graph nodes and typed edges. Node identity is
//! the bone's input-order index, so the emitted graph is fully determined by
//! the rig alone: node order follows bone order, and each node's edge list
//! follows the fixed per-bone emission order below.

use std::collections::HashMap;

use tracing::debug;

use rig_graph_core::{BoneGraph, BoneNode, EdgeInfo, EdgeKind, RigModel, EDGE_ATTR_WEIGHT};

use crate::error::{ExportError, ExportResult};

/// Mapping from bone index to the indices of its attached bodies, in body
/// input order.
pub type BoneBodyMap = HashMap<usize, Vec<usize>>;

fn check_bone_ref(rig: &RigModel, referrer: &str, index: usize) -> ExportResult<()> {
    if index < rig.bone_count() {
        Ok(())
    } else {
        Err(ExportError::DanglingBoneRef {
            referrer: referrer.to_string(),
            index,
            bone_count: rig.bone_count(),
        })
    }
}

/// Validate every cross-reference index in the rig.
pub fn validate_refs(rig: &RigModel) -> ExportResult<()> {
    for (i, bone) in rig.bones.iter().enumerate() {
        if let Some(parent) = bone.parent {
            check_bone_ref(rig, &format!("bone {i} (parent)"), parent)?;
        }
        if let Some(append) = &bone.append {
            check_bone_ref(rig, &format!("bone {i} (append parent)"), append.parent)?;
        }
        if let Some(ik) = &bone.ik {
            if let Some(target) = ik.target {
                check_bone_ref(rig, &format!("bone {i} (ik target)"), target)?;
            }
            for &link in &ik.links {
                check_bone_ref(rig, &format!("bone {i} (ik link)"), link)?;
            }
        }
    }
    for (i, body) in rig.bodies.iter().enumerate() {
        if let Some(bone) = body.bone {
            check_bone_ref(rig, &format!("body {i}"), bone)?;
        }
    }
    Ok(())
}

/// Collect the bone → attached-bodies lookup, in body input order.
///
/// Bodies without an attached bone are skipped.
pub fn bone_body_map(rig: &RigModel) -> BoneBodyMap {
    let mut map = BoneBodyMap::new();
    for (i, body) in rig.bodies.iter().enumerate() {
        if let Some(bone) = body.bone {
            map.entry(bone).or_default().push(i);
        }
    }
    map
}

/// Build the bone connection graph.
///
/// Per bone, in order: the bone's own node (so isolated bones still appear),
/// then its parent-child edge, its append-parent edge (only when at least
/// one append flag is set, weighted by the ratio), its IK target edge, and
/// its IK link edges in chain order. The categories are independent; one
/// bone may emit all of them.
pub fn build_graph(rig: &RigModel) -> ExportResult<BoneGraph> {
    validate_refs(rig)?;

    let mut graph = BoneGraph::new();
    for (index, bone) in rig.bones.iter().enumerate() {
        let node = BoneNode::new(index);
        graph.add_node(node.clone());

        if let Some(parent) = bone.parent {
            graph.add_edge(
                BoneNode::new(parent),
                EdgeInfo::new(node.clone(), EdgeKind::ParentChild),
            );
        }

        if let Some(append) = &bone.append {
            if append.affects_rotation || append.affects_translation {
                let edge = EdgeInfo::new(node.clone(), EdgeKind::AppendParent)
                    .with_attr(EDGE_ATTR_WEIGHT, format!("{:.3}", append.ratio));
                graph.add_edge(BoneNode::new(append.parent), edge);
            }
        }

        if bone.is_ik {
            if let Some(ik) = &bone.ik {
                if let Some(target) = ik.target {
                    graph.add_edge(
                        node.clone(),
                        EdgeInfo::new(BoneNode::new(target), EdgeKind::IkTarget),
                    );
                }
                for &link in &ik.links {
                    graph.add_edge(
                        node.clone(),
                        EdgeInfo::new(BoneNode::new(link), EdgeKind::IkLink),
                    );
                }
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "bone graph built"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_graph_core::{AppendSource, Bone, BodyMode, IkSetup, PhysicsBody};

    fn bone(name: &str) -> Bone {
        Bone {
            name: name.to_string(),
            parent: None,
            append: None,
            is_ik: false,
            ik: None,
            controllable: true,
            visible: true,
        }
    }

    #[test]
    fn every_bone_gets_a_node_even_without_relations() {
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("a"), bone("b"), bone("c")],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        let ids: Vec<_> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["BONE_0", "BONE_1", "BONE_2"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn parent_edge_goes_from_parent_to_child() {
        let mut child = bone("child");
        child.parent = Some(0);
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("root"), child],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        let root = BoneNode::new(0);
        let edges = graph.edges(&root);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::ParentChild);
        assert_eq!(edges[0].to, BoneNode::new(1));
    }

    #[test]
    fn ik_bone_with_target_and_two_links_emits_three_edges() {
        let mut ik = bone("ik");
        ik.is_ik = true;
        ik.ik = Some(IkSetup {
            target: Some(1),
            links: vec![2, 0],
        });
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("a"), bone("b"), bone("c"), ik],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        let edges = graph.edges(&BoneNode::new(3));
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].kind, EdgeKind::IkTarget);
        assert_eq!(edges[0].to, BoneNode::new(1));
        assert_eq!(edges[1].kind, EdgeKind::IkLink);
        assert_eq!(edges[1].to, BoneNode::new(2));
        assert_eq!(edges[2].kind, EdgeKind::IkLink);
        assert_eq!(edges[2].to, BoneNode::new(0));
    }

    #[test]
    fn append_parent_without_flags_emits_no_edge() {
        let mut b = bone("b");
        b.append = Some(AppendSource {
            parent: 0,
            affects_rotation: false,
            affects_translation: false,
            ratio: 0.5,
        });
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("a"), b],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn append_edge_carries_a_three_decimal_weight() {
        let mut b = bone("b");
        b.append = Some(AppendSource {
            parent: 0,
            affects_rotation: true,
            affects_translation: false,
            ratio: 0.5,
        });
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("a"), b],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        let edges = graph.edges(&BoneNode::new(0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::AppendParent);
        assert_eq!(edges[0].attr(EDGE_ATTR_WEIGHT), Some("0.500"));
    }

    #[test]
    fn ik_flag_without_config_emits_no_ik_edges() {
        let mut ik = bone("ik");
        ik.is_ik = true;
        let rig = RigModel {
            name: String::new(),
            bones: vec![ik],
            bodies: vec![],
        };

        let graph = build_graph(&rig).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn dangling_parent_index_is_rejected() {
        let mut b = bone("b");
        b.parent = Some(7);
        let rig = RigModel {
            name: String::new(),
            bones: vec![b],
            bodies: vec![],
        };

        let err = build_graph(&rig).unwrap_err();
        assert!(matches!(err, ExportError::DanglingBoneRef { index: 7, .. }));
    }

    #[test]
    fn bone_body_map_keeps_body_input_order() {
        let rig = RigModel {
            name: String::new(),
            bones: vec![bone("a")],
            bodies: vec![
                PhysicsBody {
                    bone: Some(0),
                    name: "first".to_string(),
                    mode: BodyMode::Static,
                },
                PhysicsBody {
                    bone: None,
                    name: "floating".to_string(),
                    mode: BodyMode::Dynamic,
                },
                PhysicsBody {
                    bone: Some(0),
                    name: "second".to_string(),
                    mode: BodyMode::Dynamic,
                },
            ],
        };

        let map = bone_body_map(&rig);
        assert_eq!(map.get(&0), Some(&vec![0, 2]));
        assert_eq!(map.len(), 1);
    }
}
