//! Core domain types shared across the rig-graph workspace.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Rig Input Model
// =============================================================================

/// Simulation mode of a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMode {
    /// Body follows its bone passively, no simulation.
    Static,
    /// Body is fully physics driven.
    Dynamic,
    /// Body is physics driven with bone-position alignment.
    DynamicWithBone,
}

impl BodyMode {
    /// Whether this mode is driven by the physics simulation.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, BodyMode::Dynamic | BodyMode::DynamicWithBone)
    }
}

/// A collision volume attached to (at most) one bone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Index of the bone this body is attached to, if any.
    #[serde(default)]
    pub bone: Option<usize>,
    /// Human readable name.
    pub name: String,
    /// Simulation mode.
    pub mode: BodyMode,
}

/// Auxiliary relation granting partially inherited rotation and/or
/// translation from another bone, scaled by a ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendSource {
    /// Index of the bone the motion is inherited from.
    pub parent: usize,
    /// Whether rotation is inherited.
    #[serde(default)]
    pub affects_rotation: bool,
    /// Whether translation is inherited.
    #[serde(default)]
    pub affects_translation: bool,
    /// Inheritance ratio.
    #[serde(default)]
    pub ratio: f32,
}

/// IK constraint configuration carried by an IK root bone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IkSetup {
    /// Index of the target bone the chain is driven toward, if set.
    #[serde(default)]
    pub target: Option<usize>,
    /// Indices of the link bones, in chain order.
    #[serde(default)]
    pub links: Vec<usize>,
}

/// A single joint of the rig.
///
/// All cross-references (`parent`, append parent, IK target/links) are
/// 0-based indices into [`RigModel::bones`] rather than object references,
/// so bones stay plain data with stable handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    /// Human readable name.
    pub name: String,
    /// Index of the parent bone, if any.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Append-parent relation, if any.
    #[serde(default)]
    pub append: Option<AppendSource>,
    /// Whether this bone is an IK root.
    #[serde(default)]
    pub is_ik: bool,
    /// IK configuration. May be absent even on an IK root.
    #[serde(default)]
    pub ik: Option<IkSetup>,
    /// Whether the bone can be manipulated by the user.
    #[serde(default = "default_true")]
    pub controllable: bool,
    /// Whether the bone is shown in the editor view.
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

/// A full rig: bones and physics bodies in file order.
///
/// Bone and body order is significant — it fixes node identity and every
/// ordering guarantee of the exported graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigModel {
    /// Name of the model.
    #[serde(default)]
    pub name: String,
    /// All bones, in file order.
    pub bones: Vec<Bone>,
    /// All physics bodies, in file order.
    #[serde(default)]
    pub bodies: Vec<PhysicsBody>,
}

impl RigModel {
    /// Number of bones in the rig.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Number of physics bodies in the rig.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

// =============================================================================
// Bone Graph Model
// =============================================================================

/// Prefix of every bone node identifier.
pub const BONE_NODE_PREFIX: &str = "BONE_";

/// A graph node standing for one bone.
///
/// Identity (equality and hashing) is the `id` string alone; the bone index
/// is carried along so later passes can reach back into the rig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneNode {
    /// Stable identifier, `BONE_<index>`.
    pub id: String,
    /// Index of the originating bone in [`RigModel::bones`].
    pub bone: usize,
}

impl BoneNode {
    /// Create the node for the bone at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            id: format!("{}{}", BONE_NODE_PREFIX, index),
            bone: index,
        }
    }
}

impl PartialEq for BoneNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BoneNode {}

impl std::hash::Hash for BoneNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// String attribute map attached to a graph node.
#[derive(Debug, Clone, Default)]
pub struct NodeAttrs {
    attrs: HashMap<String, String>,
}

impl NodeAttrs {
    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Check whether an attribute is present.
    pub fn has(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Get an attribute value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(|s| s.as_str())
    }
}

/// Kind tag of a directed edge between bone nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent bone to child bone.
    ParentChild,
    /// Append parent to the bone inheriting its motion.
    AppendParent,
    /// IK root to its target bone.
    IkTarget,
    /// IK root to one link of its chain.
    IkLink,
}

impl EdgeKind {
    /// Get a display label for the edge kind.
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::ParentChild => "parent-child",
            EdgeKind::AppendParent => "append-parent",
            EdgeKind::IkTarget => "ik-target",
            EdgeKind::IkLink => "ik-link",
        }
    }

    /// Graphviz arrowhead for this edge kind.
    pub fn arrowhead(&self) -> &'static str {
        match self {
            EdgeKind::ParentChild => "normal",
            EdgeKind::AppendParent => "normal",
            EdgeKind::IkTarget => "diamond",
            EdgeKind::IkLink => "diamond",
        }
    }

    /// Graphviz line style for this edge kind.
    pub fn line_style(&self) -> &'static str {
        match self {
            EdgeKind::ParentChild => "solid",
            EdgeKind::AppendParent => "dashed",
            EdgeKind::IkTarget => "bold",
            EdgeKind::IkLink => "dashed",
        }
    }
}

/// Attribute key under which append edges carry their inheritance ratio.
pub const EDGE_ATTR_WEIGHT: &str = "weight";

/// A directed edge: target node, kind tag, and string attributes.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    /// Target node of the edge.
    pub to: BoneNode,
    /// Kind tag.
    pub kind: EdgeKind,
    attrs: HashMap<String, String>,
}

impl EdgeInfo {
    /// Create an edge toward `to` with no attributes.
    pub fn new(to: BoneNode, kind: EdgeKind) -> Self {
        Self {
            to,
            kind,
            attrs: HashMap::new(),
        }
    }

    /// Attach an attribute (builder form).
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, Default)]
struct NodeEntry {
    attrs: NodeAttrs,
    edges: Vec<EdgeInfo>,
}

/// Directed graph over bone nodes.
///
/// Node enumeration yields first-insertion order, which downstream
/// serialization depends on for deterministic output. Parallel edges are
/// permitted (a bone may be linked twice in the same IK chain).
#[derive(Debug, Clone, Default)]
pub struct BoneGraph {
    order: Vec<BoneNode>,
    entries: HashMap<BoneNode, NodeEntry>,
}

impl BoneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Idempotent: re-adding an existing node is a no-op.
    pub fn add_node(&mut self, node: BoneNode) {
        if !self.entries.contains_key(&node) {
            self.order.push(node.clone());
            self.entries.insert(node, NodeEntry::default());
        }
    }

    /// Append a directed edge from `from`. Both endpoints are registered
    /// if absent.
    pub fn add_edge(&mut self, from: BoneNode, edge: EdgeInfo) {
        self.add_node(from.clone());
        self.add_node(edge.to.clone());
        if let Some(entry) = self.entries.get_mut(&from) {
            entry.edges.push(edge);
        }
    }

    /// Check whether a node is registered.
    pub fn contains(&self, node: &BoneNode) -> bool {
        self.entries.contains_key(node)
    }

    /// Iterate nodes in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &BoneNode> {
        self.order.iter()
    }

    /// Get a node's attributes.
    pub fn attrs(&self, node: &BoneNode) -> Option<&NodeAttrs> {
        self.entries.get(node).map(|entry| &entry.attrs)
    }

    /// Get a node's attributes for mutation.
    pub fn attrs_mut(&mut self, node: &BoneNode) -> Option<&mut NodeAttrs> {
        self.entries.get_mut(node).map(|entry| &mut entry.attrs)
    }

    /// Get a node's outgoing edges, in insertion order.
    pub fn edges(&self, node: &BoneNode) -> &[EdgeInfo] {
        self.entries
            .get(node)
            .map(|entry| entry.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of edges across all nodes.
    pub fn edge_count(&self) -> usize {
        self.entries.values().map(|entry| entry.edges.len()).sum()
    }

    /// Convert to a petgraph StableDiGraph for analysis.
    /// Returns the graph and a mapping from node id to NodeIndex.
    pub fn to_petgraph(&self) -> (StableDiGraph<BoneNode, EdgeKind>, HashMap<String, NodeIndex>) {
        let mut graph = StableDiGraph::new();
        let mut id_to_index = HashMap::new();

        for node in &self.order {
            let idx = graph.add_node(node.clone());
            id_to_index.insert(node.id.clone(), idx);
        }

        for node in &self.order {
            for edge in self.edges(node) {
                if let (Some(&from_idx), Some(&to_idx)) =
                    (id_to_index.get(&node.id), id_to_index.get(&edge.to.id))
                {
                    graph.add_edge(from_idx, to_idx, edge.kind);
                }
            }
        }

        (graph, id_to_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bone_node_identity_is_the_id() {
        let a = BoneNode::new(3);
        let b = BoneNode::new(3);
        let c = BoneNode::new(4);

        assert_eq!(a.id, "BONE_3");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn add_node_is_idempotent_and_order_preserving() {
        let mut g = BoneGraph::new();
        g.add_node(BoneNode::new(1));
        g.add_node(BoneNode::new(0));
        g.add_node(BoneNode::new(1));

        let ids: Vec<_> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["BONE_1", "BONE_0"]);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn add_edge_registers_both_endpoints() {
        let mut g = BoneGraph::new();
        let from = BoneNode::new(0);
        let to = BoneNode::new(1);
        g.add_edge(from.clone(), EdgeInfo::new(to.clone(), EdgeKind::ParentChild));

        assert!(g.contains(&from));
        assert!(g.contains(&to));
        assert_eq!(g.edges(&from).len(), 1);
        assert_eq!(g.edges(&to).len(), 0);
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut g = BoneGraph::new();
        let from = BoneNode::new(0);
        let to = BoneNode::new(1);
        g.add_edge(from.clone(), EdgeInfo::new(to.clone(), EdgeKind::IkLink));
        g.add_edge(from.clone(), EdgeInfo::new(to, EdgeKind::IkLink));

        assert_eq!(g.edges(&from).len(), 2);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn edge_visuals_match_the_legend() {
        assert_eq!(EdgeKind::ParentChild.arrowhead(), "normal");
        assert_eq!(EdgeKind::ParentChild.line_style(), "solid");
        assert_eq!(EdgeKind::IkTarget.arrowhead(), "diamond");
        assert_eq!(EdgeKind::IkTarget.line_style(), "bold");
        assert_eq!(EdgeKind::IkLink.arrowhead(), "diamond");
        assert_eq!(EdgeKind::IkLink.line_style(), "dashed");
        assert_eq!(EdgeKind::AppendParent.arrowhead(), "normal");
        assert_eq!(EdgeKind::AppendParent.line_style(), "dashed");
    }

    #[test]
    fn to_petgraph_preserves_counts() {
        let mut g = BoneGraph::new();
        g.add_node(BoneNode::new(0));
        g.add_edge(
            BoneNode::new(0),
            EdgeInfo::new(BoneNode::new(1), EdgeKind::ParentChild),
        );

        let (pg, index) = g.to_petgraph();
        assert_eq!(pg.node_count(), 2);
        assert_eq!(pg.edge_count(), 1);
        assert!(index.contains_key("BONE_0"));
        assert!(index.contains_key("BONE_1"));
    }

    #[test]
    fn rig_model_deserializes_with_defaults() {
        let json = r#"{
            "name": "test rig",
            "bones": [
                {"name": "root"},
                {"name": "arm", "parent": 0, "visible": false}
            ],
            "bodies": [
                {"bone": 1, "name": "arm body", "mode": "Dynamic"}
            ]
        }"#;

        let rig: RigModel = serde_json::from_str(json).unwrap();
        assert_eq!(rig.bone_count(), 2);
        assert_eq!(rig.body_count(), 1);
        assert!(rig.bones[0].controllable);
        assert!(rig.bones[0].visible);
        assert!(!rig.bones[1].visible);
        assert_eq!(rig.bones[1].parent, Some(0));
        assert!(rig.bodies[0].mode.is_dynamic());
    }
}
