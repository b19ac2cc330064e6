//! Visual classification of nodes.
//!
//! Shape, fill color, and outline style are each resolved by an ordered
//! first-match-wins rule list over the node's semantic attributes. Every
//! list ends in an unconditional catch-all, so resolution never falls
//! through. Edge visuals are not rule lists; they live on
//! [`rig_graph_core::EdgeKind`] as exhaustive matches.

use rig_graph_core::NodeAttrs;

use crate::annotate::{
    ATTR_CONTROLLABLE, ATTR_DYNAMIC_PHYSICS, ATTR_HIDDEN, ATTR_IK, ATTR_NOT_CONTROLLABLE,
    ATTR_VISIBLE,
};

/// Predicate over a node's attributes.
pub type NodeSifter = fn(&NodeAttrs) -> bool;

/// An ordered rule list mapping node attributes to one visual value.
///
/// Rules are evaluated top to bottom; the first matching rule wins.
pub struct Legend {
    rules: Vec<(NodeSifter, &'static str)>,
}

impl Legend {
    fn new(rules: Vec<(NodeSifter, &'static str)>) -> Self {
        Self { rules }
    }

    /// Resolve the visual value for the given attributes.
    pub fn resolve(&self, attrs: &NodeAttrs) -> &'static str {
        for (sifter, value) in &self.rules {
            if sifter(attrs) {
                return value;
            }
        }
        // Every constructor below ends its list with an unconditional rule.
        unreachable!("legend rule list has no catch-all")
    }

    #[cfg(test)]
    fn catch_all(&self) -> &(NodeSifter, &'static str) {
        self.rules.last().expect("legend rule list is empty")
    }
}

/// Node shape rules, top priority first.
pub fn shape_legend() -> Legend {
    Legend::new(vec![
        (
            |a| a.has(ATTR_IK) && a.has(ATTR_CONTROLLABLE),
            "doubleoctagon",
        ),
        (|a| a.has(ATTR_IK) && a.has(ATTR_NOT_CONTROLLABLE), "octagon"),
        (|a| a.has(ATTR_CONTROLLABLE), "box"),
        (|a| a.has(ATTR_NOT_CONTROLLABLE), "ellipse"),
        (|_| true, "box"),
    ])
}

/// Node fill color rules, top priority first.
pub fn color_legend() -> Legend {
    Legend::new(vec![
        (|a| a.has(ATTR_IK) && a.has(ATTR_CONTROLLABLE), "orange"),
        (|a| a.has(ATTR_IK) && a.has(ATTR_NOT_CONTROLLABLE), "yellow"),
        (|a| a.has(ATTR_DYNAMIC_PHYSICS), "lightblue"),
        (|_| true, "white"),
    ])
}

/// Node outline style rules, top priority first.
pub fn style_legend() -> Legend {
    Legend::new(vec![
        (|a| a.has(ATTR_VISIBLE), "solid, filled"),
        (|a| a.has(ATTR_HIDDEN), "dashed, filled"),
        (|_| true, "solid, filled"),
    ])
}
