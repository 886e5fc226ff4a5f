//! Instance-level frame graphs.
//!
//! A graph is an arena of nodes addressed by [`NodeId`]; links hold node ids
//! rather than owned children, so shared substructure and cycles are
//! representable without reference counting. The renderers decide what a
//! cycle means (hard error on the expression path, normal input on the
//! individual path) — the model just reports it.

use crate::number::NumberValue;
use crate::Identity;
use serde::{Deserialize, Serialize};

/// Index of a node within one [`InstanceGraph`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node's type: one concept, or a disjunction of concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeTyping {
    Atomic(Identity),
    Disjunction(Vec<Identity>),
}

impl NodeTyping {
    pub fn disjuncts(&self) -> &[Identity] {
        match self {
            NodeTyping::Atomic(id) => std::slice::from_ref(id),
            NodeTyping::Disjunction(ids) => ids,
        }
    }
}

/// Object-valued slot: a property edge to one or more value nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub property: Identity,
    pub values: Vec<NodeId>,
}

/// Data-valued slot carrying numeric values.
///
/// At most one value is meaningful for rendering; only the first present
/// value is ever used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub property: Identity,
    pub values: Vec<NumberValue>,
}

impl Feature {
    pub fn first_value(&self) -> Option<&NumberValue> {
        self.values.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub typing: NodeTyping,
    /// Set when this node stands for a previously stored or externally
    /// identified individual. Referenced nodes are never expanded
    /// recursively — they render as a reference to the existing individual.
    pub reference: Option<Identity>,
    pub links: Vec<Link>,
    pub features: Vec<Feature>,
}

impl InstanceNode {
    fn new(typing: NodeTyping) -> Self {
        Self {
            typing,
            reference: None,
            links: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// An instance-level frame graph: node arena plus a designated root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceGraph {
    nodes: Vec<InstanceNode>,
}

impl InstanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, typing: NodeTyping) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(InstanceNode::new(typing));
        id
    }

    pub fn add_atomic(&mut self, concept: impl Into<Identity>) -> NodeId {
        self.add_node(NodeTyping::Atomic(concept.into()))
    }

    pub fn add_disjunction<I, T>(&mut self, concepts: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
        T: Into<Identity>,
    {
        self.add_node(NodeTyping::Disjunction(
            concepts.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn node(&self, id: NodeId) -> &InstanceNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut InstanceNode {
        &mut self.nodes[id.index()]
    }

    pub fn set_reference(&mut self, id: NodeId, reference: impl Into<Identity>) {
        self.node_mut(id).reference = Some(reference.into());
    }

    /// Append `value` to the link for `property`, creating the link on first
    /// use so repeated additions accumulate into one multi-valued slot.
    pub fn add_link(&mut self, from: NodeId, property: impl Into<Identity>, value: NodeId) {
        let property = property.into();
        let node = self.node_mut(from);
        if let Some(link) = node.links.iter_mut().find(|l| l.property == property) {
            link.values.push(value);
        } else {
            node.links.push(Link {
                property,
                values: vec![value],
            });
        }
    }

    pub fn add_feature(
        &mut self,
        node: NodeId,
        property: impl Into<Identity>,
        value: NumberValue,
    ) {
        let property = property.into();
        let node = self.node_mut(node);
        if let Some(feature) = node.features.iter_mut().find(|f| f.property == property) {
            feature.values.push(value);
        } else {
            node.features.push(Feature {
                property,
                values: vec![value],
            });
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Depth-first cycle check over the nodes reachable from `from`.
    ///
    /// Reference nodes terminate traversal: they render as a pointer to an
    /// existing individual, so an edge back into one cannot produce
    /// unbounded recursion in any renderer.
    pub fn has_cycle(&self, from: NodeId) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit(graph: &InstanceGraph, id: NodeId, marks: &mut [Mark]) -> bool {
            match marks[id.index()] {
                Mark::InProgress => return true,
                Mark::Done => return false,
                Mark::Unvisited => {}
            }
            let node = graph.node(id);
            if node.is_reference() {
                marks[id.index()] = Mark::Done;
                return false;
            }
            marks[id.index()] = Mark::InProgress;
            for link in &node.links {
                for &value in &link.values {
                    if visit(graph, value, marks) {
                        return true;
                    }
                }
            }
            marks[id.index()] = Mark::Done;
            false
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        visit(self, from, &mut marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acyclic_graph_reports_no_cycle() {
        let mut graph = InstanceGraph::new();
        let root = graph.add_atomic("Patient");
        let condition = graph.add_atomic("Diabetes");
        graph.add_link(root, "hasCondition", condition);
        assert!(!graph.has_cycle(root));
    }

    #[test]
    fn self_loop_and_long_cycle_are_detected() {
        let mut graph = InstanceGraph::new();
        let a = graph.add_atomic("A");
        graph.add_link(a, "p", a);
        assert!(graph.has_cycle(a));

        let mut graph = InstanceGraph::new();
        let a = graph.add_atomic("A");
        let b = graph.add_atomic("B");
        let c = graph.add_atomic("C");
        graph.add_link(a, "p", b);
        graph.add_link(b, "p", c);
        graph.add_link(c, "p", a);
        assert!(graph.has_cycle(a));
    }

    #[test]
    fn diamond_sharing_is_not_a_cycle() {
        let mut graph = InstanceGraph::new();
        let top = graph.add_atomic("Top");
        let left = graph.add_atomic("Left");
        let right = graph.add_atomic("Right");
        let bottom = graph.add_atomic("Bottom");
        graph.add_link(top, "p", left);
        graph.add_link(top, "p", right);
        graph.add_link(left, "q", bottom);
        graph.add_link(right, "q", bottom);
        assert!(!graph.has_cycle(top));
    }

    #[test]
    fn edges_into_reference_nodes_never_cycle() {
        let mut graph = InstanceGraph::new();
        let a = graph.add_atomic("A");
        let b = graph.add_atomic("B");
        graph.add_link(a, "p", b);
        graph.add_link(b, "p", a);
        graph.set_reference(a, "stored-a");
        // b -> a closes a loop structurally, but a is a reference.
        assert!(!graph.has_cycle(b));
    }

    #[test]
    fn repeated_link_additions_accumulate_one_slot() {
        let mut graph = InstanceGraph::new();
        let root = graph.add_atomic("Root");
        let x = graph.add_atomic("X");
        let y = graph.add_atomic("Y");
        graph.add_link(root, "p", x);
        graph.add_link(root, "p", y);
        assert_eq!(graph.node(root).links.len(), 1);
        assert_eq!(graph.node(root).links[0].values, vec![x, y]);
    }
}
