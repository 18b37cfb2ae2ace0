//! Graph entities decoded from query results.
//!
//! Nodes and edges share the same property model: an insertion-ordered list
//! of named values. Property comparison is order-independent (same name/value
//! pairs in any order), while node label comparison is order-sensitive — the
//! server emits labels in a stable sequence and that sequence is part of
//! entity identity here.

use std::fmt;

use crate::error::{GraphError, Result};
use crate::response::value::GraphValue;

/// A single named property on a node or edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: GraphValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<GraphValue>) -> Self {
        Property {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Insertion-ordered property map shared by [`Node`] and [`Edge`].
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<Property>,
}

impl PropertyMap {
    pub fn new() -> Self {
        PropertyMap::default()
    }

    pub fn insert(&mut self, property: Property) {
        self.entries.push(property);
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|p| p.name != name);
    }

    pub fn get(&self, name: &str) -> Option<&GraphValue> {
        self.entries.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }
}

// Order-independent: equal when both maps hold exactly the same name/value
// pairs, regardless of insertion order. Maps are small, so the quadratic
// scan beats pulling in a hashing pass.
impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|p| {
                other
                    .entries
                    .iter()
                    .any(|q| q.name == p.name && q.value == p.value)
            })
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "}}")
    }
}

/// A graph node: server-assigned id, ordered labels, properties.
///
/// The id is unique within a graph at a point in time but not stable across
/// mutations that reorder entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(id: i64) -> Self {
        Node {
            id,
            ..Node::default()
        }
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn remove_label(&mut self, label: &str) {
        if let Some(pos) = self.labels.iter().position(|l| l == label) {
            self.labels.remove(pos);
        }
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<GraphValue>) {
        self.properties.insert(Property::new(name, value));
    }

    pub fn property(&self, name: &str) -> Option<&GraphValue> {
        self.properties.get(name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node{{id={}, labels=[{}], properties={}}}",
            self.id,
            self.labels.join(", "),
            self.properties
        )
    }
}

/// A graph edge: relationship type plus source/destination node ids.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    pub id: i64,
    pub relationship_type: String,
    pub source: i64,
    pub destination: i64,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<GraphValue>) {
        self.properties.insert(Property::new(name, value));
    }

    pub fn property(&self, name: &str) -> Option<&GraphValue> {
        self.properties.get(name)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Edge{{id={}, type={}, source={}, destination={}, properties={}}}",
            self.id, self.relationship_type, self.source, self.destination, self.properties
        )
    }
}

/// An immutable path: nodes interleaved with the edges connecting them.
///
/// Always holds `edges.len() == max(nodes.len() - 1, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Path {
    /// Build a path, enforcing the node/edge arity invariant.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        if edges.len() != nodes.len().saturating_sub(1) {
            return Err(GraphError::protocol(format!(
                "path arity mismatch: {} nodes with {} edges",
                nodes.len(),
                edges.len()
            )));
        }
        Ok(Path { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge count.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path{{nodes=[")?;
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{n}")?;
        }
        write!(f, "], edges=[")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]}}")
    }
}
