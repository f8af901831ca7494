//! Graph nodes and the endpoint union accepted by `Dag::add_edge`

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Identifier of the synthetic "no prerequisite" node
pub const START_ID: &str = "start";

/// What a node stands for in the recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Ingredient,
    Step,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Ingredient => "ingredient",
            NodeKind::Step => "step",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single atomic action (or the start marker)
///
/// Immutable once created. Traversal state never lives here; the sorter
/// keeps its own color map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: Arc<str>,
    label: String,
    kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<Arc<str>>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn start() -> Self {
        Self::new(START_ID, START_ID, NodeKind::Start)
    }

    pub fn ingredient(id: impl Into<Arc<str>>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Ingredient)
    }

    pub fn step(id: impl Into<Arc<str>>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::Step)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shared handle to the identifier (O(1) clone)
    #[inline]
    pub fn id_arc(&self) -> &Arc<str> {
        &self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Edge endpoint: either a node or a raw identifier
///
/// Resolved to an identifier before `add_edge` touches the edge set.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Node(&'a Node),
    Id(&'a str),
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> &'a str {
        match self {
            NodeRef::Node(node) => node.id(),
            NodeRef::Id(id) => id,
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        NodeRef::Node(node)
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(id: &'a str) -> Self {
        NodeRef::Id(id)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(id: &'a String) -> Self {
        NodeRef::Id(id.as_str())
    }
}

impl<'a> From<&'a Arc<str>> for NodeRef<'a> {
    fn from(id: &'a Arc<str>) -> Self {
        NodeRef::Id(id.as_ref())
    }
}

/// Directed edge between two identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: Arc<str>,
    pub to: Arc<str>,
}

impl Edge {
    pub fn new(from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}
