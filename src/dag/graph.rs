//! Dag - node registry + edge set with a lazily derived adjacency view
//!
//! - Arc<str> identifiers, interned against the node map where possible
//! - FxHashMap/FxHashSet for lookups, Vec for deterministic enumeration
//! - SmallVec successor lists (most substeps have 1-2 successors)
//!
//! Edge insertion is unchecked so a graph can be assembled before all of its
//! nodes exist. Call [`Dag::validate`] before trusting the result.

use std::mem;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use super::node::{Edge, Node, NodeRef, START_ID};

/// Stack-allocated successors: most nodes have 0-4 outgoing edges
pub type SuccessorVec = SmallVec<[Arc<str>; 4]>;

pub(crate) type Adjacency = FxHashMap<Arc<str>, SuccessorVec>;

/// Directed graph of recipe actions rooted at a synthetic start node
#[derive(Debug)]
pub struct Dag {
    /// identifier -> node
    nodes: FxHashMap<Arc<str>, Node>,
    /// Identifiers in first-insertion order (enumeration order)
    order: Vec<Arc<str>>,
    /// Edges in first-insertion order
    edges: Vec<Edge>,
    /// Set view of `edges` for duplicate absorption
    edge_set: FxHashSet<Edge>,
    /// Derived from `edges`, reset on every new edge
    adjacency: OnceCell<Adjacency>,
}

impl Default for Dag {
    fn default() -> Self {
        Self::new()
    }
}

impl Dag {
    /// Create a graph holding only the start node
    pub fn new() -> Self {
        let mut dag = Self {
            nodes: FxHashMap::default(),
            order: Vec::new(),
            edges: Vec::new(),
            edge_set: FxHashSet::default(),
            adjacency: OnceCell::new(),
        };
        dag.insert_node(Node::start());
        dag
    }

    /// Add or overwrite a node by identifier (last write wins)
    ///
    /// An overwritten node keeps its enumeration position; the replaced node
    /// is returned.
    pub fn insert_node(&mut self, node: Node) -> Option<Node> {
        if let Some(slot) = self.nodes.get_mut(node.id()) {
            trace!(id = node.id(), "overwriting node");
            return Some(mem::replace(slot, node));
        }
        let id = Arc::clone(node.id_arc());
        self.order.push(Arc::clone(&id));
        self.nodes.insert(id, node);
        None
    }

    /// Store a directed edge `from -> to`
    ///
    /// Endpoints are not checked against the node map. Duplicates are
    /// absorbed; returns `true` when the edge is new.
    pub fn add_edge<'a, 'b>(
        &mut self,
        from: impl Into<NodeRef<'a>>,
        to: impl Into<NodeRef<'b>>,
    ) -> bool {
        let from = self.intern(from.into().id());
        let to = self.intern(to.into().id());
        let edge = Edge { from, to };

        if self.edge_set.contains(&edge) {
            return false;
        }
        trace!(%edge, "adding edge");
        self.edge_set.insert(edge.clone());
        self.edges.push(edge);
        self.adjacency.take();
        true
    }

    /// Reuse the node map's Arc for a known identifier
    fn intern(&self, id: &str) -> Arc<str> {
        self.nodes
            .get_key_value(id)
            .map_or_else(|| Arc::from(id), |(key, _)| Arc::clone(key))
    }

    #[inline]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.get(START_ID)
    }

    /// Nodes in enumeration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adjacency view, rebuilt on first read after a mutation
    pub(crate) fn adjacency(&self) -> &Adjacency {
        self.adjacency.get_or_init(|| {
            let mut adjacency: Adjacency =
                FxHashMap::with_capacity_and_hasher(self.nodes.len(), Default::default());
            for edge in &self.edges {
                adjacency
                    .entry(Arc::clone(&edge.from))
                    .or_default()
                    .push(Arc::clone(&edge.to));
            }
            trace!(sources = adjacency.len(), "rebuilt adjacency view");
            adjacency
        })
    }

    /// Direct successors of a node
    #[inline]
    pub fn successors(&self, id: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.adjacency()
            .get(id)
            .map_or(EMPTY, SmallVec::as_slice)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.successors(from).iter().any(|succ| succ.as_ref() == to)
    }
}
