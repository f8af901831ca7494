//! DAG validation and export
//!
//! Validates:
//! - Every edge endpoint resolves to a node (referential integrity)
//!
//! Export hands a validated snapshot to renderers, tagging edges so they can
//! skip trivial start -> ingredient wiring.
//!
//! Error codes:
//! - RDAG-020: Edge references an identifier with no node

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RecipeError, Result};

use super::graph::Dag;
use super::node::{Node, NodeKind};

/// Rendering hint for an exported edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// start -> ingredient: valid, but carries no ordering information
    Trivial,
    /// Any other edge
    Dependency,
}

impl EdgeKind {
    pub fn classify(from: &Node, to: &Node) -> Self {
        match (from.kind(), to.kind()) {
            (NodeKind::Start, NodeKind::Ingredient) => EdgeKind::Trivial,
            _ => EdgeKind::Dependency,
        }
    }

    #[inline]
    pub fn is_suppressible(self) -> bool {
        self == EdgeKind::Trivial
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedEdge<'g> {
    pub from: &'g Node,
    pub to: &'g Node,
    pub kind: EdgeKind,
}

/// Validated nodes and edges of a [`Dag`]
#[derive(Debug, Clone, Serialize)]
pub struct DagExport<'g> {
    pub nodes: Vec<&'g Node>,
    pub edges: Vec<ExportedEdge<'g>>,
}

impl<'g> DagExport<'g> {
    /// Edges a renderer should draw when trivial edges are hidden
    pub fn drawn_edges(&self) -> impl Iterator<Item = &ExportedEdge<'g>> + '_ {
        self.edges.iter().filter(|edge| !edge.kind.is_suppressible())
    }
}

impl Dag {
    /// Check that both endpoints of every edge exist
    ///
    /// Collects every missing identifier (first-seen order, no repeats)
    /// into a single `InvalidDag` error.
    pub fn validate(&self) -> Result<()> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut missing: Vec<String> = Vec::new();

        for edge in self.edges() {
            for id in [&*edge.from, &*edge.to] {
                if !self.contains(id) && seen.insert(id) {
                    missing.push(id.to_string());
                }
            }
        }

        if missing.is_empty() {
            debug!(
                nodes = self.node_count(),
                edges = self.edge_count(),
                "dag validated"
            );
            return Ok(());
        }

        warn!(count = missing.len(), "dag references undefined identifiers");
        Err(RecipeError::InvalidDag { missing })
    }

    /// Validate, then snapshot nodes and classified edges
    pub fn export(&self) -> Result<DagExport<'_>> {
        self.validate()?;

        let edges = self
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = self.node(&edge.from)?;
                let to = self.node(&edge.to)?;
                Some(ExportedEdge {
                    from,
                    to,
                    kind: EdgeKind::classify(from, to),
                })
            })
            .collect();

        Ok(DagExport {
            nodes: self.nodes().collect(),
            edges,
        })
    }
}
