//! DAG Module - recipe action graph
//!
//! - `node`: Node, NodeKind, Edge and the NodeRef endpoint union
//! - `graph`: Dag (node registry, edge set, adjacency view)
//! - `sort`: topological sort with cycle detection
//! - `validate`: referential integrity checks and renderer export

mod graph;
mod node;
mod sort;
mod validate;

pub use graph::{Dag, SuccessorVec};
pub use node::{Edge, Node, NodeKind, NodeRef, START_ID};
pub use validate::{DagExport, EdgeKind, ExportedEdge};
