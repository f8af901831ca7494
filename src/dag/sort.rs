//! Topological sort with cycle detection
//!
//! Depth-first post-order over the adjacency view, reversed. The DFS keeps an
//! explicit stack, so chain length is bounded by heap rather than call depth.
//! Traversal state is a color map owned by the call:
//! - White: unvisited (absent from the map)
//! - Gray: on the current DFS path
//! - Black: node and all descendants emitted
//!
//! Reaching a Gray node is a back-edge, i.e. a cycle.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{RecipeError, Result};

use super::graph::Dag;
use super::node::Node;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Gray,
    Black,
}

struct Traversal<'g> {
    dag: &'g Dag,
    colors: FxHashMap<&'g str, Color>,
    path: Vec<&'g str>,
    postorder: Vec<&'g Node>,
}

impl<'g> Traversal<'g> {
    fn new(dag: &'g Dag) -> Self {
        let capacity = dag.node_count();
        Self {
            dag,
            colors: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            path: Vec::new(),
            postorder: Vec::with_capacity(capacity),
        }
    }

    /// Iterative DFS from `root`; each frame is a node and its next successor index
    fn visit(&mut self, root: &'g Node) -> Result<()> {
        let dag = self.dag;
        let mut stack: Vec<(&'g Node, usize)> = vec![(root, 0)];
        self.colors.insert(root.id(), Color::Gray);
        self.path.push(root.id());

        while let Some((node, next)) = stack.last_mut() {
            let node: &'g Node = *node;
            let Some(succ) = dag.successors(node.id()).get(*next) else {
                stack.pop();
                self.path.pop();
                self.colors.insert(node.id(), Color::Black);
                self.postorder.push(node);
                continue;
            };
            *next += 1;

            let succ: &'g str = succ;
            match self.colors.get(succ) {
                Some(Color::Gray) => return Err(self.cycle_error(succ)),
                Some(Color::Black) => {}
                None => {
                    let child = dag.node(succ).ok_or_else(|| RecipeError::InvalidDag {
                        missing: vec![succ.to_string()],
                    })?;
                    self.colors.insert(child.id(), Color::Gray);
                    self.path.push(child.id());
                    stack.push((child, 0));
                }
            }
        }

        Ok(())
    }

    /// Build the cycle path from the DFS stack, closing it on `back_to`
    fn cycle_error(&self, back_to: &str) -> RecipeError {
        // Gray means `back_to` is on the current path
        let start = self
            .path
            .iter()
            .position(|id| *id == back_to)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..].iter().map(|id| id.to_string()).collect();
        cycle.push(back_to.to_string());
        RecipeError::CycleDetected { cycle }
    }
}

impl Dag {
    /// One valid execution order: every edge `u -> v` has `u` before `v`
    ///
    /// Fails with `CycleDetected` on a back-edge and with `InvalidDag` when an
    /// edge leads to an identifier that has no node. Does not call
    /// [`Dag::validate`]; edges whose source is unknown are never reached.
    pub fn topological_sort(&self) -> Result<Vec<&Node>> {
        let mut traversal = Traversal::new(self);

        for node in self.nodes() {
            if !traversal.colors.contains_key(node.id()) {
                traversal.visit(node)?;
            }
        }

        let mut order = traversal.postorder;
        order.reverse();
        debug!(nodes = order.len(), "topological sort complete");
        Ok(order)
    }

    /// `Ok(())` if acyclic, `Err(CycleDetected)` with the cycle path otherwise
    pub fn detect_cycles(&self) -> Result<()> {
        self.topological_sort().map(|_| ())
    }
}
