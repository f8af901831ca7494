//! Property tests for topological ordering
//!
//! Random forward-only edge sets are acyclic by construction; a random
//! back-edge closes a cycle.

use proptest::prelude::*;
use recipe_dag::{Dag, Node, RecipeError};

/// Nodes n0..n{size} with edges only from lower to higher index
fn forward_dag(size: usize, pairs: &[(usize, usize)]) -> Dag {
    let mut dag = Dag::new();
    // Insert in reverse so enumeration order disagrees with edge direction
    for i in (0..size).rev() {
        dag.insert_node(Node::step(format!("n{i}"), format!("node {i}")));
    }
    for &(a, b) in pairs {
        let (lo, hi) = (a.min(b), a.max(b));
        if lo != hi {
            dag.add_edge(format!("n{lo}").as_str(), format!("n{hi}").as_str());
        }
    }
    dag
}

proptest! {
    #[test]
    fn order_is_an_edge_respecting_permutation(
        size in 1usize..40,
        pairs in prop::collection::vec((0usize..40, 0usize..40), 0..120),
    ) {
        let pairs: Vec<(usize, usize)> = pairs
            .into_iter()
            .map(|(a, b)| (a % size, b % size))
            .collect();
        let dag = forward_dag(size, &pairs);

        prop_assert!(dag.validate().is_ok());
        let order = dag.topological_sort().unwrap();
        prop_assert_eq!(order.len(), dag.node_count());

        let position = |id: &str| order.iter().position(|n| n.id() == id).unwrap();
        for edge in dag.edges() {
            prop_assert!(position(&edge.from) < position(&edge.to));
        }
    }

    #[test]
    fn sorting_is_repeatable(
        size in 1usize..30,
        pairs in prop::collection::vec((0usize..30, 0usize..30), 0..60),
    ) {
        let pairs: Vec<(usize, usize)> = pairs
            .into_iter()
            .map(|(a, b)| (a % size, b % size))
            .collect();
        let dag = forward_dag(size, &pairs);

        let first: Vec<String> = dag.topological_sort().unwrap().iter().map(|n| n.id().to_string()).collect();
        let second: Vec<String> = dag.topological_sort().unwrap().iter().map(|n| n.id().to_string()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn back_edge_is_always_a_cycle(size in 2usize..30) {
        let chain: Vec<(usize, usize)> = (0..size - 1).map(|i| (i, i + 1)).collect();
        let mut dag = forward_dag(size, &chain);
        dag.add_edge(format!("n{}", size - 1).as_str(), "n0");

        let is_cycle = matches!(
            dag.topological_sort(),
            Err(RecipeError::CycleDetected { .. })
        );
        prop_assert!(is_cycle);
    }
}
