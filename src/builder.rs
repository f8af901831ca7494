//! Recipe graph builder
//!
//! Flattens a [`Recipe`] into a [`Dag`]:
//! - every ingredient becomes an `Ingredient` node fed from start
//! - every substep becomes a `Step` node, chained within its step
//! - steps are not nodes; their first/last substeps are the entry and exit
//!   points for dependency edges
//!
//! Step dependencies are wired in a second pass because a step may name one
//! that appears later in the document. Names that resolve to nothing are not
//! builder errors: they leave dangling edges that [`Dag::validate`] reports.
//! Dangling endpoints contain a space, which no slug can, so an unresolved
//! name never lands on an unrelated node.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::dag::{Dag, Node, NodeKind, START_ID};
use crate::error::{RecipeError, Result};
use crate::recipe::{Ingredient, Recipe, Step};
use crate::slug::slugify;

/// Identifier of the `position`-th (1-based) substep of a step
pub fn substep_id(step_slug: &str, position: usize) -> String {
    format!("{step_slug}/{position}")
}

/// Endpoint for a dependency name that resolved to nothing
///
/// Never a node identifier: slugs have no spaces.
pub fn unresolved_id(kind: &str, slug: &str) -> String {
    format!("{kind} {slug}")
}

/// Node label for an ingredient
pub fn ingredient_label(ingredient: &Ingredient) -> String {
    match &ingredient.amount {
        Some(amount) => format!("Measure out {} of {}", amount, ingredient.name),
        None => format!("Measure out {}", ingredient.name),
    }
}

/// Node label for a substep
pub fn substep_label(step_name: &str, position: usize, total: usize, text: &str) -> String {
    format!("({step_name} - {position}/{total}) {text}")
}

/// Entry and exit substeps of a step
#[derive(Debug, Clone)]
struct StepBounds {
    first: Arc<str>,
    last: Arc<str>,
}

/// Walks a recipe and issues node and edge insertions
pub struct RecipeGraphBuilder<'r> {
    recipe: &'r Recipe,
    /// identifier -> description of the definition that claimed it
    defined: FxHashMap<String, String>,
    /// step slug -> step name, for duplicate step detection
    step_names: FxHashMap<String, String>,
    bounds: FxHashMap<String, StepBounds>,
    /// (dependent step slug, dependency slugs) in document order
    deferred: Vec<(String, Vec<String>)>,
}

impl<'r> RecipeGraphBuilder<'r> {
    pub fn new(recipe: &'r Recipe) -> Self {
        Self {
            recipe,
            defined: FxHashMap::default(),
            step_names: FxHashMap::default(),
            bounds: FxHashMap::default(),
            deferred: Vec::new(),
        }
    }

    /// Build a fresh DAG from the recipe
    pub fn build(self) -> Result<Dag> {
        let mut dag = Dag::new();
        self.build_into(&mut dag)?;
        Ok(dag)
    }

    /// Add the recipe's nodes and edges to an existing DAG
    ///
    /// Only identifiers defined by this recipe are checked for collisions;
    /// nodes already present in `dag` are overwritten.
    pub fn build_into(mut self, dag: &mut Dag) -> Result<()> {
        if !dag.contains(START_ID) {
            dag.insert_node(Node::start());
        }

        self.claim(START_ID, "the start node".to_string())?;

        let recipe = self.recipe;
        for (group, ingredient) in recipe.all_ingredients() {
            self.add_ingredient(dag, group, ingredient)?;
        }
        for step in &recipe.steps {
            self.add_step(dag, step)?;
        }
        self.wire_step_dependencies(dag);

        info!(
            nodes = dag.node_count(),
            edges = dag.edge_count(),
            steps = recipe.steps.len(),
            "built recipe graph"
        );
        Ok(())
    }

    /// Claim an identifier, failing if another definition already owns it
    fn claim(&mut self, id: &str, origin: String) -> Result<()> {
        if let Some(first) = self.defined.get(id) {
            return Err(RecipeError::DuplicateIdentifier {
                id: id.to_string(),
                first: first.clone(),
                second: origin,
            });
        }
        self.defined.insert(id.to_string(), origin);
        Ok(())
    }

    fn add_ingredient(&mut self, dag: &mut Dag, group: &str, ingredient: &Ingredient) -> Result<()> {
        let id = slugify(&ingredient.name);
        self.claim(&id, format!("ingredient '{}' in group '{}'", ingredient.name, group))?;

        debug!(%id, group, "adding ingredient");
        dag.insert_node(Node::ingredient(id.as_str(), ingredient_label(ingredient)));
        dag.add_edge(START_ID, &id);
        Ok(())
    }

    fn add_step(&mut self, dag: &mut Dag, step: &Step) -> Result<()> {
        let step_slug = slugify(&step.name);
        if let Some(first) = self.step_names.get(&step_slug) {
            return Err(RecipeError::DuplicateIdentifier {
                id: step_slug,
                first: format!("step '{first}'"),
                second: format!("step '{}'", step.name),
            });
        }
        self.step_names.insert(step_slug.clone(), step.name.clone());

        // Reject malformed step_dep before touching the graph
        let step_deps: Vec<String> = match &step.step_dep {
            None => Vec::new(),
            Some(dep) => dep
                .names()
                .ok_or_else(|| RecipeError::MalformedStepDependency {
                    step: step.name.clone(),
                    found: dep.describe(),
                })?
                .into_iter()
                .map(slugify)
                .collect(),
        };

        if step.substeps.is_empty() {
            return Err(RecipeError::EmptyStep {
                step: step.name.clone(),
            });
        }

        let total = step.substeps.len();
        let mut substep_ids: Vec<Arc<str>> = Vec::with_capacity(total);
        for (index, text) in step.substeps.iter().enumerate() {
            let position = index + 1;
            let id: Arc<str> = Arc::from(substep_id(&step_slug, position));
            self.claim(&id, format!("substep {} of step '{}'", position, step.name))?;

            dag.insert_node(Node::step(
                Arc::clone(&id),
                substep_label(&step.name, position, total, text),
            ));
            substep_ids.push(id);
        }

        for pair in substep_ids.windows(2) {
            dag.add_edge(&pair[0], &pair[1]);
        }

        let bounds = StepBounds {
            first: Arc::clone(&substep_ids[0]),
            last: Arc::clone(&substep_ids[total - 1]),
        };

        for name in step.ingredient_names() {
            let slug = slugify(name);
            let is_ingredient = dag
                .node(&slug)
                .is_some_and(|node| node.kind() == NodeKind::Ingredient);
            if is_ingredient {
                dag.add_edge(&slug, &bounds.first);
            } else {
                dag.add_edge(unresolved_id("ingredient", &slug).as_str(), &bounds.first);
            }
        }

        if step_deps.is_empty() {
            if !step.has_ingredient_deps() {
                dag.add_edge(START_ID, &bounds.first);
            }
        } else {
            self.deferred.push((step_slug.clone(), step_deps));
        }

        debug!(step = %step.name, substeps = total, "added step");
        self.bounds.insert(step_slug, bounds);
        Ok(())
    }

    /// Second pass: dependency's last substep -> dependent's first substep
    fn wire_step_dependencies(&mut self, dag: &mut Dag) {
        for (step_slug, deps) in &self.deferred {
            let Some(target) = self.bounds.get(step_slug) else {
                continue;
            };
            for dep in deps {
                match self.bounds.get(dep) {
                    Some(source) => dag.add_edge(&source.last, &target.first),
                    None => dag.add_edge(unresolved_id("step", dep).as_str(), &target.first),
                };
            }
        }
    }
}

/// Build and validate a DAG in one call
pub fn build_validated(recipe: &Recipe) -> Result<Dag> {
    let dag = RecipeGraphBuilder::new(recipe).build()?;
    dag.validate()?;
    Ok(dag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(yaml: &str) -> Result<Dag> {
        RecipeGraphBuilder::new(&Recipe::from_yaml(yaml).unwrap()).build()
    }

    #[test]
    fn labels() {
        let ingredient = Ingredient {
            name: "flour".into(),
            amount: None,
        };
        assert_eq!(ingredient_label(&ingredient), "Measure out flour");
        assert_eq!(substep_label("Mix", 1, 3, "Stir"), "(Mix - 1/3) Stir");
        assert_eq!(substep_id("mix-dough", 2), "mix-dough/2");
    }

    #[test]
    fn substeps_are_chained() {
        let dag = build(
            r#"
steps:
  - name: Knead Dough
    do: [Fold, Push, Turn]
"#,
        )
        .unwrap();
        assert!(dag.has_edge(START_ID, "knead-dough/1"));
        assert!(dag.has_edge("knead-dough/1", "knead-dough/2"));
        assert!(dag.has_edge("knead-dough/2", "knead-dough/3"));
        assert_eq!(
            dag.node("knead-dough/3").map(Node::label),
            Some("(Knead Dough - 3/3) Turn")
        );
        assert_eq!(dag.node("knead-dough/1").map(Node::kind), Some(NodeKind::Step));
    }

    #[test]
    fn repeated_substep_text_stays_distinct() {
        let dag = build(
            r#"
steps:
  - name: First Rise
    do: [Let rest]
  - name: Second Rise
    do: [Let rest]
    step_dep: First Rise
"#,
        )
        .unwrap();
        assert!(dag.contains("first-rise/1"));
        assert!(dag.contains("second-rise/1"));
        assert!(dag.has_edge("first-rise/1", "second-rise/1"));
    }

    #[test]
    fn forward_step_dependency_is_wired() {
        let dag = build(
            r#"
steps:
  - name: Bake
    do: [Bake]
    step_dep: [Shape, Preheat]
  - name: Shape
    do: [Braid, Tuck]
  - name: Preheat
    do: [Heat oven]
"#,
        )
        .unwrap();
        assert!(dag.has_edge("shape/2", "bake/1"));
        assert!(dag.has_edge("preheat/1", "bake/1"));
        assert!(!dag.has_edge(START_ID, "bake/1"));
        assert!(dag.validate().is_ok());
    }

    #[test]
    fn empty_dependencies_count_as_none() {
        let dag = build(
            r#"
steps:
  - name: Mix
    do: [Stir]
    ing_dep: []
    step_dep: []
"#,
        )
        .unwrap();
        assert!(dag.has_edge(START_ID, "mix/1"));
    }

    #[test]
    fn malformed_step_dep_fails_fast() {
        let err = build(
            r#"
steps:
  - name: Rest
    do: [Wait]
    step_dep: 42
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecipeError::MalformedStepDependency { ref step, .. } if step == "Rest"));
        assert!(err.to_string().contains("number `42`"));
    }

    #[test]
    fn duplicate_ingredients_fail_fast() {
        let err = build(
            r#"
ingredients:
  dough:
    - Flour: { amount: 1 cup }
  dusting:
    - flour: { amount: 1 tbsp }
"#,
        )
        .unwrap_err();
        match err {
            RecipeError::DuplicateIdentifier { id, first, second } => {
                assert_eq!(id, "flour");
                assert!(first.contains("dough"));
                assert!(second.contains("dusting"));
            }
            other => panic!("expected DuplicateIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_steps_fail_fast() {
        let err = build(
            r#"
steps:
  - name: Mix
    do: [Stir]
  - name: mix
    do: [Stir again]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("RDAG-011"));
    }

    #[test]
    fn empty_step_is_rejected() {
        let err = build(
            r#"
steps:
  - name: Nothing
    do: []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecipeError::EmptyStep { .. }));
    }

    #[test]
    fn build_into_keeps_existing_start() {
        let recipe = Recipe::from_yaml("steps: [{name: Mix, do: [Stir]}]").unwrap();
        let mut dag = Dag::new();
        RecipeGraphBuilder::new(&recipe).build_into(&mut dag).unwrap();
        assert_eq!(dag.nodes().filter(|n| n.kind() == NodeKind::Start).count(), 1);
        assert!(dag.has_edge(START_ID, "mix/1"));
    }

    #[test]
    fn build_validated_surfaces_unknown_names() {
        let recipe = Recipe::from_yaml(
            r#"
steps:
  - name: Glaze
    do: [Brush]
    ing_dep: [{ name: maple syrup }]
    step_dep: Bake
"#,
        )
        .unwrap();
        let msg = build_validated(&recipe).unwrap_err().to_string();
        assert!(msg.contains("Not found: ingredient maple-syrup"));
        assert!(msg.contains("Not found: step bake"));
    }

    #[test]
    fn ingredient_named_start_is_a_duplicate() {
        let err = build(
            r#"
ingredients:
  odd:
    - Start: { amount: 1 }
"#,
        )
        .unwrap_err();
        match err {
            RecipeError::DuplicateIdentifier { id, first, .. } => {
                assert_eq!(id, START_ID);
                assert_eq!(first, "the start node");
            }
            other => panic!("expected DuplicateIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn step_dep_on_an_ingredient_name_is_unresolved() {
        let recipe = Recipe::from_yaml(
            r#"
ingredients:
  dry:
    - flour: { amount: 1 cup }
steps:
  - name: Mix
    do: [Stir]
    step_dep: flour
"#,
        )
        .unwrap();
        let dag = RecipeGraphBuilder::new(&recipe).build().unwrap();
        assert!(!dag.has_edge("flour", "mix/1"));
        let msg = build_validated(&recipe).unwrap_err().to_string();
        assert!(msg.contains("Not found: step flour"));
    }

    #[test]
    fn step_dep_on_start_is_unresolved() {
        let recipe = Recipe::from_yaml(
            r#"
steps:
  - name: Mix
    do: [Stir]
    step_dep: Start
"#,
        )
        .unwrap();
        let dag = RecipeGraphBuilder::new(&recipe).build().unwrap();
        assert!(!dag.has_edge(START_ID, "mix/1"));
        let msg = build_validated(&recipe).unwrap_err().to_string();
        assert!(msg.contains("Not found: step start"));
    }

    #[test]
    fn ing_dep_on_a_substep_is_unresolved() {
        let recipe = Recipe::from_yaml(
            r#"
steps:
  - name: A
    do: [first]
  - name: B
    do: [second]
    ing_dep: [{ name: a/1 }]
"#,
        )
        .unwrap();
        let dag = RecipeGraphBuilder::new(&recipe).build().unwrap();
        assert!(!dag.has_edge("a/1", "b/1"));
        let msg = build_validated(&recipe).unwrap_err().to_string();
        assert!(msg.contains("Not found: ingredient a/1"));
    }
}
