//! recipe-dag - turn a recipe into a DAG of atomic actions and order them
//!
//! ```
//! use recipe_dag::{Recipe, RecipeGraphBuilder};
//!
//! let recipe = Recipe::from_yaml(r#"
//! ingredients:
//!   dry:
//!     - flour: { amount: 2 cups }
//! steps:
//!   - name: Mix
//!     do: [Combine wet ingredients]
//!     ing_dep: [{ name: flour }]
//! "#)?;
//!
//! let dag = RecipeGraphBuilder::new(&recipe).build()?;
//! dag.validate()?;
//! let order = dag.topological_sort()?;
//! assert_eq!(order.first().map(|n| n.id()), Some("start"));
//! # Ok::<(), recipe_dag::RecipeError>(())
//! ```

pub mod builder;
pub mod config;
pub mod dag;
pub mod error;
pub mod recipe;
pub mod render;
pub mod slug;

pub use builder::{build_validated, RecipeGraphBuilder};
pub use config::{RecipeDagConfig, RenderOptions};
pub use dag::{Dag, DagExport, Edge, EdgeKind, Node, NodeKind, NodeRef, START_ID};
pub use error::{FixSuggestion, RecipeError, Result};
pub use recipe::{Amount, Ingredient, IngredientGroup, IngredientRef, Recipe, Step, StepDependency};
pub use render::{render_dot, render_export};
pub use slug::slugify;
