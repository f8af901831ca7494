//! Recipe document model
//!
//! Shape consumed by the graph builder:
//!
//! ```yaml
//! ingredients:
//!   dough:
//!     - flour: { amount: 2 cups }
//!     - water: { amount: 1 cup }
//! steps:
//!   - name: Mix
//!     do: [Combine flour and water, Knead]
//!     ing_dep: [{ name: flour }, { name: water }]
//!     step_dep: null
//! ```
//!
//! Mapping order is preserved so graph enumeration follows the document.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::Result;

/// Recipe parsed from YAML
#[derive(Debug, Clone, Default)]
pub struct Recipe {
    pub ingredients: Vec<IngredientGroup>,
    pub steps: Vec<Step>,
}

/// Recipe as written (raw)
#[derive(Debug, Deserialize)]
struct RecipeRaw {
    #[serde(default)]
    ingredients: OrderedMap<Vec<OrderedMap<Option<IngredientData>>>>,
    #[serde(default)]
    steps: Vec<Step>,
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RecipeRaw::deserialize(deserializer)?;
        let ingredients = raw
            .ingredients
            .0
            .into_iter()
            .map(|(name, entries)| IngredientGroup {
                name,
                ingredients: entries
                    .into_iter()
                    .flat_map(|entry| entry.0)
                    .map(|(name, data)| Ingredient {
                        name,
                        amount: data.and_then(|d| d.amount),
                    })
                    .collect(),
            })
            .collect();

        Ok(Recipe {
            ingredients,
            steps: raw.steps,
        })
    }
}

impl Recipe {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// All ingredients in document order, with their group name
    pub fn all_ingredients(&self) -> impl Iterator<Item = (&str, &Ingredient)> {
        self.ingredients.iter().flat_map(|group| {
            group
                .ingredients
                .iter()
                .map(move |ingredient| (group.name.as_str(), ingredient))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientGroup {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: Option<Amount>,
}

#[derive(Debug, Deserialize)]
struct IngredientData {
    #[serde(default)]
    amount: Option<Amount>,
}

/// Ingredient amount: free text ("2 cups") or a bare number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_yaml::Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{n}"),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub name: String,
    /// Ordered substep descriptions
    #[serde(rename = "do", default)]
    pub substeps: Vec<String>,
    #[serde(default)]
    pub ing_dep: Option<Vec<IngredientRef>>,
    #[serde(default)]
    pub step_dep: Option<StepDependency>,
}

impl Step {
    /// Ingredient dependency names (empty when absent)
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ing_dep
            .iter()
            .flatten()
            .map(|dep| dep.name.as_str())
    }

    pub fn has_ingredient_deps(&self) -> bool {
        self.ing_dep.as_ref().is_some_and(|deps| !deps.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngredientRef {
    pub name: String,
}

/// Handles string OR array for step_dep
///
/// Anything else lands in `Malformed` so the builder can name the step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StepDependency {
    Single(String),
    Multiple(Vec<String>),
    Malformed(serde_yaml::Value),
}

impl StepDependency {
    /// Declared names, or `None` for a malformed declaration
    pub fn names(&self) -> Option<Vec<&str>> {
        match self {
            StepDependency::Single(s) if s.is_empty() => Some(Vec::new()),
            StepDependency::Single(s) => Some(vec![s.as_str()]),
            StepDependency::Multiple(v) => Some(v.iter().map(String::as_str).collect()),
            StepDependency::Malformed(_) => None,
        }
    }

    /// Short description of a malformed value for error messages
    pub fn describe(&self) -> String {
        match self {
            StepDependency::Single(s) => format!("name '{s}'"),
            StepDependency::Multiple(v) => format!("list of {} names", v.len()),
            StepDependency::Malformed(value) => describe_value(value),
        }
    }
}

fn describe_value(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string '{s}'"),
        Value::Sequence(_) => "a list with non-string entries".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value `{}`", tagged.tag),
    }
}

/// YAML mapping kept as an ordered list of entries
#[derive(Debug)]
struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedMap::default())
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
