//! Error types with fix suggestions
//!
//! Error code ranges:
//! - RDAG-000-009: Input errors (YAML, IO, config)
//! - RDAG-010-019: Recipe builder errors
//! - RDAG-020-029: DAG errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecipeError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|id| format!("\nNot found: {id}"))
        .collect()
}

fn format_cycle(cycle: &[String]) -> String {
    cycle.join(" → ")
}

#[derive(Error, Debug)]
pub enum RecipeError {
    // ═══════════════════════════════════════════
    // INPUT ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[RDAG-001] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("[RDAG-002] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[RDAG-003] Invalid configuration: {reason}")]
    Config { reason: String },

    // ═══════════════════════════════════════════
    // BUILDER ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[RDAG-010] Step '{step}' has a malformed step_dep: expected a name or a list of names, got {found}")]
    MalformedStepDependency { step: String, found: String },

    #[error("[RDAG-011] Identifier '{id}' is defined twice: {first} and {second}")]
    DuplicateIdentifier {
        id: String,
        first: String,
        second: String,
    },

    #[error("[RDAG-012] Step '{step}' has no substeps")]
    EmptyStep { step: String },

    // ═══════════════════════════════════════════
    // DAG ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[RDAG-020] Invalid DAG:{}", format_missing(.missing))]
    InvalidDag { missing: Vec<String> },

    #[error("[RDAG-021] Cycle detected in DAG: {}", format_cycle(.cycle))]
    CycleDetected { cycle: Vec<String> },
}

impl FixSuggestion for RecipeError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            RecipeError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            RecipeError::Io(_) => Some("Check file path and permissions"),
            RecipeError::Config { .. } => Some("Fix or remove the recipe-dag config.toml"),
            RecipeError::MalformedStepDependency { .. } => {
                Some("Use step_dep: <step name> or step_dep: [<step name>, ...]")
            }
            RecipeError::DuplicateIdentifier { .. } => {
                Some("Rename one of the entries: names are compared lower-cased with spaces as hyphens")
            }
            RecipeError::EmptyStep { .. } => Some("Add at least one entry under do:"),
            RecipeError::InvalidDag { .. } => {
                Some("Check ing_dep and step_dep names against the ingredients and steps you defined")
            }
            RecipeError::CycleDetected { .. } => {
                Some("Remove one of the step_dep entries that closes the loop")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dag_lists_every_identifier() {
        let err = RecipeError::InvalidDag {
            missing: vec!["butter".into(), "proof".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("RDAG-020"));
        assert!(msg.contains("Not found: butter"));
        assert!(msg.contains("Not found: proof"));
    }

    #[test]
    fn cycle_message_shows_path() {
        let err = RecipeError::CycleDetected {
            cycle: vec!["a/1".into(), "b/1".into(), "a/1".into()],
        };
        assert_eq!(
            err.to_string(),
            "[RDAG-021] Cycle detected in DAG: a/1 → b/1 → a/1"
        );
    }

    #[test]
    fn every_variant_has_a_suggestion() {
        let err = RecipeError::EmptyStep { step: "Mix".into() };
        assert!(err.fix_suggestion().is_some());
    }
}
