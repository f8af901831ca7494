//! Identifier normalization
//!
//! Display names double as join keys across ingredients, steps and
//! dependency references, so every lookup goes through [`slugify`].

/// Lower-case a display name and replace each space with a hyphen.
///
/// ```
/// assert_eq!(recipe_dag::slugify("Maple Syrup"), "maple-syrup");
/// ```
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
