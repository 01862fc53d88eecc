use crate::attributes::RecipeAttributes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A typed predicate a recipe must satisfy for one planning day.
///
/// Constraints are stateless value objects created per request; identity is
/// the `(kind, entity id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity_id", rename_all = "snake_case")]
pub enum Constraint {
    /// Recipe cuisine equals the given cuisine id.
    Cuisine(String),
    /// The given ingredient id is the recipe's main ingredient or appears in
    /// its ingredient set.
    Ingredient(String),
    /// The given allergy id appears in the recipe's allergy set.
    ///
    /// Note this is positive inclusion of the allergen, not exclusion. The
    /// original write path defined it this way; `AllergySemantics::Exclude`
    /// flips it for callers that want the other reading.
    Allergy(String),
}

/// Constraint discriminant, used by CLI/config parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConstraintKind {
    Cuisine,
    Ingredient,
    Allergy,
}

/// How `Constraint::Allergy` is interpreted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum AllergySemantics {
    /// Literal behavior: the recipe must contain the allergen.
    #[default]
    Include,
    /// Alternate reading: the recipe must be free of the allergen.
    Exclude,
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Cuisine(_) => ConstraintKind::Cuisine,
            Constraint::Ingredient(_) => ConstraintKind::Ingredient,
            Constraint::Allergy(_) => ConstraintKind::Allergy,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            Constraint::Cuisine(id) | Constraint::Ingredient(id) | Constraint::Allergy(id) => id,
        }
    }

    pub fn new(kind: ConstraintKind, entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        match kind {
            ConstraintKind::Cuisine => Constraint::Cuisine(entity_id),
            ConstraintKind::Ingredient => Constraint::Ingredient(entity_id),
            ConstraintKind::Allergy => Constraint::Allergy(entity_id),
        }
    }

    /// Whether a single constraint holds for the recipe.
    pub fn is_satisfied_by(&self, recipe: &RecipeAttributes, semantics: AllergySemantics) -> bool {
        match self {
            Constraint::Cuisine(id) => recipe.cuisine_id.as_deref() == Some(id.as_str()),
            Constraint::Ingredient(id) => {
                recipe.main_ingredient_id.as_deref() == Some(id.as_str())
                    || recipe.ingredient_ids.contains(id)
            }
            Constraint::Allergy(id) => {
                let contains = recipe.allergy_ids.contains(id);
                match semantics {
                    AllergySemantics::Include => contains,
                    AllergySemantics::Exclude => !contains,
                }
            }
        }
    }
}

/// Conjunction over a constraint set with the default allergy semantics.
///
/// An empty set matches any recipe (vacuous AND).
pub fn matches(recipe: &RecipeAttributes, constraints: &[Constraint]) -> bool {
    matches_with(recipe, constraints, AllergySemantics::Include)
}

pub fn matches_with(
    recipe: &RecipeAttributes,
    constraints: &[Constraint],
    semantics: AllergySemantics,
) -> bool {
    constraints.iter().all(|c| c.is_satisfied_by(recipe, semantics))
}
