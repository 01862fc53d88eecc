use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Recipe data the suggestion engine scores against.
///
/// This is a read-only projection of a catalog recipe: the engine never
/// mutates it and treats every field as an immutable snapshot for the
/// duration of one suggestion call. `allergy_ids` is attached transitively
/// via the recipe's ingredients by the catalog write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeAttributes {
    pub id: String,
    pub cuisine_id: Option<String>,
    pub main_ingredient_id: Option<String>,
    pub ingredient_ids: HashSet<String>,
    pub allergy_ids: HashSet<String>,
}

impl RecipeAttributes {
    /// Attribute set with nothing but an identifier, useful as a base when
    /// building projections or fixtures.
    pub fn bare(id: impl Into<String>) -> Self {
        RecipeAttributes {
            id: id.into(),
            cuisine_id: None,
            main_ingredient_id: None,
            ingredient_ids: HashSet::new(),
            allergy_ids: HashSet::new(),
        }
    }
}
