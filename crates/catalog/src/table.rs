use sea_query::Iden;

/// Denormalized constraint-evaluation index: one row per catalog recipe
/// with the attribute columns the suggestion engine scores against.
/// `IngredientIds` and `AllergyIds` hold JSON string arrays queried via
/// `json_each`.
#[derive(Iden, Clone)]
pub enum RecipeIndex {
    Table,
    Id,
    Name,
    CuisineId,
    MainIngredientId,
    IngredientIds,
    AllergyIds,
    UpdatedAt,
}
