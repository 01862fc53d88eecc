mod recipe_index;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "platewise",
    "m0_1",
    vec_box![],
    vec_box![
        recipe_index::CreateTable,
        recipe_index::CreateCuisineIdx,
        recipe_index::CreateMainIngredientIdx,
    ]
);
