use crate::table::RecipeIndex;
use sea_query::{Expr, ExprTrait, InsertStatement, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::{SystemTime, UNIX_EPOCH};

/// An ingredient reference as it arrives from the catalog write path,
/// carrying the allergy ids declared on the ingredient entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRef {
    pub id: String,
    #[serde(default)]
    pub allergy_ids: Vec<String>,
}

/// Source-of-truth shape of a recipe for index maintenance. The index row
/// is a flattened view of this: ingredient ids collected into one array,
/// allergy ids attached transitively by unioning every ingredient's
/// allergies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine_id: Option<String>,
    #[serde(default)]
    pub main_ingredient_id: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientRef>,
}

impl RecipeRecord {
    /// Ingredient ids in first-seen order, duplicates dropped.
    pub fn ingredient_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.ingredients.len());
        for ingredient in &self.ingredients {
            if !ids.contains(&ingredient.id) {
                ids.push(ingredient.id.clone());
            }
        }
        ids
    }

    /// Union of the allergy ids of all ingredients, first-seen order.
    pub fn allergy_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for ingredient in &self.ingredients {
            for allergy in &ingredient.allergy_ids {
                if !ids.contains(allergy) {
                    ids.push(allergy.clone());
                }
            }
        }
        ids
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn insert_statement(record: &RecipeRecord) -> anyhow::Result<InsertStatement> {
    let ingredient_ids = serde_json::to_string(&record.ingredient_ids())?;
    let allergy_ids = serde_json::to_string(&record.allergy_ids())?;

    let mut statement = Query::insert()
        .into_table(RecipeIndex::Table)
        .columns([
            RecipeIndex::Id,
            RecipeIndex::Name,
            RecipeIndex::CuisineId,
            RecipeIndex::MainIngredientId,
            RecipeIndex::IngredientIds,
            RecipeIndex::AllergyIds,
            RecipeIndex::UpdatedAt,
        ])
        .to_owned();

    statement.values_panic([
        record.id.to_owned().into(),
        record.name.to_owned().into(),
        record.cuisine_id.to_owned().into(),
        record.main_ingredient_id.to_owned().into(),
        ingredient_ids.into(),
        allergy_ids.into(),
        unix_now().into(),
    ]);

    statement.on_conflict(
        OnConflict::column(RecipeIndex::Id)
            .update_columns([
                RecipeIndex::Name,
                RecipeIndex::CuisineId,
                RecipeIndex::MainIngredientId,
                RecipeIndex::IngredientIds,
                RecipeIndex::AllergyIds,
                RecipeIndex::UpdatedAt,
            ])
            .to_owned(),
    );

    Ok(statement)
}

/// Insert or refresh one index row.
pub async fn upsert(pool: &SqlitePool, record: &RecipeRecord) -> anyhow::Result<()> {
    let (sql, values) = insert_statement(record)?.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Drop a recipe from the index.
pub async fn remove(pool: &SqlitePool, id: impl Into<String>) -> anyhow::Result<()> {
    let id = id.into();
    let statement = Query::delete()
        .from_table(RecipeIndex::Table)
        .and_where(Expr::col(RecipeIndex::Id).eq(&id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Replace the whole index from a catalog snapshot, atomically.
///
/// This is the refresh operation behind the denormalized view; when it runs
/// (on a schedule, after bulk imports) is the deployment's concern, not the
/// engine's.
pub async fn rebuild(pool: &SqlitePool, records: &[RecipeRecord]) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    let (sql, values) = Query::delete()
        .from_table(RecipeIndex::Table)
        .to_owned()
        .build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *tx).await?;

    for record in records {
        let (sql, values) = insert_statement(record)?.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    tracing::debug!(recipes = records.len(), "recipe index rebuilt");

    Ok(())
}
