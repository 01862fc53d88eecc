use crate::table::RecipeIndex;
use async_trait::async_trait;
use platewise_suggestion::{AllergySemantics, Constraint, RecipeAttributes, RecipeCatalog};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SimpleExpr, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use std::collections::{HashMap, HashSet};

#[derive(FromRow)]
struct RecipeIndexRow {
    id: String,
    cuisine_id: Option<String>,
    main_ingredient_id: Option<String>,
    ingredient_ids: sqlx::types::Json<Vec<String>>,
    allergy_ids: sqlx::types::Json<Vec<String>>,
}

impl From<RecipeIndexRow> for RecipeAttributes {
    fn from(row: RecipeIndexRow) -> Self {
        RecipeAttributes {
            id: row.id,
            cuisine_id: row.cuisine_id,
            main_ingredient_id: row.main_ingredient_id,
            ingredient_ids: row.ingredient_ids.0.into_iter().collect(),
            allergy_ids: row.allergy_ids.0.into_iter().collect(),
        }
    }
}

#[derive(FromRow)]
struct NameRow {
    id: String,
    name: String,
}

/// `RecipeCatalog` over the SQLite constraint-evaluation index.
///
/// Every read orders by recipe id so the engine sees one stable catalog
/// iteration order. Constraint sets are pushed down as one AND condition
/// per constraint, which is equivalent to narrowing the candidate set
/// constraint by constraint.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
    allergy_semantics: AllergySemantics,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCatalog {
            pool,
            allergy_semantics: AllergySemantics::default(),
        }
    }

    pub fn with_allergy_semantics(pool: SqlitePool, allergy_semantics: AllergySemantics) -> Self {
        SqliteCatalog {
            pool,
            allergy_semantics,
        }
    }

    /// Display names for the given ids; absent ids are simply missing from
    /// the map. Not part of the engine-facing trait.
    pub async fn names(&self, ids: &[String]) -> anyhow::Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Query::select()
            .columns([RecipeIndex::Id, RecipeIndex::Name])
            .from(RecipeIndex::Table)
            .and_where(Expr::col(RecipeIndex::Id).is_in(ids.iter().cloned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, NameRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| (r.id, r.name)).collect())
    }

    fn attributes_select() -> SelectStatement {
        Query::select()
            .columns([
                RecipeIndex::Id,
                RecipeIndex::CuisineId,
                RecipeIndex::MainIngredientId,
                RecipeIndex::IngredientIds,
                RecipeIndex::AllergyIds,
            ])
            .from(RecipeIndex::Table)
            .order_by(RecipeIndex::Id, Order::Asc)
            .to_owned()
    }

    async fn fetch(&self, statement: SelectStatement) -> anyhow::Result<Vec<RecipeAttributes>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeIndexRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(RecipeAttributes::from).collect())
    }
}

fn constraint_condition(constraint: &Constraint, semantics: AllergySemantics) -> SimpleExpr {
    match constraint {
        Constraint::Cuisine(id) => Expr::col(RecipeIndex::CuisineId).eq(id.as_str()),
        Constraint::Ingredient(id) => Expr::col(RecipeIndex::MainIngredientId)
            .eq(id.as_str())
            .or(Expr::cust_with_values(
                "EXISTS (SELECT 1 FROM json_each(ingredient_ids) WHERE value = ?)",
                [id.as_str()],
            )),
        Constraint::Allergy(id) => {
            let member = Expr::cust_with_values(
                "EXISTS (SELECT 1 FROM json_each(allergy_ids) WHERE value = ?)",
                [id.as_str()],
            );
            match semantics {
                AllergySemantics::Include => member,
                AllergySemantics::Exclude => member.not(),
            }
        }
    }
}

#[async_trait]
impl RecipeCatalog for SqliteCatalog {
    async fn resolve(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<RecipeAttributes>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut statement = Self::attributes_select();
        statement.and_where(Expr::col(RecipeIndex::Id).is_in(ids.iter().cloned()));

        self.fetch(statement).await
    }

    async fn by_constraints(
        &self,
        constraints: &[Constraint],
    ) -> anyhow::Result<Vec<RecipeAttributes>> {
        let mut statement = Self::attributes_select();
        for constraint in constraints {
            statement.and_where(constraint_condition(constraint, self.allergy_semantics));
        }

        self.fetch(statement).await
    }

    async fn page(
        &self,
        excluding: &HashSet<String>,
        page_size: usize,
    ) -> anyhow::Result<Vec<RecipeAttributes>> {
        let mut statement = Self::attributes_select();
        if !excluding.is_empty() {
            statement.and_where(Expr::col(RecipeIndex::Id).is_not_in(excluding.iter().cloned()));
        }
        statement.limit(page_size as u64);

        self.fetch(statement).await
    }
}
