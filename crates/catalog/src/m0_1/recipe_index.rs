use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::RecipeIndex;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(RecipeIndex::Table)
        .col(
            ColumnDef::new(RecipeIndex::Id)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(RecipeIndex::Name).string().not_null())
        .col(ColumnDef::new(RecipeIndex::CuisineId).string())
        .col(ColumnDef::new(RecipeIndex::MainIngredientId).string())
        .col(ColumnDef::new(RecipeIndex::IngredientIds).text().not_null())
        .col(ColumnDef::new(RecipeIndex::AllergyIds).text().not_null())
        .col(
            ColumnDef::new(RecipeIndex::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(RecipeIndex::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateCuisineIdx;

fn create_cuisine_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_recipe_index_cuisine_id")
        .table(RecipeIndex::Table)
        .col(RecipeIndex::CuisineId)
        .to_owned()
}

fn drop_cuisine_idx() -> IndexDropStatement {
    Index::drop()
        .name("idx_recipe_index_cuisine_id")
        .table(RecipeIndex::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateCuisineIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_cuisine_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_cuisine_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateMainIngredientIdx;

fn create_main_ingredient_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_recipe_index_main_ingredient_id")
        .table(RecipeIndex::Table)
        .col(RecipeIndex::MainIngredientId)
        .to_owned()
}

fn drop_main_ingredient_idx() -> IndexDropStatement {
    Index::drop()
        .name("idx_recipe_index_main_ingredient_id")
        .table(RecipeIndex::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateMainIngredientIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_main_ingredient_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_main_ingredient_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
