pub(crate) mod m0_1;
pub mod projection;
pub mod query;
pub mod table;

pub use projection::{IngredientRef, RecipeRecord};
pub use query::SqliteCatalog;

use sqlx_migrator::{Info, Migrator};

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0_1::Migration)])?;

    Ok(migrator)
}
