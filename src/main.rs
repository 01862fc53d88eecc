use anyhow::Result;
use clap::{Parser, Subcommand};
use platewise::dayspec::parse_day_spec;
use platewise_catalog::{RecipeRecord, SqliteCatalog, projection};
use platewise_suggestion::{AllergySemantics, SuggestionEngine, SuggestionRequest};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions};
use sqlx_migrator::{Migrate, Plan};
use std::collections::HashSet;
use std::path::PathBuf;

/// platewise - meal plan suggestions from your recipe catalog
#[derive(Parser)]
#[command(name = "platewise")]
#[command(about = "Diverse, constraint-aware meal plan suggestions", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest recipes for a meal plan
    Suggest {
        /// Total number of recipes to suggest
        #[arg(long)]
        amount: i64,

        /// Constraint set for one planning day, repeatable;
        /// e.g. --day "cuisine:italian,ingredient:tomato"
        #[arg(long = "day")]
        days: Vec<String>,

        /// Recipe id already chosen for the plan, repeatable
        #[arg(long = "selected")]
        selected: Vec<String>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Load recipe records from a JSON file into the catalog index
    Seed {
        /// JSON file holding an array of recipe records
        #[arg(long)]
        file: PathBuf,

        /// Replace the whole index instead of upserting into it
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = platewise::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    platewise::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Suggest {
            amount,
            days,
            selected,
        } => suggest_command(config, amount, days, selected).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Seed { file, replace } => seed_command(config, file, replace).await,
    }
}

#[tracing::instrument(skip(config))]
async fn suggest_command(
    config: platewise::config::Config,
    amount: i64,
    days: Vec<String>,
    selected: Vec<String>,
) -> Result<()> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let allergy_semantics = if config.suggestions.exclude_allergens {
        AllergySemantics::Exclude
    } else {
        AllergySemantics::Include
    };
    let catalog = SqliteCatalog::with_allergy_semantics(pool, allergy_semantics);

    let constraints_per_day = days
        .iter()
        .map(|spec| parse_day_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let request = SuggestionRequest {
        amount_to_suggest: amount,
        constraints_per_day,
        already_selected: selected.into_iter().collect::<HashSet<_>>(),
    };

    let engine = SuggestionEngine::new(config.suggestions.page_size);
    let suggestions = engine.suggest(&catalog, request).await?;

    if suggestions.is_empty() {
        println!("No suggestions available");
        return Ok(());
    }

    let names = catalog.names(&suggestions).await?;
    for id in &suggestions {
        match names.get(id) {
            Some(name) => println!("{id}\t{name}"),
            None => println!("{id}"),
        }
    }

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: platewise::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    let mut conn = pool.acquire().await?;
    platewise_catalog::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: platewise::config::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn seed_command(config: platewise::config::Config, file: PathBuf, replace: bool) -> Result<()> {
    let raw = tokio::fs::read(&file).await?;
    let records: Vec<RecipeRecord> = serde_json::from_slice(&raw)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    if replace {
        projection::rebuild(&pool, &records).await?;
    } else {
        for record in &records {
            projection::upsert(&pool, record).await?;
        }
    }

    tracing::info!(
        recipes = records.len(),
        replace,
        "recipe index seeded from {}",
        file.display()
    );

    Ok(())
}
