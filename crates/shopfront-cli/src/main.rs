//! Maintenance CLI: catalog seeding and order reporting.
//!
//! Both commands read the same configuration as the server, so a `.env`
//! with `DATABASE_URL` is enough to point them at a database.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopfront-cli")]
#[command(about = "Shopfront maintenance command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the catalog YAML file into the database
    Seed {
        /// Catalog file to load (defaults to `SHOPFRONT_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Validate the catalog file without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Print order counts grouped by status
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopfront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Seed { catalog, dry_run } => {
            let path = catalog.unwrap_or_else(|| config.catalog_path.clone());
            let file = shopfront_core::load_catalog(&path)?;
            println!(
                "catalog '{}': {} categories, {} products",
                path.display(),
                file.categories.len(),
                file.products.len()
            );

            if dry_run {
                println!("dry run, nothing written");
                return Ok(());
            }

            let pool = connect(&config).await?;
            let (categories, products) = shopfront_db::seed_catalog(&pool, &file).await?;
            println!("seeded {categories} categories and {products} products");
        }
        Commands::Report => {
            let pool = connect(&config).await?;
            let counts = shopfront_db::order_counts_by_status(&pool).await?;
            if counts.is_empty() {
                println!("no orders");
                return Ok(());
            }
            let total: i64 = counts.iter().map(|c| c.count).sum();
            for bucket in &counts {
                println!("{:<12} {}", bucket.status, bucket.count);
            }
            println!("{:<12} {total}", "total");
        }
    }

    Ok(())
}

async fn connect(config: &shopfront_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = shopfront_db::PoolConfig::from_app_config(config);
    let pool = shopfront_db::connect_pool(&config.database_url, pool_config).await?;
    shopfront_db::run_migrations(&pool).await?;
    Ok(pool)
}
