//! AgriSafe operator CLI.
//!
//! Applies the schema, runs the owner-column migration, seeds sample data
//! and prints recommendations or shop statistics from a database file.

mod config;

use std::path::{Path, PathBuf};
use std::process;

use agrisafe_core::db::{render_script, Database, OwnerColumnState, RenameForm, SchemaVariant};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "agrisafe", version, about = "AgriSafe schema and data tool")]
struct Cli {
    /// SQLite database file (overrides AGRISAFE_DATABASE_PATH)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the DDL for a schema variant
    Schema {
        /// cascading or strict (overrides AGRISAFE_SCHEMA_VARIANT)
        #[arg(long)]
        variant: Option<SchemaVariant>,
    },
    /// Create the tables and indexes
    Apply {
        /// cascading or strict (overrides AGRISAFE_SCHEMA_VARIANT)
        #[arg(long)]
        variant: Option<SchemaVariant>,
    },
    /// Rename medical_shops.shop_owner to owner_name
    Migrate {
        /// rename-column or change-column
        #[arg(long, default_value = "rename-column")]
        form: RenameForm,
        /// Print the script instead of running it
        #[arg(long)]
        print: bool,
    },
    /// Report which owner column medical_shops carries
    Verify,
    /// Insert sample doctor, farmer, shop and recommendation
    Seed,
    /// Print a recommendation with its farmer, doctor, shop and items as JSON
    Show { id: i64 },
    /// Print claim statistics for a shop as JSON
    Stats {
        shop_id: i64,
        /// Reference day, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let path = config.database_path(cli.database.as_ref());

    match cli.command {
        Commands::Schema { variant } => {
            let variant = config.schema_variant(variant)?;
            println!("{}", variant.sql().trim());
        }
        Commands::Apply { variant } => {
            let variant = config.schema_variant(variant)?;
            info!("Applying {} schema to {}", variant, path.display());
            Database::open_with_variant(&path, variant)
                .with_context(|| format!("Failed to apply {} schema to {}", variant, path.display()))?;
        }
        Commands::Migrate { form, print } => {
            if print {
                print!("{}", render_script(form));
                return Ok(());
            }
            if form != RenameForm::RenameColumn {
                bail!("{} is not understood by SQLite; use --print to get the script", form);
            }
            let db = open_existing(&path)?;
            db.rename_owner_column()
                .with_context(|| format!("Migration failed on {}", path.display()))?;
            report_owner_column(&db)?;
        }
        Commands::Verify => {
            let db = open_existing(&path)?;
            report_owner_column(&db)?;
        }
        Commands::Seed => {
            let db = open_default(&config, &path)?;
            let summary = db.seed_sample_data().context("Failed to seed sample data")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Show { id } => {
            let db = open_existing(&path)?;
            let detail = db
                .recommendation_detail(id)?
                .with_context(|| format!("Recommendation {} not found", id))?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Commands::Stats { shop_id, date } => {
            let db = open_existing(&path)?;
            if db.get_shop(shop_id)?.is_none() {
                warn!("Shop {} does not exist; counts will be zero", shop_id);
            }
            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            let stats = db.shop_statistics(shop_id, today)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

/// Open for writing sample data; only the cascading schema can be re-applied
/// to an existing file.
fn open_default(config: &Config, path: &Path) -> Result<Database> {
    match config.schema_variant(None)? {
        SchemaVariant::Cascading => Ok(Database::open(path)?),
        SchemaVariant::Strict => open_existing(path),
    }
}

/// Open a database file that must already exist; a mistyped path is an error,
/// not a new empty file.
fn open_existing(path: &Path) -> Result<Database> {
    Database::connect_existing(path)
        .with_context(|| format!("Cannot open database {}; run `agrisafe apply` first", path.display()))
}

fn report_owner_column(db: &Database) -> Result<()> {
    let columns = db.table_columns("medical_shops")?;
    info!("medical_shops columns: {}", columns.join(", "));
    match db.verify_owner_column()? {
        OwnerColumnState::Current => println!("medical_shops uses owner_name"),
        OwnerColumnState::Legacy => println!("medical_shops still uses shop_owner"),
        OwnerColumnState::Missing => bail!("medical_shops has no owner column"),
    }
    Ok(())
}
