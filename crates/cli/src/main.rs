//! Variation Table CLI - database migrations, demo data and SKU tools.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! vt-cli migrate
//!
//! # Seed the demo catalog
//! vt-cli seed demo
//! vt-cli seed demo --file path/to/catalog.yaml
//!
//! # Suggest a SKU for a variation label
//! vt-cli sku suggest --base ABC "Red, Large"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed demo` - Insert demo products and variations
//! - `sku suggest` - Print the SKU the grid would generate

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vt-cli")]
#[command(author, version, about = "Variation Table CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run catalog database migrations
    Migrate,
    /// Seed the database with data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// SKU helpers
    Sku {
        #[command(subcommand)]
        action: SkuAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the demo catalog
    Demo {
        /// YAML catalog file
        #[arg(short, long, default_value = "crates/cli/fixtures/demo-catalog.yaml")]
        file: String,
    },
}

#[derive(Subcommand)]
enum SkuAction {
    /// Suggest a SKU from a base SKU and a variation label
    Suggest {
        /// Base SKU
        #[arg(short, long)]
        base: String,

        /// Variation label, e.g. "Red, Large"
        label: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Demo { file } => commands::seed::demo(&file).await?,
        },
        Commands::Sku { action } => match action {
            SkuAction::Suggest { base, label } => commands::sku::suggest(&base, &label),
        },
    }
    Ok(())
}
