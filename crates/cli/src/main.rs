//! Florist CLI - catalog and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # List the built-in catalog
//! florist catalog
//!
//! # List a catalog file (JSON or YAML)
//! florist catalog --catalog bouquets.yaml
//!
//! # Check a checkout form
//! florist validate --form order.json --field phone="+7 999 123-45-67"
//!
//! # Place an offline order for two Romance bouquets and one Sunny Day
//! florist order --add 2 --add 2 --add 3 --form order.json --delay-ms 0
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products with their prices
//! - `validate` - Validate a checkout form
//! - `order` - Fill a cart and run it through the checkout flow

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use florist_core::{Field, ProductId};

mod commands;

use commands::FormArgs;

#[derive(Parser)]
#[command(name = "florist")]
#[command(author, version, about = "Florist CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products in a catalog
    Catalog {
        /// Catalog file (.json, .yaml or .yml); built-in catalog when omitted
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
    /// Validate a checkout form
    Validate {
        /// Form file (.json, .yaml or .yml)
        #[arg(short, long)]
        form: Option<PathBuf>,

        /// Field edit applied after the file, e.g. `name=Anna`
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field_edit)]
        fields: Vec<(Field, String)>,
    },
    /// Place an order through the checkout flow
    Order {
        /// Product to add; repeat to add more units
        #[arg(short, long = "add", value_name = "ID", required = true)]
        add: Vec<ProductId>,

        /// Form file (.json, .yaml or .yml)
        #[arg(short, long)]
        form: Option<PathBuf>,

        /// Field edit applied after the file, e.g. `address=10 Pushkin St`
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field_edit)]
        fields: Vec<(Field, String)>,

        /// Simulated processing latency; defaults to `CHECKOUT_PROCESSING_DELAY_MS`
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Catalog file (.json, .yaml or .yml); built-in catalog when omitted
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

/// Parse a `key=value` field edit. The key is a wire field name.
fn parse_field_edit(raw: &str) -> Result<(Field, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{raw}\""))?;
    let field = key.trim().parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_owned()))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { catalog } => commands::catalog::list(catalog.as_deref())?,
        Commands::Validate { form, fields } => {
            commands::checkout::validate(&FormArgs { form, fields })?;
        }
        Commands::Order {
            add,
            form,
            fields,
            delay_ms,
            catalog,
        } => {
            commands::checkout::order(
                &add,
                &FormArgs { form, fields },
                delay_ms,
                catalog.as_deref(),
            )
            .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_field_edit() {
        let (field, value) = parse_field_edit("deliveryTime=tomorrow").unwrap();
        assert_eq!(field, Field::DeliveryTime);
        assert_eq!(value, "tomorrow");

        let (field, value) = parse_field_edit("comment=ring = twice").unwrap();
        assert_eq!(field, Field::Comment);
        assert_eq!(value, "ring = twice");
    }

    #[test]
    fn test_parse_field_edit_errors() {
        assert!(parse_field_edit("name").is_err());
        assert!(parse_field_edit("nickname=Anna").is_err());
    }

    #[test]
    fn test_order_requires_products() {
        assert!(Cli::try_parse_from(["florist", "order"]).is_err());

        let cli = Cli::try_parse_from(["florist", "order", "--add", "2", "--add", "3"]).unwrap();
        let Commands::Order { add, .. } = cli.command else {
            panic!("expected order command");
        };
        assert_eq!(add, [ProductId::new(2), ProductId::new(3)]);
    }
}
