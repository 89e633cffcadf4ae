//! Catalog CLI - browse and edit products over the HTTP API, and migrate the database.
//!
//! # Usage
//!
//! ```bash
//! # Second page of products matching "cap"
//! catalog list --search cap --page 2 --page-size 5
//!
//! # Create a product
//! catalog create --name Cap --description "A cap" --price 9.99
//!
//! # Delete without the confirmation prompt
//! catalog delete 3 --yes
//!
//! # Apply pending PostgreSQL migrations using the service settings
//! catalog migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Catalog product management tools")]
struct Cli {
    /// Root of the products API; `/api` is appended when missing
    #[arg(long, env = "CATALOG_API_URL", default_value = catalog_client::DEFAULT_BASE_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of products
    List {
        /// Case-insensitive text matched against name and description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show a single product
    Get { id: i64 },
    /// Create a product
    Create(ProductArgs),
    /// Replace the fields of an existing product
    Update {
        id: i64,

        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Apply pending database migrations
    Migrate,
}

#[derive(Args)]
struct ProductArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long)]
    description: String,

    /// Price in the store currency, e.g. 19.99
    #[arg(long)]
    price: Decimal,

    /// Absolute http(s) image URL
    #[arg(long)]
    image: Option<String>,
}

impl From<ProductArgs> for catalog_client::ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = catalog_client::ProductClient::new(&cli.api_url)?;

    match cli.command {
        Commands::List {
            search,
            page,
            page_size,
        } => {
            let params = catalog_client::ListParams {
                search,
                page,
                page_size,
            };
            commands::products::list(&client, &params).await
        }
        Commands::Get { id } => commands::products::get(&client, id).await,
        Commands::Create(fields) => commands::products::create(&client, fields.into()).await,
        Commands::Update { id, fields } => {
            commands::products::update(&client, id, fields.into()).await
        }
        Commands::Delete { id, yes } => commands::products::delete(&client, id, yes).await,
        Commands::Migrate => commands::migrate::run().await,
    }
}
