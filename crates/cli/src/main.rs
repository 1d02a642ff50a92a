//! Smoochiie CLI - cart, catalog and email tools for operators.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to a file-backed cart
//! smoochiie cart add --name "Catnip Toy" --price '$4.50'
//!
//! # Show, remove from and clear the cart
//! smoochiie cart show
//! smoochiie cart remove 3f1c...
//! smoochiie cart --file other.json clear
//!
//! # Filter a catalog export
//! smoochiie search --catalog catalog.json --query cat --category Toys
//!
//! # Render the order confirmation email
//! smoochiie email preview --order-id ORDER-42
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "smoochiie")]
#[command(author, version, about = "Smoochiie shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manipulate a file-backed cart
    Cart {
        /// Storage file holding the cart
        #[arg(short, long, default_value = commands::cart::DEFAULT_CART_FILE)]
        file: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
    /// Filter a catalog export the way the catalog page does
    Search {
        /// JSON file with a list of `{ "name", "category" }` cards
        #[arg(long)]
        catalog: PathBuf,

        /// Free-text query
        #[arg(short, long, default_value = "")]
        query: String,

        /// Checked category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
    },
    /// Order confirmation email tools
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Display price, e.g. "$12.99"
        #[arg(short, long)]
        price: String,

        /// Product image URL
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove a line by its id
    Remove {
        /// Cart item id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
}

#[derive(Subcommand)]
enum EmailAction {
    /// Render the confirmation without sending it
    Preview {
        /// Order id shown in the subject and body
        #[arg(short, long)]
        order_id: String,

        /// Recipient address
        #[arg(short, long, default_value = "customer@example.com")]
        to: String,

        /// Store name shown as the sender
        #[arg(long, default_value = smoochiie_storefront::config::DEFAULT_STORE_NAME)]
        store_name: String,

        /// Print the HTML part instead of the plain text part
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { file, action } => match action {
            CartAction::Add { name, price, image } => {
                commands::cart::add(&file, &name, &price, image.as_deref())?;
            }
            CartAction::Remove { id } => commands::cart::remove(&file, &id)?,
            CartAction::Clear => commands::cart::clear(&file)?,
            CartAction::Show => commands::cart::show(&file)?,
        },
        Commands::Search {
            catalog,
            query,
            category,
        } => commands::search::run(&catalog, &query, &category).await?,
        Commands::Email { action } => match action {
            EmailAction::Preview {
                order_id,
                to,
                store_name,
                html,
            } => commands::email::preview(&order_id, &to, &store_name, html)?,
        },
    }
    Ok(())
}
