//! Storefront CLI - drive the cart and bundle-offer engine from a terminal.
//!
//! Commands:
//! - `storefront cart` - Show, add, update, remove or clear cart lines
//! - `storefront bundle` - Build, edit or remove offer bundles
//! - `storefront checkout` - Place an order for the current cart

mod catalog;
mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BundleArgs, CartArgs, CheckoutArgs};

/// Storefront CLI - Manage a cart with bundle offers
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit cart lines
    Cart(CartArgs),

    /// Build, edit and remove offer bundles
    Bundle(BundleArgs),

    /// Place an order for the current cart
    Checkout(CheckoutArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    logging::init(&ctx.config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Bundle(args) => commands::bundle::run(args, &ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
