//! CLI command implementations.

pub mod bundle;
pub mod cart;
pub mod checkout;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart lines, bundles and totals.
    Show,
    /// Add a product as a regular line.
    Add {
        /// Product id or code.
        product: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Size descriptor.
        #[arg(short, long)]
        size: Option<String>,

        /// Color descriptor.
        #[arg(long)]
        color: Option<String>,
    },
    /// Set the quantity of a regular line (0 removes it).
    Update {
        /// Product id.
        product: String,

        /// New quantity.
        quantity: u32,

        /// Size descriptor of the line.
        #[arg(short, long)]
        size: Option<String>,

        /// Color descriptor of the line.
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove lines for a product.
    Remove {
        /// Product id.
        product: String,

        /// Remove the product from this bundle only.
        #[arg(short, long)]
        bundle: Option<String>,

        /// Remove only the regular line with this size.
        #[arg(short, long)]
        size: Option<String>,

        /// Remove only the regular line with this color.
        #[arg(long)]
        color: Option<String>,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the bundle command.
#[derive(Args)]
pub struct BundleArgs {
    #[command(subcommand)]
    pub command: BundleCommand,
}

#[derive(Subcommand)]
pub enum BundleCommand {
    /// List offers in the catalog.
    Offers,
    /// Add a bundle for an offer, or replace an existing one with --edit.
    Add {
        /// Offer id or slug.
        offer: String,

        /// Product selection as PRODUCT or PRODUCT=QTY (repeatable).
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Variant choice as PRODUCT:OPTION (repeatable).
        #[arg(long = "variant")]
        variants: Vec<String>,

        /// Bundle id to edit in place.
        #[arg(long)]
        edit: Option<String>,
    },
    /// Add the offer's first products, one of each, as a new bundle.
    Starter {
        /// Offer id or slug.
        offer: String,
    },
    /// Remove every line of a bundle.
    Remove {
        /// Bundle id.
        bundle: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer mobile number.
    #[arg(long)]
    pub mobile: String,

    /// Customer email.
    #[arg(long)]
    pub email: Option<String>,

    /// Delivery address.
    #[arg(long)]
    pub address: String,

    /// Delivery city id or name.
    #[arg(long)]
    pub city: String,

    /// Show the summary without placing the order.
    #[arg(long)]
    pub dry_run: bool,
}
