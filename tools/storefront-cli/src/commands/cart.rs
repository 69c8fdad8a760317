//! Cart commands.

use anyhow::{anyhow, Result};
use serde::Serialize;
use storefront_commerce::cart::{AddOutcome, BundleGroup, CartLineItem};
use storefront_commerce::ids::{BundleId, ProductId};
use storefront_commerce::money::Money;

use super::{CartArgs, CartCommand};
use crate::context::{Context, FileCart};
use crate::output::{bundle_badge, format_weight};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CartCommand::Show) | None => show_cart(ctx),
        Some(CartCommand::Add {
            product,
            quantity,
            size,
            color,
        }) => add_line(ctx, &product, quantity, size, color),
        Some(CartCommand::Update {
            product,
            quantity,
            size,
            color,
        }) => update_line(ctx, &product, quantity, size.as_deref(), color.as_deref()),
        Some(CartCommand::Remove {
            product,
            bundle,
            size,
            color,
        }) => remove_lines(ctx, &product, bundle, size.as_deref(), color.as_deref()),
        Some(CartCommand::Clear) => {
            let mut cart = ctx.open_cart()?;
            let lines = cart.total_items();
            cart.clear();
            ctx.output.success(&format!("Cleared {} line(s)", lines));
            Ok(())
        }
    }
}

/// JSON view of the cart.
#[derive(Serialize)]
struct CartView<'a> {
    bundles: Vec<BundleGroup>,
    regular_items: Vec<&'a CartLineItem>,
    total_items: usize,
    total_price: Money,
    total_weight_grams: u64,
    incomplete_bundles: usize,
}

fn show_cart(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    print_cart(ctx, &cart);
    Ok(())
}

/// Print the cart the way the cart drawer shows it.
pub fn print_cart(ctx: &Context, cart: &FileCart) {
    let bundles = cart.bundles();
    let incomplete = bundles.iter().filter(|b| !b.is_complete).count();

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            bundles,
            regular_items: cart.regular_items(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            total_weight_grams: cart.total_weight_grams(),
            incomplete_bundles: incomplete,
        });
        return;
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    for bundle in &bundles {
        ctx.output.header(&format!(
            "{} [{}] {}",
            display_or(&bundle.offer_name, "Bundle Offer"),
            bundle.bundle_id,
            bundle_badge(bundle.is_complete)
        ));
        for (item, line_total) in bundle.items.iter().zip(bundle.line_totals()) {
            let label = item
                .variant_label()
                .map(|v| format!(" ({})", v))
                .unwrap_or_default();
            ctx.output.table_row(
                &[
                    &format!("{}{}", item.product_name, label),
                    &format!("x{}", item.quantity),
                    &line_total.display(),
                ],
                &[40, 6, 16],
            );
        }
        ctx.output.kv(
            "Items",
            &format!("{}/{}", bundle.current_quantity, bundle.required_quantity),
        );
        ctx.output.kv("Per item", &bundle.price_per_item.display());
        ctx.output.kv("Bundle total", &bundle.calculated_total.display());
        if !bundle.is_complete {
            ctx.output.warn(&format!(
                "Add {} more item(s) to complete this bundle: storefront bundle add {} --edit {}",
                bundle.remaining_quantity(),
                display_or(&bundle.offer_slug, bundle.offer_id.as_str()),
                bundle.bundle_id
            ));
        }
    }

    let regular = cart.regular_items();
    if !regular.is_empty() {
        ctx.output.header("Items");
        for item in regular {
            let label = item
                .variant_label()
                .map(|v| format!(" ({})", v))
                .unwrap_or_default();
            ctx.output.table_row(
                &[
                    &format!("{}{}", item.product_name, label),
                    &format!("x{}", item.quantity),
                    &item.unit_price().multiply(item.quantity).display(),
                ],
                &[40, 6, 16],
            );
        }
    }

    ctx.output.header("Summary");
    ctx.output.kv("Lines", &cart.total_items().to_string());
    ctx.output.kv("Weight", &format_weight(cart.total_weight_grams()));
    ctx.output.kv("Total", &cart.total_price().display());
    if incomplete > 0 {
        ctx.output
            .warn(&format!("{} bundle(s) are incomplete; checkout is blocked", incomplete));
    }
}

fn add_line(
    ctx: &Context,
    product: &str,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog
        .product(product)
        .ok_or_else(|| anyhow!("Product '{}' not found", product))?;

    let mut item = CartLineItem::from_product(product, quantity);
    item.size = size;
    item.color = color;

    let mut cart = ctx.open_cart()?;
    match cart.add_item(item) {
        AddOutcome::Appended => ctx.output.success(&format!("Added {} x{}", product.name, quantity)),
        AddOutcome::Merged { quantity } => {
            ctx.output.success(&format!("{} now x{}", product.name, quantity))
        }
        AddOutcome::Ignored => ctx.output.warn("Line already in cart"),
    }
    Ok(())
}

fn update_line(
    ctx: &Context,
    product: &str,
    quantity: u32,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    if cart.update_item_quantity(&ProductId::new(product), size, color, quantity) {
        ctx.output.success(&format!("Updated {} to x{}", product, quantity));
    } else {
        ctx.output.warn(&format!("No regular line for '{}' matched", product));
    }
    Ok(())
}

fn remove_lines(
    ctx: &Context,
    product: &str,
    bundle: Option<String>,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let bundle = bundle.map(BundleId::new);
    let removed = cart.remove_item(&ProductId::new(product), bundle.as_ref(), size, color);
    if removed == 0 {
        ctx.output.info("Nothing to remove");
    } else {
        ctx.output.success(&format!("Removed {} line(s)", removed));
    }
    Ok(())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
