//! Bundle commands.

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::Utc;
use storefront_commerce::cart::{add_starter_bundle, BundleBuilder};
use storefront_commerce::catalog::Offer;
use storefront_commerce::ids::{BundleId, ProductId, VariantOptionId};

use super::{BundleArgs, BundleCommand};
use crate::context::Context;

/// Run the bundle command.
pub fn run(args: BundleArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BundleCommand::Offers => list_offers(ctx),
        BundleCommand::Add {
            offer,
            items,
            variants,
            edit,
        } => add_bundle(ctx, &offer, &items, &variants, edit),
        BundleCommand::Starter { offer } => starter_bundle(ctx, &offer),
        BundleCommand::Remove { bundle } => {
            let mut cart = ctx.open_cart()?;
            let removed = cart.remove_bundle_items(&BundleId::new(&bundle));
            if removed == 0 {
                bail!("Bundle '{}' is not in the cart", bundle);
            }
            ctx.output.success(&format!("Removed bundle {} ({} line(s))", bundle, removed));
            Ok(())
        }
    }
}

fn list_offers(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    if ctx.output.is_json() {
        ctx.output.json(&catalog.offers);
        return Ok(());
    }

    for offer in &catalog.offers {
        ctx.output.header(&format!("{} ({})", offer.name, offer.slug));
        ctx.output.kv(
            "Price",
            &format!(
                "{} for {} item(s), {} each",
                offer.price.display(),
                offer.required_quantity,
                offer.price_per_item().display()
            ),
        );
        if offer.savings_per_item().is_positive() {
            ctx.output
                .kv("You save", &format!("{} per item", offer.savings_per_item().display()));
        }
        for offer_product in &offer.products {
            let groups = offer_product.variant_groups();
            let options = groups
                .iter()
                .map(|g| {
                    let names: Vec<String> = g
                        .options
                        .iter()
                        .map(|o| format!("{}={}", o.name, o.id))
                        .collect();
                    format!("{}: {}", g.variant_type.name, names.join(" "))
                })
                .collect::<Vec<_>>()
                .join("; ");
            let suffix = if options.is_empty() {
                String::new()
            } else {
                format!(" [{}]", options)
            };
            ctx.output.list_item(&format!(
                "{} {}{}",
                offer_product.product.id, offer_product.product.name, suffix
            ));
        }
    }
    Ok(())
}

fn add_bundle(
    ctx: &Context,
    offer_key: &str,
    items: &[String],
    variants: &[String],
    edit: Option<String>,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let offer = catalog
        .offer(offer_key)
        .ok_or_else(|| anyhow!("Offer '{}' not found", offer_key))?;
    let mut cart = ctx.open_cart()?;

    let mut builder = match &edit {
        Some(bundle_id) => {
            let bundle_id = BundleId::new(bundle_id);
            let existing = cart
                .bundles()
                .into_iter()
                .find(|b| b.bundle_id == bundle_id)
                .ok_or_else(|| anyhow!("Bundle '{}' is not in the cart", bundle_id))?;
            if existing.offer_id != offer.id {
                bail!("Bundle '{}' belongs to offer '{}'", bundle_id, existing.offer_id);
            }
            BundleBuilder::edit(offer, &existing)
        }
        None => BundleBuilder::new(offer),
    };

    apply_selection(&mut builder, variants, items)?;
    ctx.output.debug(&format!(
        "{} item(s) selected, {}",
        builder.total_quantity(),
        builder.calculated_total().display()
    ));

    let total = builder.calculated_total();
    let savings = builder.total_savings();
    let bundle_id = builder.submit(&mut cart, Utc::now().timestamp_millis())?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "bundle_id": bundle_id,
            "total": total,
            "savings": savings,
        }));
        return Ok(());
    }

    let verb = if edit.is_some() { "Updated" } else { "Added" };
    ctx.output.success(&format!("{} bundle {} for {}", verb, bundle_id, total.display()));
    if savings.is_positive() {
        ctx.output.info(&format!("You save {}", savings.display()));
    }
    Ok(())
}

/// Apply `PRODUCT:OPTION` variant choices, then `PRODUCT[=QTY]` quantities.
fn apply_selection(builder: &mut BundleBuilder<'_>, variants: &[String], items: &[String]) -> Result<()> {
    for arg in variants {
        let (product, option) = arg
            .split_once(':')
            .ok_or_else(|| anyhow!("Variant '{}' must look like PRODUCT:OPTION", arg))?;
        builder.select_variant(&ProductId::new(product), &VariantOptionId::new(option))?;
    }

    for arg in items {
        let (product, quantity) = parse_item(arg)?;
        builder.set_quantity(&product, quantity)?;
    }
    Ok(())
}

fn parse_item(arg: &str) -> Result<(ProductId, u32)> {
    match arg.split_once('=') {
        Some((product, quantity)) => {
            let quantity = quantity
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", arg))?;
            Ok((ProductId::new(product.trim()), quantity))
        }
        None => Ok((ProductId::new(arg.trim()), 1)),
    }
}

fn starter_bundle(ctx: &Context, offer_key: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let offer: &Offer = catalog
        .offer(offer_key)
        .ok_or_else(|| anyhow!("Offer '{}' not found", offer_key))?;

    let mut cart = ctx.open_cart()?;
    let bundle_id = add_starter_bundle(offer, &mut cart, Utc::now().timestamp_millis());

    ctx.output.success(&format!("Started bundle {} for {}", bundle_id, offer.name));
    let bundle = cart.bundles().into_iter().find(|b| b.bundle_id == bundle_id);
    if let Some(bundle) = bundle.filter(|b| !b.is_complete) {
        ctx.output.warn(&format!(
            "Add {} more item(s): storefront bundle add {} --edit {} --item PRODUCT=QTY",
            bundle.remaining_quantity(),
            offer.slug,
            bundle_id
        ));
    }
    Ok(())
}
