//! Checkout command.

use anyhow::{anyhow, Result};
use chrono::DateTime;
use storefront_cache::Cache;
use storefront_commerce::checkout::{
    place_order, CacheOrderGateway, CheckoutRequest, CheckoutSummary, CustomerDetails,
};

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let city = catalog
        .city(&args.city)
        .ok_or_else(|| anyhow!("City '{}' not found", args.city))?;

    let customer = CustomerDetails {
        name: args.name,
        mobile: args.mobile,
        email: args.email.filter(|e| !e.trim().is_empty()),
        address: args.address,
        city_id: city.id.clone(),
    };

    let mut cart = ctx.open_cart()?;
    let summary = CheckoutSummary::new(&cart, Some(city));

    if args.dry_run {
        let request = CheckoutRequest::from_cart(customer, &cart)?;
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "request": request,
                "summary": summary,
            }));
            return Ok(());
        }
        print_cart(ctx, &cart);
        ctx.output.kv("Shipping", &summary.shipping.display());
        ctx.output.kv("Order total", &summary.total.display());
        ctx.output.info("Dry run: no order placed");
        return Ok(());
    }

    let gateway = CacheOrderGateway::new(Cache::new(ctx.open_store()?), catalog.cities.clone());
    let confirmation = place_order(&mut cart, customer, &gateway)?;

    if ctx.output.is_json() {
        ctx.output.json(&confirmation);
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", confirmation.order_number));
    if let Some(order) = &confirmation.order {
        ctx.output.kv("Status", order.status.display_name());
        ctx.output.kv("Deliver to", &format!("{}, {}", order.customer.address, order.city_name));
        ctx.output.kv("Subtotal", &order.subtotal.display());
        ctx.output.kv("Shipping", &order.shipping_cost.display());
        ctx.output.kv("Total", &order.total.display());
        if let Some(placed) = DateTime::from_timestamp_millis(order.created_at) {
            ctx.output.kv("Placed", &placed.format("%Y-%m-%d %H:%M UTC").to_string());
        }
    }
    Ok(())
}
