//! Orders drafted from checkout requests.

use crate::checkout::{CheckoutRequest, City, CustomerDetails, OrderItemPayload};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, waiting for the shop to confirm.
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable number, e.g. `ORD-12345678042`.
    pub order_number: String,
    pub customer: CustomerDetails,
    /// City name at the time of ordering.
    pub city_name: String,
    pub items: Vec<OrderItemPayload>,
    /// Σ `price * quantity` over the submitted lines.
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub discount: Money,
    pub total: Money,
    pub status: OrderStatus,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl Order {
    /// Draft an order from a submitted request.
    ///
    /// Totals are recomputed from the submitted lines; the city's flat
    /// shipping cost is added on top.
    pub fn from_request(
        request: &CheckoutRequest,
        city: &City,
        order_number: impl Into<String>,
    ) -> Result<Self, CommerceError> {
        request.customer.validate()?;
        if request.items.is_empty() {
            return Err(CommerceError::CartEmpty);
        }
        if request.customer.city_id != city.id {
            return Err(CommerceError::CityMismatch(request.customer.city_id.to_string()));
        }

        let currency = city.shipping_cost.currency;
        let line_totals: Vec<Money> = request.items.iter().map(OrderItemPayload::line_total).collect();
        let subtotal = Money::try_sum(line_totals.iter(), currency).ok_or_else(|| {
            CommerceError::Gateway("order lines are not in the shipping currency".to_string())
        })?;
        let total = subtotal
            .try_add(&city.shipping_cost)
            .ok_or_else(|| CommerceError::Gateway("order total overflows".to_string()))?;

        Ok(Self {
            id: OrderId::generate(),
            order_number: order_number.into(),
            customer: request.customer.clone(),
            city_name: city.name.clone(),
            items: request.items.clone(),
            subtotal,
            shipping_cost: city.shipping_cost,
            discount: Money::zero(currency),
            total,
            status: OrderStatus::Pending,
            created_at: current_timestamp_ms(),
        })
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// `ORD-` followed by the last 8 digits of `now_ms` and 3 random digits.
pub fn generate_order_number(now_ms: i64) -> String {
    let suffix = rand::thread_rng().gen_range(0..1000);
    format_order_number(now_ms, suffix)
}

/// Generate order numbers until `exists` reports one as free.
pub fn generate_unique_order_number<F>(now_ms: i64, mut exists: F) -> Result<String, CommerceError>
where
    F: FnMut(&str) -> Result<bool, CommerceError>,
{
    const MAX_ATTEMPTS: u32 = 1000;

    for _ in 0..MAX_ATTEMPTS {
        let candidate = generate_order_number(now_ms);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        tracing::debug!(order_number = %candidate, "order number taken, retrying");
    }
    Err(CommerceError::Gateway(
        "could not find a free order number".to_string(),
    ))
}

fn format_order_number(now_ms: i64, suffix: u32) -> String {
    format!("ORD-{:08}{:03}", now_ms.rem_euclid(100_000_000), suffix % 1000)
}

/// Current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
