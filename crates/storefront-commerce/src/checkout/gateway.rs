//! Order submission.

use crate::cart::{CartPersistence, CartStore};
use crate::checkout::order::current_timestamp_ms;
use crate::checkout::{
    generate_unique_order_number, CheckoutRequest, City, CustomerDetails, Order,
};
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use storefront_cache::{Cache, KeyValueStore};

/// Key prefix for orders recorded by [`CacheOrderGateway`].
pub const ORDER_KEY_PREFIX: &str = "order:";

/// What the order endpoint answers on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_number: String,
    /// The drafted order, when the endpoint returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Something that accepts checkout requests.
pub trait OrderGateway {
    fn submit(&self, request: &CheckoutRequest) -> Result<OrderConfirmation, CommerceError>;
}

/// Build the request from the cart, submit it, and clear the cart on
/// success. On failure the cart is left untouched.
pub fn place_order<P, G>(
    cart: &mut CartStore<P>,
    customer: CustomerDetails,
    gateway: &G,
) -> Result<OrderConfirmation, CommerceError>
where
    P: CartPersistence,
    G: OrderGateway + ?Sized,
{
    let request = CheckoutRequest::from_cart(customer, cart)?;
    let confirmation = match gateway.submit(&request) {
        Ok(confirmation) => confirmation,
        Err(e) => {
            tracing::warn!(error = %e, lines = request.items.len(), "order submission failed");
            return Err(e);
        }
    };

    tracing::info!(
        order_number = %confirmation.order_number,
        lines = request.items.len(),
        subtotal = %request.subtotal(),
        "order placed"
    );
    cart.clear();
    Ok(confirmation)
}

/// Drafts orders locally and records them in a key-value cache under
/// `order:{number}`.
#[derive(Debug, Clone)]
pub struct CacheOrderGateway<S> {
    cache: Cache<S>,
    cities: Vec<City>,
}

impl<S: KeyValueStore> CacheOrderGateway<S> {
    pub fn new(cache: Cache<S>, cities: Vec<City>) -> Self {
        Self { cache, cities }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Look up a recorded order.
    pub fn order(&self, order_number: &str) -> Result<Option<Order>, CommerceError> {
        Ok(self.cache.get(&order_key(order_number))?)
    }

    /// Numbers of every recorded order.
    pub fn order_numbers(&self) -> Result<Vec<String>, CommerceError> {
        let keys = self.cache.keys_with_prefix(ORDER_KEY_PREFIX)?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(ORDER_KEY_PREFIX).map(str::to_string))
            .collect())
    }
}

impl<S: KeyValueStore> OrderGateway for CacheOrderGateway<S> {
    fn submit(&self, request: &CheckoutRequest) -> Result<OrderConfirmation, CommerceError> {
        let city_id = &request.customer.city_id;
        let city = self
            .cities
            .iter()
            .find(|c| &c.id == city_id)
            .ok_or_else(|| CommerceError::CityMismatch(city_id.to_string()))?;

        let order_number = generate_unique_order_number(current_timestamp_ms(), |candidate| {
            Ok(self.cache.exists(&order_key(candidate))?)
        })?;
        let order = Order::from_request(request, city, order_number)?;
        self.cache.set(&order_key(&order.order_number), &order)?;

        tracing::debug!(order_number = %order.order_number, total = %order.total, "order recorded");
        Ok(OrderConfirmation {
            order_number: order.order_number.clone(),
            order: Some(order),
        })
    }
}

fn order_key(order_number: &str) -> String {
    format!("{}{}", ORDER_KEY_PREFIX, order_number)
}
