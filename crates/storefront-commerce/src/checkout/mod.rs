//! Checkout: the order payload, shipping, order drafting and submission.

mod gateway;
mod order;
mod request;
mod shipping;

pub use gateway::{place_order, CacheOrderGateway, OrderConfirmation, OrderGateway, ORDER_KEY_PREFIX};
pub use order::{generate_order_number, generate_unique_order_number, Order, OrderStatus};
pub use request::{CheckoutRequest, CheckoutSummary, CustomerDetails, OrderItemPayload};
pub use shipping::{weight_based_shipping, City};
