//! Cart pricing breakdown.

use crate::ids::{BundleId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a whole cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of bundle line shares; equals the bundles' totals.
    pub bundle_subtotal: Money,
    /// Sum of regular lines at unit price.
    pub regular_subtotal: Money,
    /// `bundle_subtotal + regular_subtotal`.
    pub subtotal: Money,
    /// One entry per priced cart line, in cart order.
    pub lines: Vec<LinePricing>,
}

impl CartPricing {
    /// Number of units across all priced lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether any line is priced through a bundle.
    pub fn has_bundles(&self) -> bool {
        self.lines.iter().any(|l| l.bundle_id.is_some())
    }
}

/// Price of a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub bundle_id: Option<BundleId>,
    /// Effective unit price: the bundle's per-item price for bundle lines.
    pub unit_price: Money,
    pub quantity: u32,
    /// What the line is charged. For bundle lines this is the line's share
    /// of the bundle total, which can differ from `unit_price * quantity` by
    /// the rounding remainder.
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_unit_count_and_bundles() {
        let lkr = |major| Money::from_major(major, Currency::LKR);
        let pricing = CartPricing {
            bundle_subtotal: lkr(1000),
            regular_subtotal: lkr(300),
            subtotal: lkr(1300),
            lines: vec![
                LinePricing {
                    product_id: ProductId::new("a"),
                    bundle_id: Some(BundleId::new("b1")),
                    unit_price: lkr(500),
                    quantity: 2,
                    total: lkr(1000),
                },
                LinePricing {
                    product_id: ProductId::new("c"),
                    bundle_id: None,
                    unit_price: lkr(300),
                    quantity: 1,
                    total: lkr(300),
                },
            ],
        };

        assert_eq!(pricing.unit_count(), 3);
        assert!(pricing.has_bundles());
    }
}
