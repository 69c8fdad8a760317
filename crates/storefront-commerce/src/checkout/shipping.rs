//! Delivery cities and shipping cost.

use crate::ids::CityId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A delivery city with its flat shipping cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub shipping_cost: Money,
}

impl City {
    pub fn new(id: impl Into<CityId>, name: impl Into<String>, shipping_cost: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shipping_cost,
        }
    }

    /// Dropdown label, e.g. "Colombo - Rs. 350.00 shipping".
    pub fn label(&self) -> String {
        format!("{} - {} shipping", self.name, self.shipping_cost.display())
    }
}

/// Weight-based shipping: `base_rate` per started kilogram.
///
/// An empty parcel ships free.
pub fn weight_based_shipping(weight_grams: u64, base_rate: Money) -> Money {
    let started_kg = weight_grams.div_ceil(1000);
    let factor = u32::try_from(started_kg).unwrap_or(u32::MAX);
    base_rate.multiply(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_rounds_up_to_started_kilogram() {
        let rate = Money::from_major(200, Currency::LKR);
        assert_eq!(weight_based_shipping(0, rate), Money::zero(Currency::LKR));
        assert_eq!(weight_based_shipping(1, rate), rate);
        assert_eq!(weight_based_shipping(1000, rate), rate);
        assert_eq!(weight_based_shipping(1001, rate), Money::from_major(400, Currency::LKR));
    }

    #[test]
    fn test_city_label() {
        let city = City::new("c1", "Colombo", Money::from_major(350, Currency::LKR));
        assert_eq!(city.label(), "Colombo - Rs. 350.00 shipping");
    }
}
