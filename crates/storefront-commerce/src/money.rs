//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit (cents for USD, cents
//! of a rupee for LKR). Bundle pricing divides a total by a quantity, so the
//! one rounding step lives in [`Money::divide_round`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Sri Lankan rupee.
    #[default]
    LKR,
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "LKR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::LKR => "LKR",
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the display prefix (e.g., "Rs. ").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::LKR => "Rs. ",
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "LKR" => Some(Currency::LKR),
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub minor_units: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Create a Money value from whole units (e.g. rupees).
    ///
    /// ```
    /// use storefront_commerce::money::{Currency, Money};
    /// assert_eq!(Money::from_major(2000, Currency::LKR).minor_units, 200_000);
    /// ```
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Self::new(amount.saturating_mul(currency.minor_per_major()), currency)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use storefront_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(849.99, Currency::LKR);
    /// assert_eq!(price.minor_units, 84_999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let minor_units = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(minor_units, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.minor_units as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "Rs. 2,000.00").
    pub fn display(&self) -> String {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency.symbol(), self.display_amount())
    }

    /// Format the absolute amount without symbol (e.g., "2,000.00").
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major() as u64;
        let abs = self.minor_units.unsigned_abs();
        let places = self.currency.decimal_places() as usize;
        format!(
            "{}.{:0places$}",
            group_thousands(abs / per_major),
            abs % per_major
        )
    }

    /// Try to add another Money value, returning None if currencies don't
    /// match or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let sum = self.minor_units.checked_add(other.minor_units)?;
        Some(Money::new(sum, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let diff = self.minor_units.checked_sub(other.minor_units)?;
        Some(Money::new(diff, self.currency))
    }

    /// Multiply by a quantity, saturating on overflow.
    pub fn multiply(&self, factor: u32) -> Money {
        Money::new(
            self.minor_units.saturating_mul(i64::from(factor)),
            self.currency,
        )
    }

    /// Divide by a quantity, rounding half away from zero to the minor unit.
    ///
    /// Returns `None` when `divisor` is zero.
    ///
    /// ```
    /// use storefront_commerce::money::{Currency, Money};
    /// let bundle = Money::from_major(2000, Currency::LKR);
    /// assert_eq!(bundle.divide_round(3).unwrap().minor_units, 66_667);
    /// assert!(bundle.divide_round(0).is_none());
    /// ```
    pub fn divide_round(&self, divisor: u32) -> Option<Money> {
        if divisor == 0 {
            return None;
        }
        let divisor = i64::from(divisor);
        let quotient = self.minor_units / divisor;
        let remainder = self.minor_units % divisor;
        let rounded = if remainder.abs() * 2 >= divisor {
            quotient + self.minor_units.signum()
        } else {
            quotient
        };
        Some(Money::new(rounded, self.currency))
    }

    /// `self × numerator / denominator`, rounded once, half away from zero.
    ///
    /// Returns `None` when `denominator` is zero. Saturates on overflow.
    ///
    /// ```
    /// use storefront_commerce::money::{Currency, Money};
    /// let bundle = Money::from_major(2000, Currency::LKR);
    /// assert_eq!(bundle.prorate(3, 3).unwrap(), bundle);
    /// assert_eq!(bundle.prorate(2, 3).unwrap().minor_units, 133_333);
    /// ```
    pub fn prorate(&self, numerator: u32, denominator: u32) -> Option<Money> {
        if denominator == 0 {
            return None;
        }
        let scaled = i128::from(self.minor_units) * i128::from(numerator);
        let divisor = i128::from(denominator);
        let quotient = scaled / divisor;
        let remainder = scaled % divisor;
        let rounded = if remainder.abs() * 2 >= divisor {
            quotient + scaled.signum()
        } else {
            quotient
        };
        let minor_units = i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX });
        Some(Money::new(minor_units, self.currency))
    }

    /// Sum an iterator of Money values, returning None on a currency
    /// mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(850, Currency::LKR);
        assert_eq!(m.minor_units, 85_000);
        assert_eq!(m.currency, Currency::LKR);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_major(2000, Currency::LKR).display(), "Rs. 2,000.00");
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(5, Currency::LKR).display(), "Rs. 0.05");
        assert_eq!(Money::new(-150, Currency::USD).display(), "-$1.50");
        assert_eq!(
            Money::from_major(1_234_567, Currency::LKR).display_amount(),
            "1,234,567.00"
        );
    }

    #[test]
    fn test_money_try_add() {
        let a = Money::new(1000, Currency::LKR);
        let b = Money::new(500, Currency::LKR);
        assert_eq!(a.try_add(&b).unwrap().minor_units, 1500);

        let usd = Money::new(1000, Currency::USD);
        assert!(a.try_add(&usd).is_none());
    }

    #[test]
    fn test_money_multiply_saturates() {
        let m = Money::new(i64::MAX / 2, Currency::LKR);
        assert_eq!(m.multiply(4).minor_units, i64::MAX);
        assert_eq!(Money::new(50_000, Currency::LKR).multiply(6).minor_units, 300_000);
    }

    #[test]
    fn test_divide_round_half_away_from_zero() {
        assert_eq!(Money::new(5, Currency::LKR).divide_round(2).unwrap().minor_units, 3);
        assert_eq!(Money::new(-5, Currency::LKR).divide_round(2).unwrap().minor_units, -3);
        assert_eq!(Money::new(200_000, Currency::LKR).divide_round(4).unwrap().minor_units, 50_000);
    }

    #[test]
    fn test_prorate_rounds_once() {
        let price = Money::from_major(2000, Currency::LKR);
        assert_eq!(price.prorate(1, 3).unwrap().minor_units, 66_667);
        assert_eq!(price.prorate(3, 3).unwrap(), price);
        assert_eq!(price.prorate(6, 3).unwrap().minor_units, 400_000);
        assert!(price.prorate(1, 0).is_none());
        assert_eq!(Money::new(i64::MAX, Currency::LKR).prorate(2, 1).unwrap().minor_units, i64::MAX);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(100, Currency::LKR), Money::new(250, Currency::LKR)];
        assert_eq!(Money::try_sum(values.iter(), Currency::LKR).unwrap().minor_units, 350);
        assert!(Money::try_sum(values.iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("lkr"), Some(Currency::LKR));
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}
