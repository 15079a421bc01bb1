use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::UnknownVariant;

/// How a discount value is read against a base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the base price.
    Percentage,
    /// `discount_value` is subtracted from the base price.
    Amount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Amount => "AMOUNT",
        }
    }
}

impl FromStr for DiscountType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(DiscountType::Percentage),
            "AMOUNT" => Ok(DiscountType::Amount),
            other => Err(UnknownVariant {
                kind: "discount type",
                value: other.to_string(),
            }),
        }
    }
}

/// Display price after applying an optional discount to a base price.
///
/// Computed on every read and never persisted, so edits to the base price or
/// the discount fields are always reflected without touching stored rows.
/// Both inputs must be present for a discount to apply; either one absent
/// leaves the base price untouched. AMOUNT discounts floor at zero.
/// PERCENTAGE discounts are not clamped, so a value over 100 produces a
/// negative price.
pub fn effective_price(
    base_price: Decimal,
    discount_type: Option<DiscountType>,
    discount_value: Option<Decimal>,
) -> Decimal {
    let (discount_type, value) = match (discount_type, discount_value) {
        (Some(t), Some(v)) => (t, v),
        _ => return base_price,
    };

    match discount_type {
        DiscountType::Percentage => base_price * (Decimal::ONE - value / Decimal::from(100)),
        DiscountType::Amount => (base_price - value).max(Decimal::ZERO),
    }
}
