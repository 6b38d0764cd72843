//! Discount value computation and labeling.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The pricing rule a coupon carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DiscountValue {
    /// Fixed amount off.
    Fixed(Money),
    /// Percentage off (0.0 - 100.0).
    Percentage(f64),
}

impl DiscountValue {
    /// Calculate the discount for a given purchase amount.
    ///
    /// The result is bounded on both sides: never above the purchase
    /// amount, never below zero. Both the amount and the percent are
    /// caller-supplied data, so a negative value must not surface as a
    /// surcharge.
    pub fn discount_for(&self, purchase: Money) -> Money {
        if !purchase.is_positive() {
            return Money::zero(purchase.currency);
        }
        let raw = match self {
            DiscountValue::Fixed(amount) => amount.amount_cents,
            DiscountValue::Percentage(percent) => purchase.percentage(*percent).amount_cents,
        };
        Money::new(raw.clamp(0, purchase.amount_cents), purchase.currency)
    }

    /// Human-readable label (e.g., "20% OFF", "100 OFF").
    ///
    /// Lives next to `discount_for` so presentation can never drift from
    /// the numeric rule.
    pub fn label(&self) -> String {
        match self {
            DiscountValue::Fixed(amount) => {
                if amount.amount_cents % 100 == 0 {
                    format!("{} OFF", amount.amount_cents / 100)
                } else {
                    format!("{} OFF", amount.display_amount())
                }
            }
            DiscountValue::Percentage(percent) => {
                if percent.fract() == 0.0 {
                    format!("{}% OFF", *percent as i64)
                } else {
                    format!("{}% OFF", percent)
                }
            }
        }
    }
}
