//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::discounts::{clamped_percentage, discounted_by_percent, floor_to_minor};

/// How a product line discounts itself before any order-level benefit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum DiscountKind {
    /// No line discount.
    #[default]
    None,

    /// A fixed amount off every unit on the line.
    Fixed,

    /// A percentage off the whole line.
    Percent,

    /// Any kind that isn't recognised. Treated as no discount.
    Unrecognized,
}

impl From<&str> for DiscountKind {
    fn from(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "" | "none" => DiscountKind::None,
            "fixed" => DiscountKind::Fixed,
            "percent" => DiscountKind::Percent,
            _ => DiscountKind::Unrecognized,
        }
    }
}

impl From<String> for DiscountKind {
    fn from(kind: String) -> Self {
        DiscountKind::from(kind.as_str())
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::None => write!(f, "none"),
            DiscountKind::Fixed => write!(f, "fixed"),
            DiscountKind::Percent => write!(f, "percent"),
            DiscountKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    /// Display name
    pub name: String,

    /// Unit price in minor units
    pub price: i64,

    /// Number of units
    pub quantity: i64,

    /// Line discount kind
    pub discount_kind: DiscountKind,

    /// Line discount value: minor units per unit for [`DiscountKind::Fixed`], percent points for
    /// [`DiscountKind::Percent`].
    pub discount_value: Decimal,

    /// Whether the line takes part in the calculation
    pub active: bool,
}

impl ProductLine {
    /// Create an active product line without a line discount.
    pub fn new(name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            discount_kind: DiscountKind::None,
            discount_value: Decimal::ZERO,
            active: true,
        }
    }

    /// Set the line discount.
    #[must_use]
    pub fn with_discount(mut self, kind: DiscountKind, value: Decimal) -> Self {
        self.discount_kind = kind;
        self.discount_value = value;
        self
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Line amount before any discount (`price × quantity`).
    pub fn base_amount(&self) -> i64 {
        self.price.saturating_mul(self.quantity).max(0)
    }

    /// Line amount after the line's own discount.
    pub fn discounted_amount(&self) -> i64 {
        let base = self.base_amount();

        match self.discount_kind {
            DiscountKind::Fixed => {
                let per_unit = floor_to_minor(self.discount_value);

                base.saturating_sub(per_unit.saturating_mul(self.quantity)).max(0)
            }
            DiscountKind::Percent => {
                discounted_by_percent(clamped_percentage(self.discount_value), base)
            }
            DiscountKind::None | DiscountKind::Unrecognized => base,
        }
    }

    /// Whether the line is usable for optimisation.
    pub fn is_eligible(&self) -> bool {
        self.active && self.price >= 0 && self.quantity > 0
    }
}

/// Sum of line amounts before line discounts.
pub fn base_total<'a>(lines: impl IntoIterator<Item = &'a ProductLine>) -> i64 {
    lines
        .into_iter()
        .fold(0i64, |acc, line| acc.saturating_add(line.base_amount()))
}

/// Sum of line amounts after each line's own discount.
pub fn discounted_total<'a>(lines: impl IntoIterator<Item = &'a ProductLine>) -> i64 {
    lines
        .into_iter()
        .fold(0i64, |acc, line| acc.saturating_add(line.discounted_amount()))
}
