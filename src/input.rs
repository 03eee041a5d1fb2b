//! Raw calculation input
//!
//! Loosely-typed products, coupons and settings as produced by a form or a scenario file. Every
//! field is optional; [`crate::normalize`] decides what survives and fills in the defaults.

use rust_decimal::Decimal;
use rusty_money::{
    Findable,
    iso::{self, Currency},
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    config::{CartConfig, ShippingPolicy, StackingOrder, ThresholdPromotion},
    coupons::{Coupon, CouponKind},
    products::{DiscountKind, ProductLine},
};

/// Product line input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    /// Display name
    pub name: Option<String>,

    /// Unit price in minor units
    pub price: Option<i64>,

    /// Number of units
    pub quantity: Option<i64>,

    /// Line discount kind (`none`, `fixed` or `percent`)
    pub discount_type: Option<DiscountKind>,

    /// Line discount value
    pub discount_value: Option<Decimal>,

    /// Whether the line is active; defaults to `true`
    pub active: Option<bool>,
}

impl From<&ProductInput> for ProductLine {
    fn from(input: &ProductInput) -> Self {
        ProductLine {
            name: input.name.clone().unwrap_or_default(),
            price: input.price.unwrap_or(0),
            quantity: input.quantity.unwrap_or(0),
            discount_kind: input.discount_type.unwrap_or_default(),
            discount_value: input.discount_value.unwrap_or(Decimal::ZERO),
            active: input.active.unwrap_or(true),
        }
    }
}

/// Coupon input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CouponInput {
    /// Display name
    pub name: Option<String>,

    /// Coupon kind (`fixed` or `percent`); coupons without one are dropped
    #[serde(rename = "type")]
    pub kind: Option<CouponKind>,

    /// Coupon value
    pub value: Option<Decimal>,

    /// Minimum spend
    pub min_spend: Option<i64>,

    /// Maximum discount for percent coupons
    pub max_discount: Option<i64>,

    /// Whether the coupon is active; defaults to `true`
    pub active: Option<bool>,
}

impl CouponInput {
    /// Build a coupon, or `None` when the input has no kind.
    pub fn to_coupon(&self) -> Option<Coupon> {
        let kind = self.kind?;

        Some(Coupon {
            name: self.name.clone().unwrap_or_default(),
            kind,
            value: self.value.unwrap_or(Decimal::ZERO),
            min_spend: self.min_spend.unwrap_or(0),
            max_discount: self.max_discount.unwrap_or(0),
            active: self.active.unwrap_or(true),
        })
    }
}

/// Settings input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    /// Threshold promotion amount
    pub threshold_amount: Option<i64>,

    /// Threshold promotion off-amount
    pub threshold_off: Option<i64>,

    /// Whether the promotion applies before the coupon; defaults to `true`
    pub promo_before_coupon: Option<bool>,

    /// Shipping fee
    pub shipping_fee: Option<i64>,

    /// Free-shipping threshold
    pub free_shipping_threshold: Option<i64>,

    /// ISO currency code used for display; defaults to `KRW`
    pub currency: Option<String>,
}

impl From<&ConfigInput> for CartConfig {
    fn from(input: &ConfigInput) -> Self {
        let currency = match input.currency.as_deref() {
            None => iso::KRW,
            Some(code) => Currency::find(code).unwrap_or_else(|| {
                warn!(currency = code, "unknown currency code, displaying amounts in KRW");

                iso::KRW
            }),
        };

        CartConfig::new(
            ThresholdPromotion::new(
                input.threshold_amount.unwrap_or(0),
                input.threshold_off.unwrap_or(0),
            ),
            ShippingPolicy::new(
                input.shipping_fee.unwrap_or(0),
                input.free_shipping_threshold.unwrap_or(0),
            ),
        )
        .with_stacking(StackingOrder::from(input.promo_before_coupon.unwrap_or(true)))
        .with_currency(currency)
    }
}

/// A complete calculation request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CartInput {
    /// Product lines in input order; `None` entries stand for empty form rows
    pub products: Vec<Option<ProductInput>>,

    /// Coupons in input order
    pub coupons: Vec<Option<CouponInput>>,

    /// Settings
    pub config: ConfigInput,
}

impl CartInput {
    /// Resolved settings for this input.
    pub fn cart_config(&self) -> CartConfig {
        CartConfig::from(&self.config)
    }
}
