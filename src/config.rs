//! Cart configuration

use std::fmt;

use rusty_money::iso::{self, Currency};

/// The order-level "spend X, get Y off" promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdPromotion {
    /// Amount the order must reach
    pub threshold: i64,

    /// Amount taken off once the threshold is reached
    pub off: i64,
}

impl ThresholdPromotion {
    /// Create a threshold promotion.
    pub const fn new(threshold: i64, off: i64) -> Self {
        Self { threshold, off }
    }

    /// The promotion only exists when both amounts are positive.
    pub const fn is_enabled(&self) -> bool {
        self.threshold > 0 && self.off > 0
    }

    /// Apply the promotion to `amount`. Returns `None` when it doesn't apply.
    pub fn apply(&self, amount: i64) -> Option<i64> {
        (self.is_enabled() && amount >= self.threshold)
            .then(|| amount.saturating_sub(self.off).max(0))
    }
}

/// Order in which the threshold promotion and the coupon are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackingOrder {
    /// Threshold promotion first, coupon on the promoted amount.
    #[default]
    PromotionFirst,

    /// Coupon first, threshold promotion on the couponed amount.
    CouponFirst,
}

impl From<bool> for StackingOrder {
    /// `true` means promotion before coupon.
    fn from(promo_before_coupon: bool) -> Self {
        if promo_before_coupon {
            StackingOrder::PromotionFirst
        } else {
            StackingOrder::CouponFirst
        }
    }
}

impl fmt::Display for StackingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackingOrder::PromotionFirst => write!(f, "promotion → coupon"),
            StackingOrder::CouponFirst => write!(f, "coupon → promotion"),
        }
    }
}

/// Shipping fee with an optional free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShippingPolicy {
    /// Fee charged per order
    pub fee: i64,

    /// Merchandise amount from which shipping is free; `0` disables free shipping
    pub free_threshold: i64,
}

impl ShippingPolicy {
    /// Create a shipping policy.
    pub const fn new(fee: i64, free_threshold: i64) -> Self {
        Self {
            fee,
            free_threshold,
        }
    }

    /// Shipping charged for an order whose discounted merchandise totals `merchandise`.
    pub const fn shipping_for(&self, merchandise: i64) -> i64 {
        if self.free_threshold > 0 && merchandise >= self.free_threshold {
            0
        } else if self.fee > 0 {
            self.fee
        } else {
            0
        }
    }
}

/// Settings shared by every order priced in one calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartConfig {
    /// Threshold promotion
    pub promotion: ThresholdPromotion,

    /// Promotion/coupon stacking order
    pub stacking: StackingOrder,

    /// Shipping policy
    pub shipping: ShippingPolicy,

    /// Currency used to display amounts
    pub currency: &'static Currency,
}

impl CartConfig {
    /// Create a config with promotion-before-coupon stacking.
    pub fn new(promotion: ThresholdPromotion, shipping: ShippingPolicy) -> Self {
        Self {
            promotion,
            shipping,
            ..Self::default()
        }
    }

    /// Set the stacking order.
    #[must_use]
    pub fn with_stacking(mut self, stacking: StackingOrder) -> Self {
        self.stacking = stacking;
        self
    }

    /// Set the display currency.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = currency;
        self
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            promotion: ThresholdPromotion::default(),
            stacking: StackingOrder::default(),
            shipping: ShippingPolicy::default(),
            currency: iso::KRW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_needs_both_amounts() {
        assert!(!ThresholdPromotion::new(0, 1_000).is_enabled());
        assert!(!ThresholdPromotion::new(30_000, 0).is_enabled());
        assert_eq!(ThresholdPromotion::new(0, 1_000).apply(50_000), None);
    }

    #[test]
    fn promotion_applies_from_the_threshold() {
        let promotion = ThresholdPromotion::new(30_000, 3_000);

        assert_eq!(promotion.apply(29_999), None);
        assert_eq!(promotion.apply(30_000), Some(27_000));
    }

    #[test]
    fn promotion_cannot_go_below_zero() {
        let promotion = ThresholdPromotion::new(100, 5_000);

        assert_eq!(promotion.apply(200), Some(0));
    }

    #[test]
    fn free_shipping_from_the_threshold() {
        let shipping = ShippingPolicy::new(3_000, 30_000);

        assert_eq!(shipping.shipping_for(29_999), 3_000);
        assert_eq!(shipping.shipping_for(30_000), 0);
    }

    #[test]
    fn zero_free_threshold_always_charges() {
        let shipping = ShippingPolicy::new(3_000, 0);

        assert_eq!(shipping.shipping_for(1_000_000), 3_000);
    }

    #[test]
    fn negative_off_amount_disables_the_promotion() {
        let promotion = ThresholdPromotion::new(30_000, -5_000);

        assert!(!promotion.is_enabled());
        assert_eq!(promotion.apply(50_000), None);
    }

    #[test]
    fn negative_shipping_fee_charges_nothing() {
        let shipping = ShippingPolicy::new(-3_000, 30_000);

        assert_eq!(shipping.shipping_for(10_000), 0);
        assert_eq!(shipping.shipping_for(40_000), 0);
    }

    #[test]
    fn stacking_order_defaults_to_promotion_first() {
        assert_eq!(CartConfig::default().stacking, StackingOrder::PromotionFirst);
        assert_eq!(StackingOrder::from(false), StackingOrder::CouponFirst);
    }
}
