//! Order pricing
//!
//! Prices one order: line discounts, then the threshold promotion and the coupon in the
//! configured [`StackingOrder`], then shipping. Every step is recorded in a [`PricingTrace`] so
//! reports can show how the total was reached without re-running the calculation.

use smallvec::{SmallVec, smallvec};

use crate::{
    config::{CartConfig, StackingOrder, ThresholdPromotion},
    coupons::CouponChoice,
    products::ProductLine,
};

/// A discount stage of the pricing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStage {
    /// Each line's own discount
    LineDiscounts,

    /// The order-level threshold promotion
    ThresholdPromotion,

    /// The order's coupon slot (possibly empty)
    Coupon,
}

/// One recorded stage: the merchandise amount before and after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingStep {
    /// Which stage ran
    pub stage: PricingStage,

    /// Merchandise amount entering the stage
    pub before: i64,

    /// Merchandise amount leaving the stage
    pub after: i64,

    /// Whether the stage took effect (e.g. the coupon's minimum spend was met)
    pub applied: bool,
}

impl PricingStep {
    /// Amount this stage took off.
    pub fn discount(&self) -> i64 {
        self.before.saturating_sub(self.after)
    }
}

/// How an order total was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTrace {
    /// Merchandise before any discount
    pub subtotal: i64,

    /// Discount stages, in the order they ran
    pub steps: SmallVec<[PricingStep; 3]>,

    /// Merchandise after every discount
    pub merchandise: i64,

    /// Shipping charged
    pub shipping: i64,
}

/// Result of pricing one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingOutcome {
    /// Amount payable, merchandise plus shipping
    pub total: i64,

    /// Step-by-step record of the computation
    pub trace: PricingTrace,
}

/// Price the given lines as one order using at most one coupon.
pub fn price_order<'a>(
    lines: impl IntoIterator<Item = &'a ProductLine>,
    coupon: CouponChoice<'_>,
    config: &CartConfig,
) -> PricingOutcome {
    let (subtotal, after_lines) = lines.into_iter().fold((0i64, 0i64), |(base, net), line| {
        (
            base.saturating_add(line.base_amount()),
            net.saturating_add(line.discounted_amount()),
        )
    });

    let mut steps: SmallVec<[PricingStep; 3]> = smallvec![PricingStep {
        stage: PricingStage::LineDiscounts,
        before: subtotal,
        after: after_lines,
        applied: after_lines != subtotal,
    }];

    let mut amount = after_lines;

    let stages = match config.stacking {
        StackingOrder::PromotionFirst => [PricingStage::ThresholdPromotion, PricingStage::Coupon],
        StackingOrder::CouponFirst => [PricingStage::Coupon, PricingStage::ThresholdPromotion],
    };

    for stage in stages {
        let step = run_stage(stage, amount, &config.promotion, coupon);

        amount = step.after;
        steps.push(step);
    }

    let merchandise = amount.max(0);
    let shipping = config.shipping.shipping_for(merchandise);

    PricingOutcome {
        total: merchandise.saturating_add(shipping),
        trace: PricingTrace {
            subtotal,
            steps,
            merchandise,
            shipping,
        },
    }
}

fn run_stage(
    stage: PricingStage,
    amount: i64,
    promotion: &ThresholdPromotion,
    coupon: CouponChoice<'_>,
) -> PricingStep {
    let applied = match stage {
        PricingStage::ThresholdPromotion => promotion.apply(amount),
        PricingStage::Coupon => coupon.apply(amount),
        PricingStage::LineDiscounts => None,
    };

    PricingStep {
        stage,
        before: amount,
        after: applied.unwrap_or(amount),
        applied: applied.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        config::ShippingPolicy,
        coupons::{Coupon, CouponKind},
        products::DiscountKind,
    };

    fn config(promotion: ThresholdPromotion, stacking: StackingOrder) -> CartConfig {
        CartConfig::new(promotion, ShippingPolicy::new(3_000, 30_000)).with_stacking(stacking)
    }

    fn choice(coupon: &Coupon) -> CouponChoice<'_> {
        CouponChoice::Coupon { index: 0, coupon }
    }

    #[test]
    fn empty_order_costs_only_shipping() {
        let lines: [ProductLine; 0] = [];

        let outcome = price_order(
            &lines,
            CouponChoice::NoCoupon,
            &CartConfig::new(ThresholdPromotion::default(), ShippingPolicy::new(3_000, 30_000)),
        );

        assert_eq!(outcome.trace.merchandise, 0);
        assert_eq!(outcome.total, 3_000);
    }

    #[test]
    fn line_discounts_are_applied_before_order_benefits() {
        let lines = [
            ProductLine::new("Shirt", 10_000, 2)
                .with_discount(DiscountKind::Fixed, Decimal::from(500)),
            ProductLine::new("Hat", 15_000, 1)
                .with_discount(DiscountKind::Percent, Decimal::from(20)),
        ];

        let outcome = price_order(
            &lines,
            CouponChoice::NoCoupon,
            &config(ThresholdPromotion::default(), StackingOrder::PromotionFirst),
        );

        assert_eq!(outcome.trace.subtotal, 35_000);
        assert_eq!(outcome.trace.merchandise, 31_000);
        assert_eq!(outcome.trace.shipping, 0);
        assert_eq!(outcome.total, 31_000);
    }

    #[test]
    fn promotion_first_checks_the_coupon_minimum_on_the_promoted_amount() {
        let lines = [ProductLine::new("Coat", 50_000, 1)];
        let coupon =
            Coupon::new("BIG", CouponKind::Fixed, Decimal::from(5_000)).with_min_spend(50_000);

        let outcome = price_order(
            &lines,
            choice(&coupon),
            &config(ThresholdPromotion::new(50_000, 5_000), StackingOrder::PromotionFirst),
        );

        // The promotion brings the order to 45_000, below the coupon's minimum spend.
        assert_eq!(outcome.trace.merchandise, 45_000);
        assert!(
            outcome
                .trace
                .steps
                .iter()
                .any(|step| step.stage == PricingStage::Coupon && !step.applied),
            "coupon step should be recorded as not applied"
        );
    }

    #[test]
    fn coupon_first_can_lose_the_promotion() {
        let lines = [ProductLine::new("Coat", 50_000, 1)];
        let coupon =
            Coupon::new("BIG", CouponKind::Fixed, Decimal::from(5_000)).with_min_spend(50_000);

        let outcome = price_order(
            &lines,
            choice(&coupon),
            &config(ThresholdPromotion::new(50_000, 5_000), StackingOrder::CouponFirst),
        );

        // The coupon brings the order to 45_000, below the promotion threshold.
        assert_eq!(outcome.trace.merchandise, 45_000);

        let stages: Vec<_> = outcome
            .trace
            .steps
            .iter()
            .map(|s| (s.stage, s.applied))
            .collect();

        assert_eq!(
            stages,
            vec![
                (PricingStage::LineDiscounts, false),
                (PricingStage::Coupon, true),
                (PricingStage::ThresholdPromotion, false),
            ]
        );
    }

    #[test]
    fn stacking_order_changes_percent_coupon_value() {
        let lines = [ProductLine::new("Coat", 40_000, 1)];
        let coupon = Coupon::new("TEN", CouponKind::Percent, Decimal::from(10));
        let promotion = ThresholdPromotion::new(30_000, 10_000);

        let promo_first = price_order(
            &lines,
            choice(&coupon),
            &config(promotion, StackingOrder::PromotionFirst),
        );

        let coupon_first = price_order(
            &lines,
            choice(&coupon),
            &config(promotion, StackingOrder::CouponFirst),
        );

        // 40_000 → 30_000 → 27_000 versus 40_000 → 36_000 → 26_000
        assert_eq!(promo_first.trace.merchandise, 27_000);
        assert_eq!(coupon_first.trace.merchandise, 26_000);
    }

    #[test]
    fn free_shipping_is_judged_after_discounts() {
        let lines = [ProductLine::new("Coat", 32_000, 1)];
        let coupon = Coupon::new("FIVE", CouponKind::Fixed, Decimal::from(5_000));

        let outcome = price_order(
            &lines,
            choice(&coupon),
            &config(ThresholdPromotion::default(), StackingOrder::PromotionFirst),
        );

        assert_eq!(outcome.trace.merchandise, 27_000);
        assert_eq!(outcome.trace.shipping, 3_000);
        assert_eq!(outcome.total, 30_000);
    }

    #[test]
    fn step_discount_is_before_minus_after() {
        let step = PricingStep {
            stage: PricingStage::Coupon,
            before: 10_000,
            after: 9_000,
            applied: true,
        };

        assert_eq!(step.discount(), 1_000);
    }
}
