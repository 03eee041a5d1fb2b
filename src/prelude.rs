//! Cartsplit prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    config::{CartConfig, ShippingPolicy, StackingOrder, ThresholdPromotion},
    coupons::{Coupon, CouponChoice, CouponKind},
    fixtures::{ExpectedOutcome, Fixture, FixtureError, ScenarioFixture},
    input::{CartInput, ConfigInput, CouponInput, ProductInput},
    normalize::{MAX_COUPONS, MAX_PRODUCT_LINES, NormalizedCart},
    pricing::{PricingOutcome, PricingStage, PricingStep, PricingTrace, price_order},
    products::{DiscountKind, ProductLine},
    report::{Report, ReportError},
    solvers::{
        INFEASIBLE_TOTAL, OrderPlan, Solver, Strategy, StrategyCandidate,
        single::SingleOrderSolver, split::SplitOrderSolver,
    },
    strategy::{Baseline, Calculation, StrategyResult, calculate_best_strategy, select_strategy},
};
