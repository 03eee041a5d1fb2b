//! Single-order solver

use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::{
    config::CartConfig,
    coupons::CouponChoice,
    normalize::{MAX_PRODUCT_LINES, NormalizedCart},
    pricing::price_order,
    solvers::{OrderPlan, Solver, Strategy, StrategyCandidate},
};

/// Prices the whole cart as one order with each coupon choice, keeping the cheapest.
///
/// Choices are tried as "no coupon" first and then in pool order; a later choice only wins
/// with a strictly smaller total.
#[derive(Debug)]
pub struct SingleOrderSolver;

impl Solver for SingleOrderSolver {
    const STRATEGY: Strategy = Strategy::SingleOrder;

    fn solve(cart: &NormalizedCart, config: &CartConfig) -> StrategyCandidate {
        let lines: SmallVec<[usize; MAX_PRODUCT_LINES]> = (0..cart.products().len()).collect();

        let mut best: Option<OrderPlan> = None;

        for choice in CouponChoice::options(cart.coupons()) {
            let outcome = price_order(cart.products(), choice, config);

            if best
                .as_ref()
                .is_none_or(|current| outcome.total < current.total())
            {
                best = Some(OrderPlan {
                    lines: lines.clone(),
                    coupon: choice.index(),
                    outcome,
                });
            }
        }

        let Some(best) = best else {
            return StrategyCandidate::infeasible(Self::STRATEGY);
        };

        debug!(
            total = best.total(),
            coupon = ?best.coupon,
            "selected best single order"
        );

        StrategyCandidate::new(Self::STRATEGY, smallvec![best])
    }
}
