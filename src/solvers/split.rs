//! Split-order solver
//!
//! Exhaustive search over every way of splitting the cart's lines into two non-empty orders and
//! every way of assigning coupons to them. Line `i` goes to order A when bit `i` of the mask is
//! set and to order B otherwise. With at most five lines and three coupons this is at most
//! 32 masks × 16 coupon pairs, so nothing is pruned.

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::{
    config::CartConfig,
    coupons::CouponChoice,
    normalize::{MAX_COUPONS, MAX_PRODUCT_LINES, NormalizedCart},
    pricing::{PricingOutcome, price_order},
    products::ProductLine,
    solvers::{OrderPlan, Solver, Strategy, StrategyCandidate},
};

type LineIndexes = SmallVec<[usize; MAX_PRODUCT_LINES]>;

/// Finds the cheapest two-order split of the cart.
///
/// Ties keep the first candidate found: lower masks first, then coupon pairs in enumeration
/// order (order A's choice outer, order B's choice inner). Carts with fewer than two lines
/// yield [`StrategyCandidate::infeasible`].
#[derive(Debug)]
pub struct SplitOrderSolver;

impl Solver for SplitOrderSolver {
    const STRATEGY: Strategy = Strategy::SplitOrder;

    fn solve(cart: &NormalizedCart, config: &CartConfig) -> StrategyCandidate {
        let products = cart.products();
        let options: SmallVec<[CouponChoice<'_>; MAX_COUPONS + 1]> =
            CouponChoice::options(cart.coupons()).collect();

        let mut best: Option<StrategyCandidate> = None;

        for mask in 0..masks(products.len()) {
            let (left_lines, right_lines) = partition(products.len(), mask);

            if left_lines.is_empty() || right_lines.is_empty() {
                continue;
            }

            // Each order's price depends only on its own lines and coupon.
            let left_prices = price_each(products, &left_lines, &options, config);
            let right_prices = price_each(products, &right_lines, &options, config);

            for (left_choice, left) in options.iter().zip(&left_prices) {
                for (right_choice, right) in options.iter().zip(&right_prices) {
                    if left_choice.conflicts_with(right_choice) {
                        continue;
                    }

                    let total = left.total.saturating_add(right.total);

                    if best.as_ref().is_some_and(|best| total >= best.total) {
                        continue;
                    }

                    trace!(
                        mask,
                        total,
                        coupon_a = ?left_choice.index(),
                        coupon_b = ?right_choice.index(),
                        "improved split candidate"
                    );

                    best = Some(StrategyCandidate::new(
                        Self::STRATEGY,
                        smallvec![
                            plan(&left_lines, left_choice, left),
                            plan(&right_lines, right_choice, right),
                        ],
                    ));
                }
            }
        }

        match best {
            Some(candidate) => {
                debug!(total = candidate.total, "selected best split order");

                candidate
            }
            None => {
                debug!(
                    lines = products.len(),
                    "no split candidate; needs at least two product lines"
                );

                StrategyCandidate::infeasible(Self::STRATEGY)
            }
        }
    }
}

fn plan(lines: &LineIndexes, choice: &CouponChoice<'_>, outcome: &PricingOutcome) -> OrderPlan {
    OrderPlan {
        lines: lines.clone(),
        coupon: choice.index(),
        outcome: outcome.clone(),
    }
}

/// Number of masks for `lines` lines (`2^lines`).
fn masks(lines: usize) -> u32 {
    u32::try_from(lines.min(MAX_PRODUCT_LINES)).map_or(0, |lines| 1u32 << lines)
}

/// Split line indexes `0..lines` into (order A, order B) by the bits of `mask`.
fn partition(lines: usize, mask: u32) -> (LineIndexes, LineIndexes) {
    (0..lines).partition(|&i| mask & (1u32 << i) != 0)
}

/// Price the lines at `indexes` once for every coupon option.
fn price_each(
    products: &[ProductLine],
    indexes: &LineIndexes,
    options: &[CouponChoice<'_>],
    config: &CartConfig,
) -> SmallVec<[PricingOutcome; MAX_COUPONS + 1]> {
    options
        .iter()
        .map(|choice| {
            price_order(
                indexes.iter().filter_map(|&i| products.get(i)),
                *choice,
                config,
            )
        })
        .collect()
}
