//! Purchase strategy solvers

use std::fmt;

use smallvec::SmallVec;

use crate::{
    config::CartConfig,
    normalize::{MAX_PRODUCT_LINES, NormalizedCart},
    pricing::PricingOutcome,
};

pub mod single;
pub mod split;

/// Total reported by a strategy with no candidate at all. Real totals saturate at `i64::MAX` and
/// can exceed it, so check [`StrategyCandidate::is_feasible`] before comparing.
pub const INFEASIBLE_TOTAL: i64 = i64::MAX / 4;

/// Ways of buying the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Everything in one order
    SingleOrder,

    /// The lines split across two orders
    SplitOrder,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SingleOrder => write!(f, "buy in one order"),
            Strategy::SplitOrder => write!(f, "split into two orders"),
        }
    }
}

/// One priced order of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    /// Indexes of the cart's product lines in this order
    pub lines: SmallVec<[usize; MAX_PRODUCT_LINES]>,

    /// Index of the coupon used, if any
    pub coupon: Option<usize>,

    /// Pricing of the order
    pub outcome: PricingOutcome,
}

impl OrderPlan {
    /// Amount payable for this order.
    pub fn total(&self) -> i64 {
        self.outcome.total
    }
}

/// Best way a solver found to buy the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCandidate {
    /// Strategy the candidate belongs to
    pub strategy: Strategy,

    /// Sum of every order total, or [`INFEASIBLE_TOTAL`]
    pub total: i64,

    /// Orders making up the candidate; empty when infeasible
    pub orders: SmallVec<[OrderPlan; 2]>,
}

impl StrategyCandidate {
    /// Build a candidate from its orders.
    pub fn new(strategy: Strategy, orders: SmallVec<[OrderPlan; 2]>) -> Self {
        let total = orders
            .iter()
            .fold(0i64, |acc, order| acc.saturating_add(order.total()));

        Self {
            strategy,
            total,
            orders,
        }
    }

    /// A strategy that has nothing to offer for this cart.
    pub fn infeasible(strategy: Strategy) -> Self {
        Self {
            strategy,
            total: INFEASIBLE_TOTAL,
            orders: SmallVec::new(),
        }
    }

    /// Whether the solver found a real candidate.
    pub fn is_feasible(&self) -> bool {
        !self.orders.is_empty()
    }
}

/// A strategy search over a normalised cart.
pub trait Solver {
    /// Strategy this solver evaluates.
    const STRATEGY: Strategy;

    /// Find the cheapest candidate for the cart.
    fn solve(cart: &NormalizedCart, config: &CartConfig) -> StrategyCandidate;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::pricing::PricingTrace;

    fn order(total: i64) -> OrderPlan {
        OrderPlan {
            lines: smallvec![0],
            coupon: None,
            outcome: PricingOutcome {
                total,
                trace: PricingTrace {
                    subtotal: total,
                    steps: SmallVec::new(),
                    merchandise: total,
                    shipping: 0,
                },
            },
        }
    }

    #[test]
    fn candidate_total_sums_its_orders() {
        let candidate =
            StrategyCandidate::new(Strategy::SplitOrder, smallvec![order(1_000), order(2_500)]);

        assert_eq!(candidate.total, 3_500);
        assert!(candidate.is_feasible());
    }

    #[test]
    fn infeasible_candidate_has_no_orders() {
        let candidate = StrategyCandidate::infeasible(Strategy::SplitOrder);

        assert!(!candidate.is_feasible());
        assert!(candidate.total > 1_000_000_000_000_000);
    }
}
