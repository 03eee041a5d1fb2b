//! Strategy selection
//!
//! Compares the best single order against the best two-order split and measures the winner
//! against a baseline that takes only the line discounts.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tracing::{debug, instrument};

use crate::{
    config::CartConfig,
    input::CartInput,
    normalize::NormalizedCart,
    products::discounted_total,
    report::Report,
    solvers::{
        Solver, Strategy, StrategyCandidate, single::SingleOrderSolver, split::SplitOrderSolver,
    },
};

/// What the cart costs with line discounts only: no promotion, no coupon, one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Baseline {
    /// Merchandise after line discounts
    pub merchandise: i64,

    /// Shipping on that merchandise
    pub shipping: i64,

    /// Merchandise plus shipping
    pub total: i64,
}

impl Baseline {
    /// Compute the baseline for a cart.
    pub fn of(cart: &NormalizedCart, config: &CartConfig) -> Self {
        let merchandise = discounted_total(cart.products());
        let shipping = config.shipping.shipping_for(merchandise);

        Self {
            merchandise,
            shipping,
            total: merchandise.saturating_add(shipping),
        }
    }
}

/// The recommendation for a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyResult {
    /// Reference payment savings are measured against
    pub baseline: Baseline,

    /// Amount payable with the chosen strategy
    pub final_pay: i64,

    /// `baseline.total - final_pay`. Negative when a promotion pushes an order below the
    /// free-shipping threshold and nothing better exists.
    pub saved: i64,

    /// Saved amount as percentage points of the baseline, 2 decimal places
    pub savings_rate: Decimal,

    /// Strategy recommended
    pub chosen: Strategy,

    /// Best single order
    pub single: StrategyCandidate,

    /// Best split, or an infeasible candidate
    pub split: StrategyCandidate,

    /// One-line recommendation
    pub summary: String,
}

impl StrategyResult {
    /// Candidate of the chosen strategy.
    pub fn chosen_candidate(&self) -> &StrategyCandidate {
        match self.chosen {
            Strategy::SingleOrder => &self.single,
            Strategy::SplitOrder => &self.split,
        }
    }

    /// Report over this result. The result doesn't keep the cart or config it was computed
    /// from, so both are passed back in.
    pub fn report<'a>(&'a self, cart: &'a NormalizedCart, config: &'a CartConfig) -> Report<'a> {
        Report::new(cart, config, self)
    }
}

/// Run both solvers and pick the cheaper. Equal totals keep the single order, and an
/// infeasible split is never chosen whatever its total.
pub fn select_strategy(cart: &NormalizedCart, config: &CartConfig) -> StrategyResult {
    let baseline = Baseline::of(cart, config);
    let single = SingleOrderSolver::solve(cart, config);
    let split = SplitOrderSolver::solve(cart, config);

    let chosen = if split.is_feasible() && split.total < single.total {
        Strategy::SplitOrder
    } else {
        Strategy::SingleOrder
    };

    let final_pay = match chosen {
        Strategy::SingleOrder => single.total,
        Strategy::SplitOrder => split.total,
    };

    let saved = baseline.total.saturating_sub(final_pay);

    debug!(
        %chosen,
        baseline = baseline.total,
        final_pay,
        saved,
        "selected strategy"
    );

    StrategyResult {
        baseline,
        final_pay,
        saved,
        savings_rate: savings_rate(saved, baseline.total),
        chosen,
        single,
        split,
        summary: summary(chosen, saved, config.currency),
    }
}

/// `saved` as a percentage of `baseline_total`, rounded half-up to 2 decimal places.
///
/// Halves round toward positive infinity, so `-0.005` becomes `0.00`. A zero baseline gives a
/// zero rate.
pub fn savings_rate(saved: i64, baseline_total: i64) -> Decimal {
    let rate = (Decimal::from(saved) * Decimal::ONE_HUNDRED)
        .checked_div(Decimal::from(baseline_total))
        .unwrap_or(Decimal::ZERO);

    let strategy = if rate.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };

    let rounded = rate.round_dp_with_strategy(2, strategy);

    // No "-0.00".
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

fn summary(chosen: Strategy, saved: i64, currency: &'static Currency) -> String {
    format!(
        "Recommended: {chosen} (saves {})",
        Money::from_minor(saved, currency)
    )
}

/// A finished calculation: the normalised cart, the config it ran with and the result.
#[derive(Debug, Clone)]
pub struct Calculation {
    /// Cart after normalisation
    pub cart: NormalizedCart,

    /// Config resolved from the input
    pub config: CartConfig,

    /// The recommendation
    pub result: StrategyResult,
}

impl Calculation {
    /// Short recommendation.
    pub fn summary(&self) -> &str {
        &self.result.summary
    }

    /// Report over this calculation.
    pub fn report(&self) -> Report<'_> {
        self.result.report(&self.cart, &self.config)
    }

    /// Full step-by-step trace of the calculation.
    pub fn detail(&self) -> String {
        self.report().detail()
    }
}

/// Normalise a raw request and find the cheapest way to buy it.
#[instrument(
    skip_all,
    fields(products = input.products.len(), coupons = input.coupons.len())
)]
pub fn calculate_best_strategy(input: &CartInput) -> Calculation {
    let cart = NormalizedCart::from_input(input);
    let config = input.cart_config();
    let result = select_strategy(&cart, &config);

    Calculation {
        cart,
        config,
        result,
    }
}
