//! Report
//!
//! Human-readable trace of a calculation: the input as the optimiser saw it, the baseline, the
//! best single order, the best split and the decision.

use std::{
    fmt,
    io,
};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    config::{CartConfig, ThresholdPromotion},
    coupons::{Coupon, CouponKind},
    discounts::floor_to_minor,
    normalize::NormalizedCart,
    pricing::{PricingOutcome, PricingStage, PricingStep},
    products::{DiscountKind, ProductLine, base_total},
    solvers::{OrderPlan, Strategy},
    strategy::StrategyResult,
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Report over one finished calculation.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    cart: &'a NormalizedCart,
    config: &'a CartConfig,
    result: &'a StrategyResult,
}

impl<'a> Report<'a> {
    /// Create a report over a cart, the config it was priced with and its result.
    pub fn new(cart: &'a NormalizedCart, config: &'a CartConfig, result: &'a StrategyResult) -> Self {
        Self {
            cart,
            config,
            result,
        }
    }

    /// One-line recommendation.
    pub fn summary(&self) -> &'a str {
        &self.result.summary
    }

    /// The full report as text.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    /// Writes the full report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        write!(out, "{self}").map_err(|_err| ReportError::IO)
    }

    fn money(&self, amount: i64) -> Money<'static, Currency> {
        Money::from_minor(amount, self.config.currency)
    }

    fn write_input(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "=== Input ===")?;
        writeln!(out, "Products (up to 5):")?;

        if self.cart.products().is_empty() {
            writeln!(out, "  none")?;
        } else {
            writeln!(out, "{}", self.products_table())?;
        }

        writeln!(out, "\nCoupons (up to 3):")?;

        if self.cart.coupons().is_empty() {
            writeln!(out, "  none")?;
        } else {
            writeln!(out, "{}", self.coupons_table())?;
        }

        writeln!(
            out,
            "\nPromotion: {} / order: {}",
            self.promotion_label(&self.config.promotion),
            self.config.stacking
        )?;

        let shipping = &self.config.shipping;

        if shipping.free_threshold > 0 {
            writeln!(
                out,
                "Shipping: {} per order / free from {}",
                self.money(shipping.fee.max(0)),
                self.money(shipping.free_threshold)
            )?;
        } else {
            writeln!(
                out,
                "Shipping: {} per order / no free shipping",
                self.money(shipping.fee.max(0))
            )?;
        }

        Ok(())
    }

    fn products_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["", "Product", "Price", "Qty", "Discount"]);

        for (idx, line) in self.cart.products().iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                product_name(line).to_string(),
                self.money(line.price).to_string(),
                line.quantity.to_string(),
                self.line_discount_label(line),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..4), Alignment::right());

        table.to_string()
    }

    fn coupons_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["", "Coupon", "Discount", "Min spend", "Cap"]);

        for (idx, coupon) in self.cart.coupons().iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                coupon.label(),
                self.coupon_value_label(coupon),
                self.money(coupon.min_spend.max(0)).to_string(),
                self.cap_label(coupon),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());

        table.to_string()
    }

    fn line_discount_label(&self, line: &ProductLine) -> String {
        match line.discount_kind {
            DiscountKind::Fixed => {
                format!("{} off each", self.money(floor_to_minor(line.discount_value)))
            }
            DiscountKind::Percent => format!("{}%", line.discount_value.normalize()),
            DiscountKind::None | DiscountKind::Unrecognized => "-".to_string(),
        }
    }

    fn coupon_value_label(&self, coupon: &Coupon) -> String {
        match coupon.kind {
            CouponKind::Fixed => format!("{} off", self.money(floor_to_minor(coupon.value))),
            CouponKind::Percent => format!("{}%", coupon.value.normalize()),
            CouponKind::Unrecognized => "unusable".to_string(),
        }
    }

    fn cap_label(&self, coupon: &Coupon) -> String {
        if coupon.kind == CouponKind::Percent && coupon.max_discount > 0 {
            self.money(coupon.max_discount).to_string()
        } else {
            "-".to_string()
        }
    }

    fn promotion_label(&self, promotion: &ThresholdPromotion) -> String {
        if promotion.is_enabled() {
            format!(
                "spend {} get {} off",
                self.money(promotion.threshold),
                self.money(promotion.off)
            )
        } else {
            "none".to_string()
        }
    }

    fn write_baseline(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let baseline = &self.result.baseline;

        writeln!(out, "\n=== Baseline (line discounts only) ===")?;
        writeln!(
            out,
            "Before line discounts: {}",
            self.money(base_total(self.cart.products()))
        )?;
        writeln!(out, "Merchandise: {}", self.money(baseline.merchandise))?;
        writeln!(out, "Shipping: {}", self.money(baseline.shipping))?;
        writeln!(out, "Total: {}", self.money(baseline.total))
    }

    fn write_single(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "\n=== Best single order ===")?;

        for order in &self.result.single.orders {
            self.write_order(out, order)?;
        }

        Ok(())
    }

    fn write_split(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "\n=== Best split into two orders ===")?;

        if !self.result.split.is_feasible() {
            writeln!(out, "no split candidate (one product line or none)")?;

            return Ok(());
        }

        for (name, order) in ["A", "B"].into_iter().zip(&self.result.split.orders) {
            let lines: Vec<&str> = order
                .lines
                .iter()
                .filter_map(|&idx| self.cart.products().get(idx))
                .map(product_name)
                .collect();

            writeln!(out, "Order {name}: {}", lines.join(", "))?;

            self.write_order(out, order)?;
        }

        writeln!(out, "Split total: {}", self.money(self.result.split.total))
    }

    fn write_order(&self, out: &mut fmt::Formatter<'_>, order: &OrderPlan) -> fmt::Result {
        let coupon = order
            .coupon
            .and_then(|idx| self.cart.coupons().get(idx))
            .map_or_else(|| "no coupon".to_string(), Coupon::label);

        writeln!(out, "Coupon: {coupon}")?;
        writeln!(out, "{}", self.steps_table(&order.outcome, &coupon))
    }

    fn steps_table(&self, outcome: &PricingOutcome, coupon: &str) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Step", "Before", "After", "Saved", "Applied"]);

        for step in &outcome.trace.steps {
            builder.push_record([
                stage_label(step, coupon),
                self.money(step.before).to_string(),
                self.money(step.after).to_string(),
                self.money(step.discount()).to_string(),
                if step.applied { "yes" } else { "no" }.to_string(),
            ]);
        }

        builder.push_record([
            "Shipping".to_string(),
            String::new(),
            self.money(outcome.trace.shipping).to_string(),
            String::new(),
            String::new(),
        ]);

        builder.push_record([
            "Total".to_string(),
            String::new(),
            self.money(outcome.total).to_string(),
            String::new(),
            String::new(),
        ]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..4), Alignment::right());

        table.to_string()
    }

    fn write_decision(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        writeln!(out, "\n=== Decision ===")?;

        let decision = match result.chosen {
            Strategy::SingleOrder => "Buying in one order is cheapest",
            Strategy::SplitOrder => "Splitting into two orders is cheapest",
        };

        writeln!(
            out,
            "{decision} ({} order(s))",
            result.chosen_candidate().orders.len()
        )?;
        writeln!(out, "Final payment: {}", self.money(result.final_pay))?;
        writeln!(
            out,
            "Saved: {} ({}%)",
            self.money(result.saved),
            percent_points(result.savings_rate)
        )?;
        write!(out, "{}", result.summary)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_input(f)?;
        self.write_baseline(f)?;
        self.write_single(f)?;
        self.write_split(f)?;
        self.write_decision(f)
    }
}

fn product_name(line: &ProductLine) -> &str {
    let name = line.name.trim();

    if name.is_empty() { "Product" } else { name }
}

fn stage_label(step: &PricingStep, coupon: &str) -> String {
    match step.stage {
        PricingStage::LineDiscounts => "Line discounts".to_string(),
        PricingStage::ThresholdPromotion => "Threshold promotion".to_string(),
        PricingStage::Coupon => format!("Coupon ({coupon})"),
    }
}

fn percent_points(rate: Decimal) -> String {
    format!("{rate:.2}")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        config::{ShippingPolicy, StackingOrder},
        strategy::select_strategy,
    };

    fn fixed(name: &str, value: i64) -> Coupon {
        Coupon::new(name, CouponKind::Fixed, Decimal::from(value))
    }

    fn split_cart() -> (NormalizedCart, CartConfig) {
        let cart = NormalizedCart::new(
            [
                ProductLine::new("Coat", 25_000, 1),
                ProductLine::new("Boots", 25_000, 1),
            ],
            [
                fixed("A", 5_000).with_min_spend(20_000),
                fixed("", 5_000).with_min_spend(20_000),
            ],
        );

        let config = CartConfig::new(
            ThresholdPromotion::default(),
            ShippingPolicy::new(3_000, 20_000),
        );

        (cart, config)
    }

    #[test]
    fn detail_has_every_section_in_order() {
        let (cart, config) = split_cart();
        let result = select_strategy(&cart, &config);
        let detail = Report::new(&cart, &config, &result).detail();

        let headings = [
            "=== Input ===",
            "=== Baseline (line discounts only) ===",
            "=== Best single order ===",
            "=== Best split into two orders ===",
            "=== Decision ===",
        ];

        let positions: Vec<_> = headings.iter().filter_map(|h| detail.find(h)).collect();

        assert_eq!(positions.len(), headings.len(), "missing heading in:\n{detail}");
        assert!(positions.is_sorted(), "headings out of order in:\n{detail}");
    }

    #[test]
    fn split_plan_names_lines_and_coupons() {
        let (cart, config) = split_cart();
        let result = select_strategy(&cart, &config);
        let detail = Report::new(&cart, &config, &result).detail();

        assert!(detail.contains("Order A: Coat"), "{detail}");
        assert!(detail.contains("Order B: Boots"), "{detail}");
        assert!(detail.contains("Coupon (A)"), "{detail}");

        // The unnamed coupon falls back to its kind and value.
        assert!(detail.contains("Coupon (fixed:5000)"), "{detail}");
        assert!(detail.contains("Splitting into two orders is cheapest"), "{detail}");
        assert!(detail.contains("(20.00%)"), "{detail}");
    }

    #[test]
    fn single_line_reports_no_split_candidate() {
        let cart = NormalizedCart::new([ProductLine::new("", 10_000, 1)], []);
        let config = CartConfig::new(
            ThresholdPromotion::default(),
            ShippingPolicy::new(3_000, 30_000),
        );
        let result = select_strategy(&cart, &config);
        let detail = Report::new(&cart, &config, &result).detail();

        assert!(detail.contains("no split candidate (one product line or none)"));
        assert!(detail.contains("Coupon (no coupon)"), "{detail}");
        assert!(detail.contains("Buying in one order is cheapest"));
        assert!(detail.contains("13,000"), "{detail}");
    }

    #[test]
    fn blank_product_names_fall_back() {
        assert_eq!(product_name(&ProductLine::new("  ", 1_000, 1)), "Product");
        assert_eq!(product_name(&ProductLine::new(" Coat ", 1_000, 1)), "Coat");
    }

    #[test]
    fn input_echo_shows_promotion_and_stacking() {
        let cart = NormalizedCart::new([ProductLine::new("Coat", 50_000, 1)], []);
        let config = CartConfig::new(
            ThresholdPromotion::new(50_000, 5_000),
            ShippingPolicy::new(3_000, 0),
        )
        .with_stacking(StackingOrder::CouponFirst);
        let result = select_strategy(&cart, &config);
        let detail = Report::new(&cart, &config, &result).detail();

        assert!(detail.contains("get"), "{detail}");
        assert!(detail.contains("coupon → promotion"), "{detail}");
        assert!(detail.contains("no free shipping"), "{detail}");
        assert!(detail.contains("Coupons (up to 3):\n  none"), "{detail}");
    }

    #[test]
    fn write_to_writes_the_detail() -> TestResult {
        let (cart, config) = split_cart();
        let result = select_strategy(&cart, &config);
        let report = Report::new(&cart, &config, &result);

        let mut buf = Vec::new();

        report.write_to(&mut buf)?;

        assert_eq!(String::from_utf8(buf)?, report.detail());
        assert!(report.detail().ends_with(report.summary()));

        Ok(())
    }

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_to_reports_io_errors() {
        let (cart, config) = split_cart();
        let result = select_strategy(&cart, &config);

        let written = Report::new(&cart, &config, &result).write_to(FailingWriter);

        assert!(matches!(written, Err(ReportError::IO)));
    }

    #[test]
    fn decision_counts_the_chosen_orders() {
        let (cart, config) = split_cart();
        let result = select_strategy(&cart, &config);
        let detail = Report::new(&cart, &config, &result).detail();

        assert!(
            detail.contains("Splitting into two orders is cheapest (2 order(s))"),
            "{detail}"
        );
        assert!(detail.contains(" Saved "), "{detail}");
    }
}
