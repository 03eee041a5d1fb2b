//! Coupons

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::discounts::{clamped_percentage, floor_to_minor, percent_of_minor};

/// Coupon discount kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CouponKind {
    /// A fixed amount off the order.
    Fixed,

    /// A percentage off the order, optionally capped.
    Percent,

    /// Any kind that isn't recognised. The coupon can be held but never discounts anything.
    Unrecognized,
}

impl From<&str> for CouponKind {
    fn from(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "fixed" => CouponKind::Fixed,
            "percent" => CouponKind::Percent,
            _ => CouponKind::Unrecognized,
        }
    }
}

impl From<String> for CouponKind {
    fn from(kind: String) -> Self {
        CouponKind::from(kind.as_str())
    }
}

impl fmt::Display for CouponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponKind::Fixed => write!(f, "fixed"),
            CouponKind::Percent => write!(f, "percent"),
            CouponKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// A single-use order coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    /// Display name, also used to recognise duplicates
    pub name: String,

    /// Discount kind
    pub kind: CouponKind,

    /// Minor units for [`CouponKind::Fixed`], percent points for [`CouponKind::Percent`]
    pub value: Decimal,

    /// Order amount required before the coupon applies
    pub min_spend: i64,

    /// Upper bound on a percent coupon's discount; `0` means uncapped
    pub max_discount: i64,

    /// Whether the coupon is held and usable
    pub active: bool,
}

impl Coupon {
    /// Create an active, uncapped coupon with no minimum spend.
    pub fn new(name: impl Into<String>, kind: CouponKind, value: Decimal) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            min_spend: 0,
            max_discount: 0,
            active: true,
        }
    }

    /// Set the minimum spend.
    #[must_use]
    pub fn with_min_spend(mut self, min_spend: i64) -> Self {
        self.min_spend = min_spend;
        self
    }

    /// Set the maximum discount cap.
    #[must_use]
    pub fn with_max_discount(mut self, max_discount: i64) -> Self {
        self.max_discount = max_discount;
        self
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the coupon can be offered to the optimiser at all.
    pub fn is_eligible(&self) -> bool {
        self.active && self.value > Decimal::ZERO
    }

    /// Whether the current amount meets the minimum spend.
    pub fn is_met_by(&self, amount: i64) -> bool {
        amount >= self.min_spend
    }

    /// Whether the coupon has a usable name.
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Two named coupons with the same name are the same coupon.
    pub fn is_same_as(&self, other: &Coupon) -> bool {
        self.is_named() && other.is_named() && self.name == other.name
    }

    /// The discount this coupon takes off `amount`, ignoring the minimum spend.
    pub fn discount_on(&self, amount: i64) -> i64 {
        let amount = amount.max(0);

        let off = match self.kind {
            CouponKind::Fixed => floor_to_minor(self.value),
            CouponKind::Percent => {
                let off = percent_of_minor(clamped_percentage(self.value), amount);

                if self.max_discount > 0 {
                    off.min(self.max_discount)
                } else {
                    off
                }
            }
            CouponKind::Unrecognized => 0,
        };

        off.min(amount)
    }

    /// Apply the coupon to `amount`. Returns `None` when the minimum spend isn't met.
    pub fn apply(&self, amount: i64) -> Option<i64> {
        self.is_met_by(amount)
            .then(|| amount.saturating_sub(self.discount_on(amount)).max(0))
    }

    /// Label for reports: the name, or `kind:value` for unnamed coupons.
    pub fn label(&self) -> String {
        if self.is_named() {
            self.name.clone()
        } else {
            format!("{}:{}", self.kind, self.value.normalize())
        }
    }
}

/// The coupon slot of one order: either empty or one coupon from the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponChoice<'a> {
    /// No coupon used.
    NoCoupon,

    /// The coupon at `index` in the coupon pool.
    Coupon {
        /// Position in the coupon pool
        index: usize,

        /// The coupon itself
        coupon: &'a Coupon,
    },
}

impl<'a> CouponChoice<'a> {
    /// Every choice for one slot, in enumeration order: no coupon, then each coupon in pool order.
    pub fn options(pool: &'a [Coupon]) -> impl Iterator<Item = CouponChoice<'a>> + Clone {
        std::iter::once(CouponChoice::NoCoupon).chain(
            pool.iter()
                .enumerate()
                .map(|(index, coupon)| CouponChoice::Coupon { index, coupon }),
        )
    }

    /// Pool index of the chosen coupon.
    pub fn index(&self) -> Option<usize> {
        match self {
            CouponChoice::NoCoupon => None,
            CouponChoice::Coupon { index, .. } => Some(*index),
        }
    }

    /// The chosen coupon.
    pub fn coupon(&self) -> Option<&'a Coupon> {
        match self {
            CouponChoice::NoCoupon => None,
            CouponChoice::Coupon { coupon, .. } => Some(coupon),
        }
    }

    /// Whether two slots would spend the same coupon twice.
    ///
    /// The pool index is the identity of a coupon; named coupons are also matched by name.
    pub fn conflicts_with(&self, other: &CouponChoice<'_>) -> bool {
        match (self, other) {
            (
                CouponChoice::Coupon {
                    index: a_index,
                    coupon: a,
                },
                CouponChoice::Coupon {
                    index: b_index,
                    coupon: b,
                },
            ) => a_index == b_index || a.is_same_as(b),
            _ => false,
        }
    }

    /// Apply the choice to `amount`. Returns `None` when nothing was applied.
    pub fn apply(&self, amount: i64) -> Option<i64> {
        self.coupon().and_then(|coupon| coupon.apply(amount))
    }
}
