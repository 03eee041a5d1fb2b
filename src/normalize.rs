//! Input normalisation
//!
//! Reduces raw input to the lines and coupons the optimiser is allowed to consider: eligible
//! entries only, in input order, capped at [`MAX_PRODUCT_LINES`] and [`MAX_COUPONS`].

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    coupons::Coupon,
    input::{CartInput, CouponInput},
    products::ProductLine,
};

/// Most product lines that take part in one calculation.
pub const MAX_PRODUCT_LINES: usize = 5;

/// Most coupons that take part in one calculation.
pub const MAX_COUPONS: usize = 3;

/// Product lines after normalisation.
pub type ProductLines = SmallVec<[ProductLine; MAX_PRODUCT_LINES]>;

/// Coupons after normalisation.
pub type CouponPool = SmallVec<[Coupon; MAX_COUPONS]>;

/// The cart the optimisers work on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCart {
    products: ProductLines,
    coupons: CouponPool,
}

impl NormalizedCart {
    /// Normalise already-typed lines and coupons.
    pub fn new(
        products: impl IntoIterator<Item = ProductLine>,
        coupons: impl IntoIterator<Item = Coupon>,
    ) -> Self {
        Self {
            products: normalize_products(products.into_iter().map(Some)),
            coupons: normalize_coupons(coupons.into_iter().map(Some)),
        }
    }

    /// Normalise a raw calculation request.
    pub fn from_input(input: &CartInput) -> Self {
        let products = input
            .products
            .iter()
            .map(|product| product.as_ref().map(ProductLine::from));

        let coupons = input
            .coupons
            .iter()
            .map(|coupon| coupon.as_ref().and_then(CouponInput::to_coupon));

        let cart = Self {
            products: normalize_products(products),
            coupons: normalize_coupons(coupons),
        };

        debug!(
            products_in = input.products.len(),
            products_kept = cart.products.len(),
            coupons_in = input.coupons.len(),
            coupons_kept = cart.coupons.len(),
            "normalized cart input"
        );

        cart
    }

    /// Eligible product lines, in input order.
    pub fn products(&self) -> &[ProductLine] {
        &self.products
    }

    /// Eligible coupons, in input order.
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Whether no product line survived normalisation.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Keep the first [`MAX_PRODUCT_LINES`] eligible lines.
pub fn normalize_products(
    products: impl IntoIterator<Item = Option<ProductLine>>,
) -> ProductLines {
    products
        .into_iter()
        .flatten()
        .filter(ProductLine::is_eligible)
        .take(MAX_PRODUCT_LINES)
        .collect()
}

/// Keep the first [`MAX_COUPONS`] eligible coupons.
pub fn normalize_coupons(coupons: impl IntoIterator<Item = Option<Coupon>>) -> CouponPool {
    coupons
        .into_iter()
        .flatten()
        .filter(Coupon::is_eligible)
        .take(MAX_COUPONS)
        .collect()
}
