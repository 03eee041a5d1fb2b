//! Cartsplit
//!
//! Cartsplit works out the cheapest way to check out a small cart: as one order, or split into
//! two orders so that each can use its own coupon. Every order is priced through the same
//! pipeline of line discounts, a threshold promotion, at most one coupon and shipping.

pub mod config;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod input;
pub mod normalize;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod report;
pub mod solvers;
pub mod strategy;
