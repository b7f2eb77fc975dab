//! The capability set every marketplace implements.
//!
//! Only [`PlatformAdapter::search`] talks to the network. The discount,
//! shipping and return-policy operations are local computations with shared
//! default implementations; a marketplace customizes them through
//! [`PlatformAdapter::delivery_window`] or by overriding the method.
//!
//! Adapters hold no per-query state. Each operation receives the platform's
//! current product list and returns the transformed list, so filtering done
//! by one stage is visible to the next.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use cartscout_core::{
    Params, Platform, Product, RETURN_POLICY_THREE_DAYS, RETURN_POLICY_TWO_DAYS,
};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::ScraperError;

/// Flat discount applied by [`PlatformAdapter::discount_check`].
pub const DISCOUNT_RATE: f64 = 0.10;

/// Format written into `delivery_info` once shipping has been estimated.
pub const DELIVERY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Inclusive range of delivery days drawn for each product when
    /// estimating shipping.
    fn delivery_window(&self) -> RangeInclusive<u64>;

    /// Searches the marketplace and returns normalized products in the order
    /// the marketplace listed them.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] on transport failure, non-2xx status, or a
    /// malformed response body.
    async fn search(&self, params: &Params) -> Result<Vec<Product>, ScraperError>;

    /// Annotates every priced product with a 10% discounted price. The coupon
    /// code, if any, does not affect the amount.
    ///
    /// Returns whether the discount applies on this marketplace.
    ///
    /// # Errors
    ///
    /// The default implementation never fails.
    fn discount_check(&self, products: &mut [Product]) -> Result<bool, ScraperError> {
        for product in products.iter_mut() {
            product.discount_price = product.price.map(discounted_price);
        }
        Ok(true)
    }

    /// Draws an estimated delivery date for each product and keeps those that
    /// arrive on or before `deadline`, stamping their `delivery_info` with the
    /// estimate.
    ///
    /// # Errors
    ///
    /// The default implementation never fails.
    fn shipping_estimate(
        &self,
        products: &[Product],
        deadline: NaiveDate,
        now: DateTime<FixedOffset>,
        rng: &mut StdRng,
    ) -> Result<Vec<Product>, ScraperError> {
        let window = self.delivery_window();
        let kept = products
            .iter()
            .filter_map(|product| {
                let offset = rng.random_range(window.clone());
                let estimate = now.checked_add_days(Days::new(offset))?;
                if (deadline - estimate.date_naive()).num_days() < 0 {
                    return None;
                }
                let mut product = product.clone();
                product.delivery_info =
                    Some(estimate.format(DELIVERY_TIMESTAMP_FORMAT).to_string());
                Some(product)
            })
            .collect();
        Ok(kept)
    }

    /// Assigns a random return policy to each product, dropping roughly a
    /// third of them as having none.
    ///
    /// # Errors
    ///
    /// The default implementation never fails.
    fn return_policy(
        &self,
        products: &[Product],
        rng: &mut StdRng,
    ) -> Result<Vec<Product>, ScraperError> {
        let kept = products
            .iter()
            .filter_map(|product| {
                let label = match rng.random_range(1..=3u8) {
                    1 => RETURN_POLICY_TWO_DAYS,
                    2 => RETURN_POLICY_THREE_DAYS,
                    _ => return None,
                };
                let mut product = product.clone();
                product.return_policy = Some(label.to_owned());
                Some(product)
            })
            .collect();
        Ok(kept)
    }
}

/// `price` less [`DISCOUNT_RATE`], rounded to cents.
#[must_use]
pub fn discounted_price(price: f64) -> f64 {
    (price * (1.0 - DISCOUNT_RATE) * 100.0).round() / 100.0
}
