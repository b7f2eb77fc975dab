//! Stage pipeline orchestrator.
//!
//! Runs the enabled stages of an [`Intent`] in the fixed order given by
//! [`StageName::ALL`]. Stages that call an adapter fan out one task per active
//! platform and wait for every task before the next stage starts. Tasks only
//! see a copy of their own platform's products; results are written back to
//! the [`AggregateResult`] after the barrier.
//!
//! A failing or timed-out platform task is logged and recorded on that
//! platform's entry. It never aborts sibling platforms or the run.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cartscout_core::{
    reference_now, resolve_deadline, AggregateResult, AppConfig, Intent, Params, Platform,
    PlatformResult, Product, StageName,
};
use cartscout_scraper::{PlatformAdapter, ScraperError};
use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PipelineError;

/// Per-run inputs that are not part of the intent.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Current time in the reference zone. Drives deadline resolution and
    /// delivery estimates.
    pub now: DateTime<FixedOffset>,
    /// Seed for the shipping and return-policy draws. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            now: reference_now(),
            seed: None,
        }
    }
}

impl RunOptions {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Outcome of one platform task. Errors are already rendered for the result
/// entry.
type TaskOutcome<T> = (Platform, Result<T, String>);

pub struct Pipeline {
    adapters: BTreeMap<Platform, Arc<dyn PlatformAdapter>>,
    platform_timeout: Duration,
}

impl Pipeline {
    /// Registers `adapters` by the platform each one reports. A later adapter
    /// for the same platform replaces an earlier one.
    pub fn new(
        adapters: impl IntoIterator<Item = Arc<dyn PlatformAdapter>>,
        platform_timeout: Duration,
    ) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.platform(), adapter))
            .collect();
        Self {
            adapters,
            platform_timeout,
        }
    }

    /// Builds the live Amazon and Walmart adapters from config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the HTTP client or a base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let adapters = cartscout_scraper::build_adapters(config)?;
        Ok(Self::new(
            adapters,
            Duration::from_secs(config.platform_timeout_secs),
        ))
    }

    /// Platforms selected by the `platform` parameter, defaulting to every
    /// platform when the key is absent. A present value, blank included, must
    /// be `"all"` or name a platform.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Core`] wrapping `UnknownPlatform` for an unrecognized
    ///   selector.
    /// - [`PipelineError::AdapterUnavailable`] when a selected platform has no
    ///   registered adapter.
    pub fn active_platforms(&self, params: &Params) -> Result<Vec<Platform>, PipelineError> {
        let selected = match params.get(Params::PLATFORM) {
            None => Platform::ALL.to_vec(),
            Some(selector) => Platform::select(&selector.to_string())?,
        };
        if let Some(missing) = selected.iter().find(|p| !self.adapters.contains_key(p)) {
            return Err(PipelineError::AdapterUnavailable(*missing));
        }
        Ok(selected)
    }

    /// Executes every enabled stage of `intent` and returns one entry per
    /// active platform.
    ///
    /// # Errors
    ///
    /// Only platform selection can fail the run; see [`Self::active_platforms`].
    pub async fn run(
        &self,
        intent: &Intent,
        options: RunOptions,
    ) -> Result<AggregateResult, PipelineError> {
        let params = intent.params();
        let platforms = self.active_platforms(params)?;
        let mut results = AggregateResult::for_platforms(&platforms);
        let mut master = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            platforms = ?platforms,
            stages = ?intent.enabled_stages().collect::<Vec<_>>(),
            "starting pipeline run"
        );

        for stage in intent.enabled_stages() {
            match stage {
                StageName::Search => self.search(params, &mut results).await,
                StageName::DiscountCheck => self.discount_check(params, &mut results).await,
                StageName::PriceFilter => price_filter(params, &mut results),
                StageName::ShippingEstimate => {
                    self.shipping_estimate(params, options.now, &mut master, &mut results)
                        .await;
                }
                StageName::ReturnPolicy => self.return_policy(&mut master, &mut results).await,
                StageName::PriceComparison => self.price_comparison(params, &mut results).await,
            }
            tracing::info!(
                stage = %stage,
                products = results.product_count(),
                "stage complete"
            );
        }

        Ok(results)
    }

    async fn search(&self, params: &Params, results: &mut AggregateResult) {
        let stage = StageName::Search;
        if params.query().is_none() {
            tracing::warn!(stage = %stage, "no query supplied, skipping search");
            return;
        }

        let inputs: Vec<(Platform, ())> = results.platforms().map(|p| (p, ())).collect();
        let outcomes = self
            .fan_out(stage, inputs, |adapter, ()| async move {
                adapter.search(params).await
            })
            .await;

        apply(results, stage, outcomes, |_, entry, products| {
            entry.products = products;
        });
    }

    async fn discount_check(&self, params: &Params, results: &mut AggregateResult) {
        let stage = StageName::DiscountCheck;
        let Some(coupon) = params.coupon_code() else {
            tracing::info!(stage = %stage, "no coupon code supplied, skipping discount check");
            return;
        };
        tracing::debug!(stage = %stage, coupon = %coupon, "checking discount");

        let outcomes = self
            .fan_out(
                stage,
                product_inputs(results),
                |adapter, mut products: Vec<Product>| async move {
                    adapter
                        .discount_check(&mut products)
                        .map(|valid| (valid, products))
                },
            )
            .await;

        apply(results, stage, outcomes, |_, entry, (valid, products)| {
            entry.products = products;
            entry.discount_valid = Some(valid);
        });
    }

    async fn shipping_estimate(
        &self,
        params: &Params,
        now: DateTime<FixedOffset>,
        master: &mut StdRng,
        results: &mut AggregateResult,
    ) {
        let stage = StageName::ShippingEstimate;
        let Some(day) = params.deadline() else {
            tracing::error!(stage = %stage, "no deadline supplied, skipping shipping estimate");
            skip_stage(results, stage, "no deadline supplied");
            return;
        };
        let deadline = match resolve_deadline(&day, &now) {
            Ok(date) => date,
            Err(e) => {
                tracing::error!(stage = %stage, error = %e, "skipping shipping estimate");
                skip_stage(results, stage, &e.to_string());
                return;
            }
        };
        tracing::debug!(stage = %stage, %deadline, "resolved delivery deadline");

        let outcomes = self
            .fan_out(
                stage,
                seeded_inputs(results, master),
                |adapter, (products, mut rng): (Vec<Product>, StdRng)| async move {
                    adapter.shipping_estimate(&products, deadline, now, &mut rng)
                },
            )
            .await;

        apply(results, stage, outcomes, |_, entry, products| {
            entry.products = products;
        });
    }

    async fn return_policy(&self, master: &mut StdRng, results: &mut AggregateResult) {
        let stage = StageName::ReturnPolicy;
        let outcomes = self
            .fan_out(
                stage,
                seeded_inputs(results, master),
                |adapter, (products, mut rng): (Vec<Product>, StdRng)| async move {
                    adapter.return_policy(&products, &mut rng)
                },
            )
            .await;

        apply(results, stage, outcomes, |_, entry, products| {
            entry.products = products;
            entry.return_policy_checked = Some(true);
        });
    }

    /// Re-runs the search and replaces each platform's products with the
    /// price-sorted listing, recording its price range.
    async fn price_comparison(&self, params: &Params, results: &mut AggregateResult) {
        let stage = StageName::PriceComparison;
        if params.query().is_none() {
            tracing::warn!(stage = %stage, "no query supplied, skipping price comparison");
            return;
        }

        let inputs: Vec<(Platform, ())> = results.platforms().map(|p| (p, ())).collect();
        let outcomes = self
            .fan_out(stage, inputs, |adapter, ()| async move {
                adapter.search(params).await
            })
            .await;

        apply(results, stage, outcomes, |platform, entry, mut products| {
            products.sort_by(|a, b| compare_prices(a.price, b.price));
            if let Some((min, max)) = price_range(&products) {
                entry.min_price = Some(min);
                entry.max_price = Some(max);
            } else {
                tracing::info!(platform = %platform, "no priced products, no comparison available");
            }
            entry.products = products;
        });
    }

    /// Runs `op` once per input against that platform's adapter, at most one
    /// task per platform in flight, each bounded by the platform timeout.
    /// Returns when every task has finished.
    async fn fan_out<I, T, F, Fut>(
        &self,
        stage: StageName,
        inputs: Vec<(Platform, I)>,
        op: F,
    ) -> Vec<TaskOutcome<T>>
    where
        F: Fn(Arc<dyn PlatformAdapter>, I) -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let limit = inputs.len().max(1);
        let timeout = self.platform_timeout;

        stream::iter(inputs)
            .map(|(platform, input)| {
                let task = self
                    .adapters
                    .get(&platform)
                    .map(|adapter| op(Arc::clone(adapter), input));
                async move {
                    let outcome = match task {
                        None => Err(format!("no adapter registered for {platform}")),
                        Some(task) => match tokio::time::timeout(timeout, task).await {
                            Ok(Ok(value)) => Ok(value),
                            Ok(Err(e)) => Err(e.to_string()),
                            Err(_) => Err(format!(
                                "{stage} timed out after {}ms",
                                timeout.as_millis()
                            )),
                        },
                    };
                    (platform, outcome)
                }
            })
            .buffer_unordered(limit)
            .collect()
            .await
    }
}

/// Writes each successful outcome through `on_success` and marks failed
/// platforms, leaving their products untouched.
fn apply<T>(
    results: &mut AggregateResult,
    stage: StageName,
    outcomes: Vec<TaskOutcome<T>>,
    mut on_success: impl FnMut(Platform, &mut PlatformResult, T),
) {
    for (platform, outcome) in outcomes {
        let Some(entry) = results.get_mut(platform) else {
            continue;
        };
        match outcome {
            Ok(value) => on_success(platform, entry, value),
            Err(error) => {
                tracing::warn!(
                    platform = %platform,
                    stage = %stage,
                    error = %error,
                    "platform task failed, keeping previous products"
                );
                entry.mark_failed(format!("{stage}: {error}"));
            }
        }
    }
}

/// Records a stage that could not run on every entry, leaving products as
/// they were.
fn skip_stage(results: &mut AggregateResult, stage: StageName, reason: &str) {
    for (_, entry) in results.iter_mut() {
        entry.mark_failed(format!("{stage}: {reason}"));
    }
}

fn product_inputs(results: &AggregateResult) -> Vec<(Platform, Vec<Product>)> {
    results
        .iter()
        .map(|(platform, entry)| (platform, entry.products.clone()))
        .collect()
}

/// Pairs each platform's products with its own generator, drawn from `master`
/// in platform order so a seeded run is reproducible.
fn seeded_inputs(
    results: &AggregateResult,
    master: &mut StdRng,
) -> Vec<(Platform, (Vec<Product>, StdRng))> {
    results
        .iter()
        .map(|(platform, entry)| {
            let rng = StdRng::seed_from_u64(master.random());
            (platform, (entry.products.clone(), rng))
        })
        .collect()
}

fn price_filter(params: &Params, results: &mut AggregateResult) {
    let stage = StageName::PriceFilter;
    let Some(max_price) = params.max_price() else {
        if params.get(Params::MAX_PRICE).is_some() {
            tracing::warn!(stage = %stage, "max_price is not numeric, leaving products unfiltered");
        }
        return;
    };

    for (platform, entry) in results.iter_mut() {
        if entry.products.is_empty() {
            tracing::debug!(platform = %platform, stage = %stage, "no products to filter");
            continue;
        }
        let before = entry.products.len();
        entry
            .products
            .retain(|p| p.price.is_some_and(|price| price <= max_price));
        tracing::debug!(
            platform = %platform,
            max_price,
            kept = entry.products.len(),
            dropped = before - entry.products.len(),
            "applied price filter"
        );
    }
}

/// Ascending by price; products without a price sort last.
fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Lowest and highest price of an already sorted listing.
fn price_range(sorted: &[Product]) -> Option<(f64, f64)> {
    let mut prices = sorted.iter().filter_map(|p| p.price);
    let min = prices.next()?;
    let max = prices.last().unwrap_or(min);
    Some((min, max))
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
