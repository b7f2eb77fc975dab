//! Marketplace adapters for cartscout.
//!
//! Each marketplace implements [`PlatformAdapter`]: a paginated search that
//! normalizes raw listings into [`cartscout_core::Product`], plus the
//! discount, shipping-estimate and return-policy operations shared by every
//! marketplace.

pub mod adapter;
pub mod amazon;
pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod types;
pub mod walmart;

mod rate_limit;

use std::sync::Arc;

use cartscout_core::AppConfig;

pub use adapter::PlatformAdapter;
pub use amazon::AmazonAdapter;
pub use client::MarketplaceClient;
pub use error::ScraperError;
pub use walmart::WalmartAdapter;

/// Builds one adapter per known marketplace from application config.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] if the HTTP client cannot be constructed, or
/// [`ScraperError::InvalidBaseUrl`] if a configured base URL does not parse.
pub fn build_adapters(config: &AppConfig) -> Result<Vec<Arc<dyn PlatformAdapter>>, ScraperError> {
    let client = MarketplaceClient::new(
        &config.rapid_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;

    Ok(vec![
        Arc::new(AmazonAdapter::new(client.clone(), &config.amazon_base_url)?),
        Arc::new(WalmartAdapter::new(client, &config.walmart_base_url)?),
    ])
}
