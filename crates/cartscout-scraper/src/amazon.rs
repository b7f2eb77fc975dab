use std::ops::RangeInclusive;

use async_trait::async_trait;
use cartscout_core::{Params, Platform, Product};
use reqwest::Url;

use crate::adapter::PlatformAdapter;
use crate::client::{search_endpoint, MarketplaceClient};
use crate::error::ScraperError;
use crate::normalize::{fallback_size, normalize_amazon};
use crate::pagination::{collect_pages, Page};
use crate::types::{AmazonProduct, AmazonSearchResponse};

/// Parameters that steer the pipeline rather than the Amazon search itself.
const EXCLUDED_PARAMS: [&str; 5] = [
    Params::PLATFORM,
    Params::MAX_PRICE,
    Params::DEADLINE,
    Params::COUPON_CODE,
    "deals_and_discounts",
];

/// Adapter for the `real-time-amazon-data` search API.
pub struct AmazonAdapter {
    client: MarketplaceClient,
    endpoint: Url,
}

impl AmazonAdapter {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: MarketplaceClient, base_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            client,
            endpoint: search_endpoint(base_url)?,
        })
    }

    /// Search URL for one page. Every non-blank, non-zero parameter not in
    /// [`EXCLUDED_PARAMS`] is forwarded as a query pair.
    fn page_url(&self, params: &Params, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                if EXCLUDED_PARAMS.contains(&key) || value.is_blank() {
                    continue;
                }
                pairs.append_pair(key, &value.to_string());
            }
            pairs.append_pair("page", &page.to_string());
        }
        url
    }
}

#[async_trait]
impl PlatformAdapter for AmazonAdapter {
    fn platform(&self) -> Platform {
        Platform::Amazon
    }

    fn delivery_window(&self) -> RangeInclusive<u64> {
        1..=11
    }

    async fn search(&self, params: &Params) -> Result<Vec<Product>, ScraperError> {
        let raw: Vec<AmazonProduct> = collect_pages(Platform::Amazon.as_str(), |page| {
            let url = self.page_url(params, page);
            async move {
                let response: AmazonSearchResponse = self.client.get_json(&url).await?;
                Ok(match response.data.and_then(|d| d.products) {
                    Some(products) => Page::Items(products),
                    None => Page::Missing,
                })
            }
        })
        .await?;

        let size = fallback_size(params);
        let fetched = raw.len();
        let products: Vec<Product> = raw
            .into_iter()
            .filter_map(|p| normalize_amazon(p, &size))
            .collect();

        let dropped = fetched - products.len();
        if dropped > 0 {
            tracing::debug!(platform = "amazon", dropped, "dropped incomplete listings");
        }
        tracing::info!(platform = "amazon", count = products.len(), "search complete");
        Ok(products)
    }
}
