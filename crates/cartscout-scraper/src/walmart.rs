use std::ops::RangeInclusive;

use async_trait::async_trait;
use cartscout_core::{Params, Platform, Product};
use reqwest::Url;

use crate::adapter::PlatformAdapter;
use crate::client::{search_endpoint, MarketplaceClient};
use crate::error::ScraperError;
use crate::normalize::{fallback_size, normalize_walmart};
use crate::pagination::{collect_pages, Page};
use crate::types::{WalmartProduct, WalmartSearchResponse};

/// Adapter for the `walmart-data` search API.
///
/// Walmart only understands a free-text `q` and a page number; every other
/// parameter is applied by later pipeline stages.
pub struct WalmartAdapter {
    client: MarketplaceClient,
    endpoint: Url,
}

impl WalmartAdapter {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: MarketplaceClient, base_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            client,
            endpoint: search_endpoint(base_url)?,
        })
    }

    fn page_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl PlatformAdapter for WalmartAdapter {
    fn platform(&self) -> Platform {
        Platform::Walmart
    }

    fn delivery_window(&self) -> RangeInclusive<u64> {
        1..=12
    }

    async fn search(&self, params: &Params) -> Result<Vec<Product>, ScraperError> {
        let query = params.query().ok_or(ScraperError::MissingParameter {
            platform: "walmart",
            param: Params::QUERY,
        })?;

        let raw: Vec<WalmartProduct> = collect_pages(Platform::Walmart.as_str(), |page| {
            let url = self.page_url(&query, page);
            async move {
                let response: WalmartSearchResponse = self.client.get_json(&url).await?;
                Ok(match response.search_result.and_then(|groups| groups.into_iter().next()) {
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
            .filter_map(|p| normalize_walmart(p, &size))
            .collect();

        let dropped = fetched - products.len();
        if dropped > 0 {
            tracing::debug!(platform = "walmart", dropped, "dropped incomplete listings");
        }
        tracing::info!(platform = "walmart", count = products.len(), "search complete");
        Ok(products)
    }
}
