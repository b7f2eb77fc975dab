use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

/// HTTP client shared by the marketplace adapters.
///
/// Every request carries the `RapidAPI` key and host headers. Non-2xx
/// statuses become typed errors; 429 and network failures are retried with
/// exponential backoff. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct MarketplaceClient {
    client: Client,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl MarketplaceClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// GETs `url` and deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx (not retried).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: body does not match `T` (not retried).
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ScraperError> {
        let host = url.host_str().unwrap_or_default().to_owned();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let host = host.clone();
            async move {
                tracing::debug!(%url, "requesting marketplace page");
                let response = self
                    .client
                    .get(url.clone())
                    .header(API_KEY_HEADER, &self.api_key)
                    .header(API_HOST_HEADER, &host)
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        host,
                        retry_after_secs,
                    });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
                    context: format!("search page from {host}"),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Parses a marketplace base URL and appends the `search` path segment.
///
/// Trailing slashes on `base_url` are ignored so `https://host` and
/// `https://host/` produce the same endpoint.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidBaseUrl`] when `base_url` is not an
/// absolute URL.
pub fn search_endpoint(base_url: &str) -> Result<Url, ScraperError> {
    let joined = format!("{}/search", base_url.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}
