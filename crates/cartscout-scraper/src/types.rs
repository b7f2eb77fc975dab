//! Raw search response shapes for the two marketplace APIs.
//!
//! Every field is optional: both APIs omit fields freely and interleave
//! sponsored or placeholder records. Required-field checks happen during
//! normalization, not deserialization, so one odd record never fails a page.
//!
//! ### Amazon (`real-time-amazon-data`)
//! `{"status": "OK", "data": {"total_products": 1234, "products": [...]}}`.
//! `product_price` is a display string such as `"$59.99"` and
//! `product_star_rating` is a string such as `"4.5"`.
//!
//! ### Walmart (`walmart-data`)
//! `{"searchResult": [[...], ...]}`. Only the first inner list holds
//! products. `price` is usually a JSON number but has been seen as a string.

use serde::Deserialize;
use serde_json::Value;

/// Top-level response from the Amazon `/search` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AmazonSearchResponse {
    #[serde(default)]
    pub data: Option<AmazonSearchData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AmazonSearchData {
    #[serde(default)]
    pub products: Option<Vec<AmazonProduct>>,
}

/// A single listing from the Amazon search response.
#[derive(Debug, Default, Deserialize)]
pub struct AmazonProduct {
    /// Amazon Standard Identification Number, e.g. `"B0CJ4V2PZD"`.
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub product_title: Option<String>,
    /// Display price such as `"$1,299.99"`.
    #[serde(default)]
    pub product_price: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub product_photo: Option<String>,
    #[serde(default)]
    pub product_star_rating: Option<Value>,
    /// Delivery promise such as `"FREE delivery Tue, Oct 20"`.
    #[serde(default)]
    pub delivery: Option<String>,
    #[serde(default)]
    pub size: Option<Value>,
}

/// Top-level response from the Walmart `/search` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct WalmartSearchResponse {
    #[serde(default, rename = "searchResult")]
    pub search_result: Option<Vec<Vec<WalmartProduct>>>,
}

/// A single listing from the Walmart search response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalmartProduct {
    #[serde(default)]
    pub us_item_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub product_link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<WalmartRating>,
    #[serde(default)]
    pub fulfillment_badge_groups: Option<Vec<WalmartBadgeGroup>>,
    #[serde(default)]
    pub size: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalmartRating {
    #[serde(default)]
    pub average_rating: Option<Value>,
}

/// Fulfillment badge, e.g. `{"text": "Free shipping,", "slaText": "arrives in 3 days"}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalmartBadgeGroup {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sla_text: Option<String>,
}
