use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::intent::ParamValue;
use crate::CoreError;

pub const RETURN_POLICY_TWO_DAYS: &str = "2 days Return Policy";
pub const RETURN_POLICY_THREE_DAYS: &str = "3 days Return Policy";

/// A marketplace the aggregator can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Walmart,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Amazon, Platform::Walmart];

    /// Selector value that activates every known platform.
    pub const SELECT_ALL: &'static str = "all";

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Walmart => "walmart",
        }
    }

    /// Resolves a platform selector: `"all"` yields every platform, any other
    /// value must name exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownPlatform`] when the selector names no known
    /// platform.
    pub fn select(selector: &str) -> Result<Vec<Platform>, CoreError> {
        if selector.trim().eq_ignore_ascii_case(Self::SELECT_ALL) {
            return Ok(Self::ALL.to_vec());
        }
        Ok(vec![selector.parse()?])
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownPlatform(s.to_owned()))
    }
}

/// A product listing normalized from any marketplace's search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub platform: Platform,
    /// Marketplace identifier (ASIN on Amazon). Empty when the source has none.
    pub product_id: String,
    pub name: String,
    pub price: Option<f64>,
    pub product_url: String,
    pub image_url: String,
    /// Average star rating, when the marketplace reports one.
    pub rating: Option<f64>,
    /// Free-text delivery promise from the marketplace, replaced by an
    /// estimated `%Y-%m-%d %H:%M` timestamp once shipping is estimated.
    pub delivery_info: Option<String>,
    pub size: ParamValue,
    pub discount_price: Option<f64>,
    pub return_policy: Option<String>,
}

impl Product {
    /// `true` when every display field is present: a non-empty name, product
    /// URL and image URL, and a finite non-negative price.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.product_url.trim().is_empty()
            && !self.image_url.trim().is_empty()
            && self.price.is_some_and(|p| p.is_finite() && p >= 0.0)
    }
}

/// Per-platform slice of an [`AggregateResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformResult {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy_checked: Option<bool>,
    /// Set when an adapter operation failed for this platform. The most
    /// recent failure wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformResult {
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.error = Some(reason.into());
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Consolidated per-platform results for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult(BTreeMap<Platform, PlatformResult>);

impl AggregateResult {
    /// Creates an empty entry for each platform.
    #[must_use]
    pub fn for_platforms(platforms: &[Platform]) -> Self {
        Self(
            platforms
                .iter()
                .map(|p| (*p, PlatformResult::default()))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformResult> {
        self.0.get(&platform)
    }

    pub fn get_mut(&mut self, platform: Platform) -> Option<&mut PlatformResult> {
        self.0.get_mut(&platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &PlatformResult)> {
        self.0.iter().map(|(p, r)| (*p, r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Platform, &mut PlatformResult)> {
        self.0.iter_mut().map(|(p, r)| (*p, r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of products across all platforms.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.0.values().map(|r| r.products.len()).sum()
    }
}
