//! The decoded shopping intent: which pipeline stages run and with what
//! parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// One named step of the aggregation pipeline.
///
/// Variants are declared in execution order; [`StageName::ALL`] and the
/// derived `Ord` both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Search,
    DiscountCheck,
    PriceFilter,
    ShippingEstimate,
    ReturnPolicy,
    PriceComparison,
}

impl StageName {
    /// Every stage, in the order the orchestrator runs them.
    pub const ALL: [StageName; 6] = [
        StageName::Search,
        StageName::DiscountCheck,
        StageName::PriceFilter,
        StageName::ShippingEstimate,
        StageName::ReturnPolicy,
        StageName::PriceComparison,
    ];

    /// The tool name the reasoning service uses for this stage. Its presence
    /// anywhere in a response enables the stage.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            StageName::Search => "search_products",
            StageName::DiscountCheck => "check_discount",
            StageName::PriceFilter => "price_filter",
            StageName::ShippingEstimate => "check_shipping_time",
            StageName::ReturnPolicy => "check_return_policy",
            StageName::PriceComparison => "price_comparison",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// A parameter value from the action line: a quoted string or a bare integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
}

impl ParamValue {
    /// `true` for `""` and `0`, which are never forwarded to a marketplace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Integer(n) => *n == 0,
            ParamValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Numeric view of the value. Text is accepted when it parses as a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(n) => Some(*n as f64),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

/// Parameter map decoded from the action line, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub const QUERY: &'static str = "query";
    pub const PLATFORM: &'static str = "platform";
    pub const MAX_PRICE: &'static str = "max_price";
    pub const DEADLINE: &'static str = "deadline";
    pub const COUPON_CODE: &'static str = "coupon_code";
    pub const SIZE: &'static str = "size";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Returns the value rendered as text, or `None` when absent or blank.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .filter(|v| !matches!(v, ParamValue::Text(s) if s.trim().is_empty()))
            .map(ToString::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn query(&self) -> Option<String> {
        self.text(Self::QUERY)
    }

    #[must_use]
    pub fn platform(&self) -> Option<String> {
        self.text(Self::PLATFORM)
    }

    /// Upper price bound, `None` when absent or not numeric.
    #[must_use]
    pub fn max_price(&self) -> Option<f64> {
        self.0.get(Self::MAX_PRICE).and_then(ParamValue::as_f64)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<String> {
        self.text(Self::DEADLINE)
    }

    #[must_use]
    pub fn coupon_code(&self) -> Option<String> {
        self.text(Self::COUPON_CODE)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Which stages run and with what parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    enabled: BTreeSet<StageName>,
    params: Params,
}

impl Intent {
    #[must_use]
    pub fn new(enabled: impl IntoIterator<Item = StageName>, params: Params) -> Self {
        Self {
            enabled: enabled.into_iter().collect(),
            params,
        }
    }

    #[must_use]
    pub fn is_enabled(&self, stage: StageName) -> bool {
        self.enabled.contains(&stage)
    }

    /// Enabled stages in execution order.
    pub fn enabled_stages(&self) -> impl Iterator<Item = StageName> + '_ {
        self.enabled.iter().copied()
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}
