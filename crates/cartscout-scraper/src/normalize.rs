//! Normalization from raw marketplace records to [`cartscout_core::Product`].
//!
//! A record becomes a product only when it has a name, product URL, image URL
//! and a usable price; anything else is dropped here so no pipeline stage ever
//! sees an incomplete listing.

use cartscout_core::{ParamValue, Params, Platform, Product};
use serde_json::Value;

use crate::types::{AmazonProduct, WalmartProduct};

/// Size recorded on products whose record and search parameters carry none.
pub const DEFAULT_SIZE: i64 = 4;

/// Parses a display price by discarding every character except ASCII digits
/// and `.`, so `"$1,299.99"` becomes `1299.99`.
///
/// Returns `None` when nothing numeric remains or the remainder is not a
/// valid number (e.g. `"1.2.3"`).
#[must_use]
pub fn clean_price(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// The size to record when a marketplace record has none: the `size` search
/// parameter when given, else [`DEFAULT_SIZE`].
#[must_use]
pub fn fallback_size(params: &Params) -> ParamValue {
    params
        .get(Params::SIZE)
        .cloned()
        .unwrap_or(ParamValue::Integer(DEFAULT_SIZE))
}

/// Normalizes one Amazon search record. Returns `None` when a required field
/// is missing.
#[must_use]
pub fn normalize_amazon(raw: AmazonProduct, fallback_size: &ParamValue) -> Option<Product> {
    let product = Product {
        platform: Platform::Amazon,
        product_id: raw.asin.unwrap_or_default(),
        name: non_blank(raw.product_title)?,
        price: raw.product_price.as_deref().and_then(clean_price),
        product_url: non_blank(raw.product_url)?,
        image_url: non_blank(raw.product_photo)?,
        rating: raw.product_star_rating.as_ref().and_then(value_to_f64),
        delivery_info: non_blank(raw.delivery),
        size: raw
            .size
            .as_ref()
            .and_then(value_to_param)
            .unwrap_or_else(|| fallback_size.clone()),
        discount_price: None,
        return_policy: None,
    };
    product.has_required_fields().then_some(product)
}

/// Normalizes one Walmart search record. Returns `None` when a required field
/// is missing.
#[must_use]
pub fn normalize_walmart(raw: WalmartProduct, fallback_size: &ParamValue) -> Option<Product> {
    let delivery_info = raw
        .fulfillment_badge_groups
        .as_deref()
        .and_then(<[_]>::first)
        .map(|badge| {
            format!(
                "{} {}",
                badge.text.as_deref().unwrap_or_default(),
                badge.sla_text.as_deref().unwrap_or_default()
            )
            .trim()
            .to_owned()
        })
        .filter(|s| !s.is_empty());

    let product = Product {
        platform: Platform::Walmart,
        product_id: raw
            .us_item_id
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_default(),
        name: non_blank(raw.name)?,
        price: raw.price.as_ref().and_then(value_to_f64),
        product_url: non_blank(raw.product_link)?,
        image_url: non_blank(raw.image)?,
        rating: raw
            .rating
            .and_then(|r| r.average_rating)
            .as_ref()
            .and_then(value_to_f64),
        delivery_info,
        size: raw
            .size
            .as_ref()
            .and_then(value_to_param)
            .unwrap_or_else(|| fallback_size.clone()),
        discount_price: None,
        return_policy: None,
    };
    product.has_required_fields().then_some(product)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Numbers pass through; strings go through [`clean_price`].
fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => clean_price(s),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_param(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Number(n) => n.as_i64().map(ParamValue::Integer),
        Value::String(s) if !s.trim().is_empty() => Some(ParamValue::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
