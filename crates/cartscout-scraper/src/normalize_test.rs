use serde_json::json;

use super::*;
use crate::types::{WalmartBadgeGroup, WalmartRating};

fn make_amazon_product() -> AmazonProduct {
    AmazonProduct {
        asin: Some("B0CJ4V2PZD".to_owned()),
        product_title: Some("Nike Court Vision Low Sneaker".to_owned()),
        product_price: Some("$64.97".to_owned()),
        product_url: Some("https://www.amazon.com/dp/B0CJ4V2PZD".to_owned()),
        product_photo: Some("https://m.media-amazon.com/images/I/71.jpg".to_owned()),
        product_star_rating: Some(json!("4.5")),
        delivery: Some("FREE delivery Tue, Oct 20".to_owned()),
        size: None,
    }
}

fn make_walmart_product() -> WalmartProduct {
    WalmartProduct {
        us_item_id: Some(json!("5038123455")),
        name: Some("Athletic Works Women's Sneaker".to_owned()),
        price: Some(json!(19.98)),
        product_link: Some("https://www.walmart.com/ip/5038123455".to_owned()),
        image: Some("https://i5.walmartimages.com/asr/sneaker.jpeg".to_owned()),
        rating: Some(WalmartRating {
            average_rating: Some(json!(4.2)),
        }),
        fulfillment_badge_groups: Some(vec![WalmartBadgeGroup {
            text: Some("Free shipping,".to_owned()),
            sla_text: Some("arrives in 3 days".to_owned()),
        }]),
        size: None,
    }
}

fn default_size() -> ParamValue {
    ParamValue::Integer(DEFAULT_SIZE)
}

// -----------------------------------------------------------------------
// clean_price
// -----------------------------------------------------------------------

#[test]
fn clean_price_strips_currency_and_separators() {
    assert_eq!(clean_price("$1,299.99"), Some(1299.99));
    assert_eq!(clean_price("USD 45"), Some(45.0));
}

#[test]
fn clean_price_rejects_non_numeric_text() {
    assert_eq!(clean_price("See options"), None);
    assert_eq!(clean_price(""), None);
}

#[test]
fn clean_price_rejects_multiple_decimal_points() {
    assert_eq!(clean_price("1.2.3"), None);
}

// -----------------------------------------------------------------------
// fallback_size
// -----------------------------------------------------------------------

#[test]
fn fallback_size_prefers_search_parameter() {
    let params = Params::new().with("size", "M");
    assert_eq!(fallback_size(&params), ParamValue::Text("M".to_owned()));
}

#[test]
fn fallback_size_defaults_to_four() {
    assert_eq!(fallback_size(&Params::new()), ParamValue::Integer(4));
}

// -----------------------------------------------------------------------
// normalize_amazon
// -----------------------------------------------------------------------

#[test]
fn normalize_amazon_maps_fields() {
    let product = normalize_amazon(make_amazon_product(), &default_size()).unwrap();
    assert_eq!(product.platform, Platform::Amazon);
    assert_eq!(product.product_id, "B0CJ4V2PZD");
    assert_eq!(product.name, "Nike Court Vision Low Sneaker");
    assert_eq!(product.price, Some(64.97));
    assert_eq!(product.rating, Some(4.5));
    assert_eq!(
        product.delivery_info.as_deref(),
        Some("FREE delivery Tue, Oct 20")
    );
    assert_eq!(product.size, ParamValue::Integer(4));
    assert!(product.discount_price.is_none());
    assert!(product.return_policy.is_none());
}

#[test]
fn normalize_amazon_drops_record_without_price() {
    let mut raw = make_amazon_product();
    raw.product_price = None;
    assert!(normalize_amazon(raw, &default_size()).is_none());
}

#[test]
fn normalize_amazon_drops_record_with_unparsable_price() {
    let mut raw = make_amazon_product();
    raw.product_price = Some("Currently unavailable".to_owned());
    assert!(normalize_amazon(raw, &default_size()).is_none());
}

#[test]
fn normalize_amazon_drops_record_without_photo() {
    let mut raw = make_amazon_product();
    raw.product_photo = Some("  ".to_owned());
    assert!(normalize_amazon(raw, &default_size()).is_none());
}

#[test]
fn normalize_amazon_keeps_record_without_optional_fields() {
    let mut raw = make_amazon_product();
    raw.product_star_rating = None;
    raw.delivery = None;
    raw.asin = None;
    let product = normalize_amazon(raw, &default_size()).unwrap();
    assert!(product.rating.is_none());
    assert!(product.delivery_info.is_none());
    assert_eq!(product.product_id, "");
}

#[test]
fn normalize_amazon_prefers_record_size() {
    let mut raw = make_amazon_product();
    raw.size = Some(json!("10"));
    let product = normalize_amazon(raw, &default_size()).unwrap();
    assert_eq!(product.size, ParamValue::Text("10".to_owned()));
}

// -----------------------------------------------------------------------
// normalize_walmart
// -----------------------------------------------------------------------

#[test]
fn normalize_walmart_maps_fields() {
    let product = normalize_walmart(make_walmart_product(), &default_size()).unwrap();
    assert_eq!(product.platform, Platform::Walmart);
    assert_eq!(product.product_id, "5038123455");
    assert_eq!(product.price, Some(19.98));
    assert_eq!(product.rating, Some(4.2));
    assert_eq!(
        product.delivery_info.as_deref(),
        Some("Free shipping, arrives in 3 days")
    );
}

#[test]
fn normalize_walmart_accepts_string_price() {
    let mut raw = make_walmart_product();
    raw.price = Some(json!("$24.00"));
    let product = normalize_walmart(raw, &default_size()).unwrap();
    assert_eq!(product.price, Some(24.0));
}

#[test]
fn normalize_walmart_drops_null_price() {
    let mut raw = make_walmart_product();
    raw.price = Some(serde_json::Value::Null);
    assert!(normalize_walmart(raw, &default_size()).is_none());
}

#[test]
fn normalize_walmart_drops_record_without_link() {
    let mut raw = make_walmart_product();
    raw.product_link = None;
    assert!(normalize_walmart(raw, &default_size()).is_none());
}

#[test]
fn normalize_walmart_without_badges_has_no_delivery_info() {
    let mut raw = make_walmart_product();
    raw.fulfillment_badge_groups = None;
    let product = normalize_walmart(raw, &default_size()).unwrap();
    assert!(product.delivery_info.is_none());
}

#[test]
fn normalize_walmart_numeric_item_id_is_stringified() {
    let mut raw = make_walmart_product();
    raw.us_item_id = Some(json!(12345));
    let product = normalize_walmart(raw, &default_size()).unwrap();
    assert_eq!(product.product_id, "12345");
}
