//! End-to-end normalization of realistic per-platform payloads.
//!
//! Each test feeds a scraped payload and its product URL through
//! `normalize_product` and checks the canonical record a downstream importer
//! would receive.

use serde_json::json;

use shopnorm_core::{PlatformId, RequiredField};
use shopnorm_normalizer::{normalize_product, normalize_variants, RawExtraction, RawVariant};

fn amazon_payload() -> serde_json::Value {
    json!({
        "title": "A".repeat(40),
        "priceText": "$149.99",
        "images": ["//m.media-amazon.com/images/I/71xyz._AC_SX300_SY400_.jpg"],
        "variants": [{"asin": "B08N5WRWNW", "title": "Black", "price": 149.99}]
    })
}

// ---------------------------------------------------------------------------
// Amazon listing with a single thumbnail
// ---------------------------------------------------------------------------

#[test]
fn amazon_listing_normalizes_id_price_image_and_variant() {
    let product = normalize_product(
        "https://www.amazon.com/dp/B08N5WRWNW",
        &RawExtraction::new(amazon_payload()),
    );

    assert_eq!(product.platform, PlatformId::Amazon);
    assert_eq!(product.external_id, "B08N5WRWNW");
    assert!((product.price - 149.99).abs() < 1e-9);
    assert_eq!(product.currency.as_deref(), Some("USD"));

    assert_eq!(product.images.len(), 1);
    assert!(product.images[0].contains("_AC_SL1500_"));
    assert!(!product.images[0].contains("SX300"));
    assert!(product.images[0].starts_with("https://"));

    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.variants[0].id, "B08N5WRWNW");
    assert_eq!(product.variants[0].title, "Black");
}

#[test]
fn amazon_listing_without_brand_or_description_scores_60() {
    let product = normalize_product(
        "https://www.amazon.com/dp/B08N5WRWNW",
        &RawExtraction::new(amazon_payload()),
    );

    // title 20 + price 15 + one image 10 + variants 10 + external id 5
    assert_eq!(product.quality_score, 60);
    assert!(!product.quality_pass);
    assert!(product.missing_fields.is_empty());
}

#[test]
fn amazon_listing_with_brand_and_description_passes() {
    let mut payload = amazon_payload();
    payload["brand"] = json!("Amazon");
    payload["description"] = json!("Compact smart speaker with Alexa. ".repeat(4));

    let product = normalize_product(
        "https://www.amazon.com/dp/B08N5WRWNW",
        &RawExtraction::new(payload),
    );

    assert_eq!(product.quality_score, 85);
    assert!(product.quality_pass);
}

// ---------------------------------------------------------------------------
// Thin listing
// ---------------------------------------------------------------------------

#[test]
fn thin_listing_scores_low_and_fails() {
    let product = normalize_product(
        "https://example.com/shop/headphones",
        &RawExtraction::new(json!({"title": "Headphones", "price": 0, "images": []})),
    );

    assert_eq!(product.platform, PlatformId::Unknown);
    assert_eq!(product.external_id, "");
    assert_eq!(product.price, 0.0);
    assert!(product.quality_score < 50);
    assert!(!product.quality_pass);
    assert_eq!(
        product.missing_fields,
        vec![RequiredField::Price, RequiredField::Images]
    );
}

// ---------------------------------------------------------------------------
// AliExpress composite SKU
// ---------------------------------------------------------------------------

#[test]
fn aliexpress_composite_sku_decodes_options() {
    let raw = vec![RawVariant::new(json!({
        "skuId": "12:193#S;14:175#White",
        "skuPrice": "25.99",
        "availQuantity": 100
    }))];
    let variants = normalize_variants(&raw, PlatformId::Aliexpress);

    assert_eq!(variants.len(), 1);
    let variant = &variants[0];
    assert_eq!(variant.options.get("Size").map(String::as_str), Some("S"));
    assert_eq!(variant.options.get("Color").map(String::as_str), Some("White"));
    assert_eq!(variant.options.len(), 2);
    assert!((variant.price - 25.99).abs() < 1e-9);
    assert!(variant.available);
}

#[test]
fn aliexpress_listing_through_pipeline() {
    let product = normalize_product(
        "https://www.aliexpress.com/item/1005004123456789.html?spm=a2g0o.detail",
        &RawExtraction::new(json!({
            "title": "Women Summer Cotton T-Shirt Loose Short Sleeve",
            "priceText": "US $12.34",
            "images": [
                "https://ae01.alicdn.com/kf/S1.jpg_220x220q75.jpg",
                "https://ae01.alicdn.com/kf/S1.jpg_640x640.jpg",
                "https://ae01.alicdn.com/kf/S2.jpg_220x220.jpg"
            ],
            "variants": [
                {"skuAttr": "14:175#White;5:361386#M", "skuVal": {"skuCalPrice": "12.34", "availQuantity": 3}},
                {"skuAttr": "14:29#Black;5:361386#M", "skuVal": {"skuCalPrice": "12.34", "availQuantity": 0}}
            ]
        })),
    );

    assert_eq!(product.platform, PlatformId::Aliexpress);
    assert_eq!(product.external_id, "1005004123456789");
    assert_eq!(
        product.images,
        vec![
            "https://ae01.alicdn.com/kf/S1.jpg_800x800.jpg",
            "https://ae01.alicdn.com/kf/S2.jpg_800x800.jpg",
        ]
    );
    assert_eq!(product.variants.len(), 2);
    assert!(product.variants[0].available);
    assert!(!product.variants[1].available);
    assert_eq!(product.variants[1].options.get("Color").map(String::as_str), Some("Black"));
    assert!(product.has_available_variants());
}

// ---------------------------------------------------------------------------
// Serialized shape
// ---------------------------------------------------------------------------

#[test]
fn canonical_product_serializes_camel_case() {
    let product = normalize_product(
        "https://www.amazon.com/dp/B08N5WRWNW",
        &RawExtraction::new(amazon_payload()),
    );
    let value = serde_json::to_value(&product).expect("serialization failed");

    assert_eq!(value["platform"], "amazon");
    assert_eq!(value["externalId"], "B08N5WRWNW");
    assert_eq!(value["qualityScore"], 60);
    assert_eq!(value["qualityPass"], false);
    assert_eq!(value["sourceUrl"], "https://www.amazon.com/dp/B08N5WRWNW");
    assert!(value.get("brand").is_none());
}
