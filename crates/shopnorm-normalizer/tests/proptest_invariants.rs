//! Property tests for the normalizer's totality guarantees.
//!
//! Arbitrary URLs, price strings, and payloads must never panic, and the
//! outputs must keep their shape invariants: no query strings on images,
//! non-empty variant ids, bounded scores.

use proptest::prelude::*;
use serde_json::json;

use shopnorm_core::PlatformId;
use shopnorm_normalizer::{
    detect_platform, extract_external_id, normalize_image_url, normalize_product,
    normalize_variants, parse_price, score_for_platform, QualityInput, RawExtraction, RawVariant,
};

fn any_platform() -> impl Strategy<Value = PlatformId> {
    proptest::sample::select(PlatformId::ALL.to_vec())
}

proptest! {
    #[test]
    fn detect_never_panics(url in ".{0,128}") {
        let _ = detect_platform(&url);
    }

    #[test]
    fn unrecognized_hosts_are_unknown(label in "[a-z]{3,12}", path in "[a-z0-9/]{0,24}") {
        let url = format!("https://{label}-zq.example/{path}");
        prop_assert_eq!(detect_platform(&url), PlatformId::Unknown);
    }

    #[test]
    fn image_urls_never_keep_a_query(url in ".{0,128}", platform in any_platform()) {
        let out = normalize_image_url(&url, platform);
        prop_assert!(!out.contains('?'));
        prop_assert!(!out.contains('#'));
    }

    #[test]
    fn parse_price_is_total_and_non_negative(raw in ".{0,64}") {
        let price = parse_price(&raw);
        prop_assert!(price.is_finite());
        prop_assert!(price >= 0.0);
    }

    #[test]
    fn parse_price_is_idempotent(raw in "[$€£ 0-9.,-]{0,24}") {
        let once = parse_price(&raw);
        let twice = parse_price(&once.to_string());
        prop_assert!((once - twice).abs() <= f64::EPSILON * once.max(1.0));
    }

    #[test]
    fn variant_ids_are_never_empty(
        ids in proptest::collection::vec(proptest::option::of("[ a-zA-Z0-9:;#]{0,16}"), 0..8),
        platform in any_platform(),
    ) {
        let raw: Vec<RawVariant> = ids
            .iter()
            .map(|id| match id {
                Some(id) => RawVariant::new(json!({"id": id, "price": "1.00"})),
                None => RawVariant::new(json!({"title": "No id"})),
            })
            .collect();
        let variants = normalize_variants(&raw, platform);
        prop_assert_eq!(variants.len(), raw.len());
        for variant in &variants {
            prop_assert!(!variant.id.trim().is_empty());
        }
    }

    #[test]
    fn amazon_ids_are_ten_uppercase_alphanumerics(asin in "[a-zA-Z0-9]{10}") {
        let url = format!("https://www.amazon.com/dp/{asin}");
        let id = extract_external_id(&url, PlatformId::Amazon);
        prop_assert_eq!(id.clone(), Some(asin.to_ascii_uppercase()));
        let id = id.unwrap_or_default();
        prop_assert_eq!(id.len(), 10);
        prop_assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn score_is_monotonic_in_each_field(
        title in ".{0,30}",
        price in 0.0f64..500.0,
        image_count in 0usize..8,
        description in proptest::option::of(".{0,150}"),
        variant_count in 0usize..3,
        brand in proptest::option::of("[A-Za-z ]{0,10}"),
        platform in any_platform(),
    ) {
        let base = QualityInput {
            title: &title,
            price,
            image_count,
            description: description.as_deref(),
            variant_count,
            brand: brand.as_deref(),
            external_id: "",
        };
        let score = score_for_platform(&base, platform).score;
        prop_assert!(score <= 100);

        let longer_title = format!("{title} Stainless Travel Mug");
        let full_description = "Double-walled steel. ".repeat(6);
        let some_description = description.clone().or_else(|| Some("Thin".to_string()));
        let richer = [
            QualityInput { title: &longer_title, ..base },
            QualityInput { description: some_description.as_deref(), ..base },
            QualityInput { description: Some(&full_description), ..base },
            QualityInput { image_count: image_count + 1, ..base },
            QualityInput { variant_count: variant_count + 1, ..base },
            QualityInput { price: price + 1.0, ..base },
            QualityInput { brand: Some("Acme"), ..base },
            QualityInput { external_id: "X1", ..base },
        ];
        for input in richer {
            prop_assert!(score_for_platform(&input, platform).score >= score);
        }
    }

    #[test]
    fn normalize_product_is_total(
        url in ".{0,64}",
        title in proptest::option::of(".{0,40}"),
        price in proptest::option::of(".{0,16}"),
        images in proptest::collection::vec(".{0,40}", 0..5),
    ) {
        let payload = RawExtraction::new(json!({
            "title": title,
            "priceText": price,
            "images": images,
            "variants": [{"skuAttr": "1:2#x"}, 3, null],
        }));
        let product = normalize_product(&url, &payload);
        prop_assert!(product.quality_score <= 100);
        prop_assert!(product.price >= 0.0);
        prop_assert!(product.images.iter().all(|i| !i.contains('?') && !i.is_empty()));
        prop_assert_eq!(product.variants.len(), 1);
    }
}
