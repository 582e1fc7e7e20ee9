use std::collections::HashSet;

use shopnorm_core::CanonicalProduct;

use crate::external_id::extract_external_id_with;
use crate::image::normalize_image_url_with;
use crate::platform::detect_platform_with;
use crate::price::{detect_currency, parse_price};
use crate::quality::{score_product, QualityInput};
use crate::rules::{PlatformRule, PlatformTable};
use crate::text::{clean_description, clean_text, clean_title};
use crate::types::RawExtraction;
use crate::variant::{normalize_variants_with, OptionContext};

/// Normalizes one scraped product against the built-in platform table.
///
/// Never fails: missing or malformed fields fall back to defaults and lower
/// the quality score instead.
#[must_use]
pub fn normalize_product(url: &str, raw: &RawExtraction) -> CanonicalProduct {
    normalize_product_with(PlatformTable::builtin(), url, raw)
}

/// Like [`normalize_product`], against an explicit platform table.
#[must_use]
pub fn normalize_product_with(
    table: &PlatformTable,
    url: &str,
    raw: &RawExtraction,
) -> CanonicalProduct {
    let platform = detect_platform_with(table, url);
    let rule = table.rule(platform);

    let external_id = extract_external_id_with(rule, url).unwrap_or_default();
    if external_id.is_empty() {
        tracing::debug!(url, %platform, "no external id recovered from url");
    }

    let price_text = raw.price_text();
    let price = price_text.as_deref().map_or(0.0, parse_price);
    let currency = price_text
        .as_deref()
        .and_then(detect_currency)
        .map(str::to_string);
    let compare_at_price = raw
        .compare_at_price_text()
        .as_deref()
        .map(parse_price)
        .filter(|p| *p > 0.0);

    let images = collect_images(&raw.images(), rule);
    let variants = normalize_variants_with(&raw.variants(), rule, &OptionContext::from_raw(raw));

    let title = raw.title().map(|t| clean_title(&t)).unwrap_or_default();
    let description = raw
        .description()
        .map(|d| clean_description(&d))
        .filter(|d| !d.is_empty());
    let brand = raw
        .brand()
        .map(|b| clean_text(&b))
        .filter(|b| !b.is_empty());

    let report = score_product(
        &QualityInput {
            title: &title,
            price,
            image_count: images.len(),
            description: description.as_deref(),
            variant_count: variants.len(),
            brand: brand.as_deref(),
            external_id: &external_id,
        },
        &rule.requirements,
    );

    tracing::debug!(
        %platform,
        external_id = %external_id,
        quality_score = report.score,
        quality_pass = report.pass,
        images = images.len(),
        variants = variants.len(),
        "normalized product"
    );

    CanonicalProduct {
        external_id,
        platform,
        source_url: url.to_string(),
        title,
        price,
        compare_at_price,
        currency,
        images,
        description,
        brand,
        variants,
        quality_score: report.score,
        quality_pass: report.pass,
        missing_fields: report.missing_fields,
    }
}

/// Normalizes, drops empties, dedupes in first-seen order, and caps at the
/// rule's `max_images`.
fn collect_images(raw_images: &[String], rule: &PlatformRule) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images: Vec<String> = raw_images
        .iter()
        .map(|url| normalize_image_url_with(rule, url))
        .filter(|url| !url.is_empty())
        .filter(|url| seen.insert(url.clone()))
        .collect();

    if images.len() > rule.max_images {
        tracing::debug!(
            platform = %rule.platform,
            found = images.len(),
            kept = rule.max_images,
            "truncating image list"
        );
        images.truncate(rule.max_images);
    }
    images
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
