use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::{PlatformId, RequiredField};

/// A scraped product normalized into the platform-agnostic import shape.
///
/// Always fully populated: fields the scraper could not recover hold their
/// defaults and are reflected in `quality_score` instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Platform-native identifier (ASIN, item ID, listing ID, handle).
    /// Empty when the URL did not match the platform's id patterns.
    pub external_id: String,
    pub platform: PlatformId,
    /// The product page URL the payload was scraped from.
    pub source_url: String,
    pub title: String,
    /// Non-negative price in decimal currency units; `0.0` when unparseable.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    /// ISO 4217 code detected from the price text, e.g. `"EUR"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Normalized, deduplicated image URLs; the first one is the primary image.
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub variants: Vec<CanonicalVariant>,
    /// 0-100 completeness score.
    pub quality_score: u8,
    /// `quality_score` reached the platform's minimum.
    pub quality_pass: bool,
    /// Required fields for this platform that earned no quality credit.
    #[serde(default)]
    pub missing_fields: Vec<RequiredField>,
}

impl CanonicalProduct {
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` if at least one variant is currently available for purchase.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A single purchasable configuration of a [`CanonicalProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVariant {
    /// Never empty: raw id, else SKU, else `variant_<index>`.
    pub id: String,
    pub sku: String,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
    /// Option label (`"Color"`, `"Size"`) to option value.
    pub options: BTreeMap<String, String>,
}
