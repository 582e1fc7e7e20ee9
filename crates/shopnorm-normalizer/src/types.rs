//! Tolerant views over the untyped payload produced by the scraper.
//!
//! ## Observed shapes
//!
//! ### Prices
//! Scrapers send either a display string (`priceText: "1.499,99 €"`) or a
//! bare number (`price: 149.99`), sometimes both. `priceText` wins because it
//! carries the currency.
//!
//! ### Images
//! Usually an array of URL strings. Shopify's `products.json` sends objects
//! (`{"src": "..."}`); those are accepted too.
//!
//! ### Variants
//! Shape depends entirely on the platform: Shopify `option1`/`option2` slots,
//! AliExpress composite `skuAttr`/`skuId` keys with a nested `skuVal`, Amazon
//! `asin` entries. Decoding lives in [`crate::variant`]; here they are kept as
//! raw JSON.
//!
//! Every accessor treats a wrong JSON type exactly like a missing key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizeError;

/// The raw per-platform product payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawExtraction(Value);

impl RawExtraction {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parses a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidPayload`] when `json` is not valid JSON.
    /// Valid JSON of the wrong shape is accepted and yields an empty payload.
    pub fn from_json_str(json: &str) -> Result<Self, NormalizeError> {
        serde_json::from_str(json)
            .map(Self)
            .map_err(|source| NormalizeError::InvalidPayload {
                context: "raw extraction".to_string(),
                source,
            })
    }

    /// Raw JSON value for `key`, `None` when absent or `null`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.field("title").and_then(as_string)
    }

    /// Price as text: `priceText` first, then `price` (string or number).
    #[must_use]
    pub fn price_text(&self) -> Option<String> {
        lookup_scalar(&self.0, &["priceText", "price"])
    }

    #[must_use]
    pub fn compare_at_price_text(&self) -> Option<String> {
        lookup_scalar(
            &self.0,
            &["compareAtPriceText", "compareAtPrice", "compare_at_price"],
        )
    }

    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.field("description").and_then(as_string)
    }

    #[must_use]
    pub fn brand(&self) -> Option<String> {
        self.field("brand").and_then(as_string)
    }

    /// Image URLs in payload order. Non-string entries without a `src`/`url`
    /// are skipped.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.field("images") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(_) => lookup_string(item, &["src", "url"]),
                _ => None,
            })
            .collect()
    }

    /// Variant entries in payload order; a missing or non-array field is empty.
    #[must_use]
    pub fn variants(&self) -> Vec<RawVariant> {
        match self.field("variants") {
            Some(Value::Array(items)) => items.iter().cloned().map(RawVariant).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Value> for RawExtraction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One raw variant entry, kept as untyped JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawVariant(Value);

impl RawVariant {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

impl From<Value> for RawVariant {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// First key of `keys` whose value is present and not `null`.
pub(crate) fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| value.get(*key).filter(|v| !v.is_null()))
}

/// First key whose value is a non-blank string.
pub(crate) fn lookup_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(as_string))
}

/// First key whose value is a non-blank string or a number, as text.
pub(crate) fn lookup_scalar(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(as_scalar_string))
}

/// Non-blank string content, trimmed.
pub(crate) fn as_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Strings as-is (trimmed), numbers via their JSON rendering (`12`, `25.99`).
pub(crate) fn as_scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        other => as_string(other),
    }
}

/// Integer quantity from a number or a numeric string; fractions truncate.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn as_quantity(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}
