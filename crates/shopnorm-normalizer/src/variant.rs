//! Platform variant structures to [`CanonicalVariant`].
//!
//! Option values come from three places, merged in this order (later wins on
//! the same label):
//!
//! 1. An encoded composite key, AliExpress style: `12:193#S;14:175#White`
//!    (`propertyId:valueId#display`, `;`-separated), or a bare `skuPropIds`
//!    list of value ids resolved through the payload's property table.
//! 2. Shopify `option1`..`option3` slots, named by the product's option table.
//! 3. A nested `options` object, copied through.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use shopnorm_core::{CanonicalVariant, PlatformId};

use crate::price::parse_price;
use crate::rules::{PlatformRule, PlatformTable};
use crate::types::{
    as_quantity, as_scalar_string, as_string, lookup, lookup_scalar, lookup_string,
    RawExtraction, RawVariant,
};

const ID_KEYS: [&str; 6] = ["id", "variantId", "variant_id", "asin", "skuId", "sku_id"];
const SKU_KEYS: [&str; 3] = ["sku", "skuCode", "sku_code"];
const TITLE_KEYS: [&str; 2] = ["title", "name"];
const PRICE_KEYS: [&str; 5] = ["price", "skuPrice", "sku_price", "salePrice", "sale_price"];
const SKU_VAL_PRICE_KEYS: [&str; 2] = ["actSkuCalPrice", "skuCalPrice"];
const COMPARE_AT_KEYS: [&str; 4] = ["compareAtPrice", "compare_at_price", "originalPrice", "listPrice"];
const INVENTORY_KEYS: [&str; 5] = [
    "inventoryQuantity",
    "inventory_quantity",
    "availQuantity",
    "stock",
    "quantity",
];
const COMPOSITE_KEYS: [&str; 4] = ["skuAttr", "skuPropIds", "skuId", "id"];
const OPTION_SLOTS: [&str; 3] = ["option1", "option2", "option3"];

const DEFAULT_VARIANT_TITLE: &str = "Default";

const SIZE_WORDS: [&str; 16] = [
    "XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL", "2XL", "3XL", "4XL", "5XL", "ONE SIZE",
    "FREE SIZE", "SMALL", "LARGE",
];

const COLOR_WORDS: [&str; 24] = [
    "black", "white", "red", "blue", "green", "yellow", "pink", "purple", "orange", "grey",
    "gray", "brown", "beige", "navy", "gold", "silver", "khaki", "ivory", "rose", "cream",
    "multicolor", "transparent", "clear", "burgundy",
];

/// Product-level tables needed to label a variant's options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionContext {
    /// Position `i` names slot `option{i+1}`.
    option_names: Vec<String>,
    /// Property id to label, e.g. `"14"` -> `"Color"`.
    property_labels: HashMap<String, String>,
    /// Value id to `(property id, display value)`.
    property_values: HashMap<String, (String, String)>,
}

impl OptionContext {
    /// Reads `options` and `skuProperties` from the product payload.
    #[must_use]
    pub fn from_raw(raw: &RawExtraction) -> Self {
        let mut context = Self {
            option_names: raw.field("options").map(option_names).unwrap_or_default(),
            ..Self::default()
        };
        match raw.field("skuProperties") {
            Some(Value::Object(map)) => {
                for (id, label) in map {
                    if let Some(label) = as_string(label) {
                        context.property_labels.insert(id.clone(), label);
                    }
                }
            }
            Some(Value::Array(props)) => {
                for prop in props {
                    context.add_property_list_entry(prop);
                }
            }
            _ => {}
        }
        context
    }

    #[must_use]
    pub fn with_option_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_property_label(mut self, property_id: &str, label: &str) -> Self {
        self.property_labels
            .insert(property_id.to_string(), label.to_string());
        self
    }

    #[must_use]
    pub fn option_names(&self) -> &[String] {
        &self.option_names
    }

    /// AliExpress `productSKUPropertyList` entry.
    fn add_property_list_entry(&mut self, prop: &Value) {
        let Some(prop_id) = lookup_scalar(prop, &["skuPropertyId", "propertyId"]) else {
            return;
        };
        if let Some(label) = lookup_string(prop, &["skuPropertyName", "propertyName"]) {
            self.property_labels.insert(prop_id.clone(), label);
        }
        let Some(Value::Array(values)) = prop.get("skuPropertyValues") else {
            return;
        };
        for value in values {
            let Some(value_id) =
                lookup_scalar(value, &["propertyValueIdLong", "propertyValueId"])
            else {
                continue;
            };
            let Some(display) = lookup_string(
                value,
                &["propertyValueDisplayName", "propertyValueName"],
            ) else {
                continue;
            };
            self.property_values
                .insert(value_id, (prop_id.clone(), display));
        }
    }
}

/// Option names from a Shopify-style `options` array of strings or `{name}`.
fn option_names(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::Object(_) => lookup_string(item, &["name"]).unwrap_or_default(),
            other => as_string(other).unwrap_or_default(),
        })
        .collect()
}

/// Normalizes variants using the built-in rule for `platform` and no
/// product-level option tables.
#[must_use]
pub fn normalize_variants(raw: &[RawVariant], platform: PlatformId) -> Vec<CanonicalVariant> {
    normalize_variants_with(
        raw,
        PlatformTable::builtin().rule(platform),
        &OptionContext::default(),
    )
}

/// Normalizes every object entry of `raw`, preserving order. Non-object
/// entries are skipped; positional ids still count them.
#[must_use]
pub fn normalize_variants_with(
    raw: &[RawVariant],
    rule: &PlatformRule,
    context: &OptionContext,
) -> Vec<CanonicalVariant> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, variant)| {
            if !variant.is_object() {
                tracing::debug!(index, platform = %rule.platform, "skipping non-object variant");
                return None;
            }
            Some(normalize_variant(variant.as_value(), index, rule, context))
        })
        .collect()
}

fn normalize_variant(
    value: &Value,
    index: usize,
    rule: &PlatformRule,
    context: &OptionContext,
) -> CanonicalVariant {
    let sku = lookup_string(value, &SKU_KEYS).unwrap_or_default();
    let id = lookup_scalar(value, &ID_KEYS)
        .or_else(|| (!sku.is_empty()).then(|| sku.clone()))
        .unwrap_or_else(|| format!("variant_{index}"));

    let sku_val = value.get("skuVal");
    let price = lookup(value, &PRICE_KEYS)
        .or_else(|| sku_val.and_then(|v| lookup(v, &SKU_VAL_PRICE_KEYS)))
        .map_or(0.0, price_value);
    let compare_at_price = lookup(value, &COMPARE_AT_KEYS)
        .map(price_value)
        .filter(|p| *p > 0.0);

    let inventory_quantity = lookup(value, &INVENTORY_KEYS)
        .or_else(|| sku_val.and_then(|v| lookup(v, &["availQuantity"])))
        .and_then(as_quantity);

    let explicitly_unavailable = matches!(value.get("available"), Some(Value::Bool(false)));
    let available = !explicitly_unavailable && inventory_quantity.is_none_or(|q| q > 0);

    CanonicalVariant {
        id,
        sku,
        title: lookup_string(value, &TITLE_KEYS)
            .unwrap_or_else(|| DEFAULT_VARIANT_TITLE.to_string()),
        price,
        compare_at_price,
        available,
        inventory_quantity,
        options: decode_options(value, rule, context),
    }
}

/// Strings go through [`parse_price`]; numbers are used as-is when finite and
/// non-negative.
fn price_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0),
        Value::String(s) => parse_price(s),
        _ => 0.0,
    }
}

fn decode_options(
    value: &Value,
    rule: &PlatformRule,
    context: &OptionContext,
) -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();

    if let Some(pairs) = COMPOSITE_KEYS.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .and_then(|encoded| decode_composite(encoded, context))
    }) {
        let mut used = HashSet::new();
        for (position, pair) in pairs.into_iter().enumerate() {
            let mut label = resolve_label(&pair, position, rule, context);
            if !used.insert(label.clone()) {
                label = format!("Option{}", position + 1);
                used.insert(label.clone());
            }
            options.insert(label, pair.display);
        }
    }

    for (position, slot) in OPTION_SLOTS.iter().enumerate() {
        let Some(option_value) = value.get(*slot).and_then(as_scalar_string) else {
            continue;
        };
        let label = context
            .option_names
            .get(position)
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Option{}", position + 1));
        options.insert(label, option_value);
    }

    if let Some(Value::Object(nested)) = value.get("options") {
        for (label, option_value) in nested {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            if let Some(option_value) = as_scalar_string(option_value) {
                options.insert(label.to_string(), option_value);
            }
        }
    }

    options
}

/// One decoded `propertyId:valueId#display` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompositePair {
    property_id: String,
    display: String,
    /// The display value came from the key or a display table, not the bare value id.
    has_display: bool,
}

/// Decodes `12:193#S;14:175#White`, or a `193,175` value id list resolved
/// through the context. `None` if `encoded` has neither shape.
fn decode_composite(encoded: &str, context: &OptionContext) -> Option<Vec<CompositePair>> {
    let encoded = encoded.trim();
    if encoded.contains(':') {
        return decode_property_pairs(encoded, context);
    }
    decode_value_ids(encoded, context)
}

fn decode_property_pairs(encoded: &str, context: &OptionContext) -> Option<Vec<CompositePair>> {
    let mut pairs = Vec::new();
    for segment in encoded.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (ids, display) = match segment.split_once('#') {
            Some((ids, display)) => (ids, Some(display.trim())),
            None => (segment, None),
        };
        let (property_id, value_id) = ids.split_once(':')?;
        let (property_id, value_id) = (property_id.trim(), value_id.trim());
        if property_id.is_empty()
            || !property_id.bytes().all(|b| b.is_ascii_digit())
            || value_id.is_empty()
        {
            return None;
        }

        let known = context.property_values.get(value_id).map(|(_, d)| d.clone());
        let pair = match display.filter(|d| !d.is_empty()).map(str::to_string).or(known) {
            Some(display) => CompositePair {
                property_id: property_id.to_string(),
                display,
                has_display: true,
            },
            None => CompositePair {
                property_id: property_id.to_string(),
                display: value_id.to_string(),
                has_display: false,
            },
        };
        pairs.push(pair);
    }
    (!pairs.is_empty()).then_some(pairs)
}

/// AliExpress `skuPropIds`: comma-separated value ids, only meaningful when the
/// payload's property list names them.
fn decode_value_ids(encoded: &str, context: &OptionContext) -> Option<Vec<CompositePair>> {
    let ids: Vec<&str> = encoded
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() || !ids.iter().all(|id| id.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let pairs: Vec<CompositePair> = ids
        .iter()
        .filter_map(|id| context.property_values.get(*id))
        .map(|(property_id, display)| CompositePair {
            property_id: property_id.clone(),
            display: display.clone(),
            has_display: true,
        })
        .collect();
    (!pairs.is_empty()).then_some(pairs)
}

/// Payload table, then the platform table, then value-shape inference, then
/// `Option<n>`.
fn resolve_label(
    pair: &CompositePair,
    position: usize,
    rule: &PlatformRule,
    context: &OptionContext,
) -> String {
    context
        .property_labels
        .get(&pair.property_id)
        .or_else(|| rule.property_labels.get(&pair.property_id))
        .cloned()
        .or_else(|| {
            pair.has_display
                .then(|| infer_label(&pair.display))
                .flatten()
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Option{}", position + 1))
}

/// Guesses `Size` or `Color` from what a value looks like.
fn infer_label(display: &str) -> Option<&'static str> {
    let upper = display.trim().to_ascii_uppercase();
    if SIZE_WORDS.contains(&upper.as_str()) || looks_like_numeric_size(&upper) {
        return Some("Size");
    }
    let lower = display.to_lowercase();
    if lower
        .split(|c: char| !c.is_alphabetic())
        .any(|word| COLOR_WORDS.contains(&word))
    {
        return Some("Color");
    }
    None
}

/// `42`, `38.5`, `EU 42`, `US10`, `30cm`, `6 inch`.
fn looks_like_numeric_size(upper: &str) -> bool {
    let body = ["EU", "US", "UK"]
        .iter()
        .find_map(|prefix| upper.strip_prefix(prefix))
        .unwrap_or(upper)
        .trim();
    let number_end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    let (number, unit) = body.split_at(number_end);
    if number.is_empty() || number.starts_with('.') || number.parse::<f64>().is_err() {
        return false;
    }
    match unit.trim() {
        "" => {
            let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
            whole.len() <= 3 && fraction.len() <= 1
        }
        "CM" | "MM" | "IN" | "INCH" | "\"" => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;
