//! JSON shapes printed by the single-shot commands.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use shopnorm_core::{PlatformId, PlatformRequirements};
use shopnorm_normalizer::{
    detect_currency, detect_platform_with, extract_external_id_with, parse_price, PlatformTable,
    RawExtraction,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetectOutput {
    pub platform: PlatformId,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PriceOutput {
    pub price: f64,
    pub currency: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequirementsRow {
    pub platform: PlatformId,
    #[serde(flatten)]
    pub requirements: PlatformRequirements,
    pub max_images: usize,
}

pub(crate) fn detect_report(table: &PlatformTable, url: &str) -> DetectOutput {
    let platform = detect_platform_with(table, url);
    DetectOutput {
        platform,
        external_id: extract_external_id_with(table.rule(platform), url),
    }
}

pub(crate) fn price_report(text: &str) -> PriceOutput {
    PriceOutput {
        price: parse_price(text),
        currency: detect_currency(text),
    }
}

pub(crate) fn requirements_report(table: &PlatformTable) -> Vec<RequirementsRow> {
    table
        .rules()
        .map(|rule| RequirementsRow {
            platform: rule.platform,
            requirements: rule.requirements.clone(),
            max_images: rule.max_images,
        })
        .collect()
}

pub(crate) fn render_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Reads a payload from `path`, or from stdin when `None`.
pub(crate) fn read_payload(path: Option<&Path>) -> anyhow::Result<RawExtraction> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read payload {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read payload from stdin: {e}"))?;
            buf
        }
    };
    Ok(RawExtraction::from_json_str(&content)?)
}
