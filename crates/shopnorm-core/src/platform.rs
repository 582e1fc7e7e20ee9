use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Source marketplace a product URL belongs to.
///
/// Determined once per URL by the platform detector; `Unknown` is a normal
/// outcome for storefronts the detector does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Amazon,
    Aliexpress,
    Shopify,
    Ebay,
    Temu,
    Etsy,
    Shein,
    Wish,
    Cdiscount,
    Fnac,
    Unknown,
}

impl PlatformId {
    /// Every platform, `Unknown` last.
    pub const ALL: [PlatformId; 11] = [
        PlatformId::Amazon,
        PlatformId::Aliexpress,
        PlatformId::Shopify,
        PlatformId::Ebay,
        PlatformId::Temu,
        PlatformId::Etsy,
        PlatformId::Shein,
        PlatformId::Wish,
        PlatformId::Cdiscount,
        PlatformId::Fnac,
        PlatformId::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlatformId::Amazon => "amazon",
            PlatformId::Aliexpress => "aliexpress",
            PlatformId::Shopify => "shopify",
            PlatformId::Ebay => "ebay",
            PlatformId::Temu => "temu",
            PlatformId::Etsy => "etsy",
            PlatformId::Shein => "shein",
            PlatformId::Wish => "wish",
            PlatformId::Cdiscount => "cdiscount",
            PlatformId::Fnac => "fnac",
            PlatformId::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PlatformId::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownPlatform(s.to_string()))
    }
}

/// A canonical field the quality scorer grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Title,
    Price,
    Images,
    Description,
    Variants,
    Brand,
    ExternalId,
}

/// Per-platform import expectations, read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct PlatformRequirements {
    /// Minimum quality score (0-100) for `quality_pass`.
    pub min_quality_score: u8,
    /// Fields reported in `missing_fields` when they earn no credit.
    pub required_fields: Vec<RequiredField>,
    /// Gallery size a complete listing on this platform usually has.
    pub expected_image_count: usize,
    pub supports_variants: bool,
    pub supports_videos: bool,
}

const MARKETPLACE_FIELDS: [RequiredField; 4] = [
    RequiredField::Title,
    RequiredField::Price,
    RequiredField::Images,
    RequiredField::ExternalId,
];

impl PlatformRequirements {
    /// Compiled-in requirements for `platform`.
    #[must_use]
    pub fn builtin(platform: PlatformId) -> Self {
        let (min_quality_score, expected_image_count, supports_videos) = match platform {
            PlatformId::Amazon => (70, 3, true),
            PlatformId::Aliexpress => (65, 5, true),
            PlatformId::Shopify => (70, 3, false),
            PlatformId::Ebay => (60, 2, false),
            PlatformId::Temu | PlatformId::Shein => (60, 3, true),
            PlatformId::Etsy => (65, 3, false),
            PlatformId::Wish => (55, 3, false),
            PlatformId::Cdiscount | PlatformId::Fnac => (65, 3, false),
            PlatformId::Unknown => (60, 2, false),
        };

        let required_fields = if platform == PlatformId::Unknown {
            MARKETPLACE_FIELDS[..3].to_vec()
        } else {
            MARKETPLACE_FIELDS.to_vec()
        };

        Self {
            min_quality_score,
            required_fields,
            expected_image_count,
            supports_variants: platform != PlatformId::Fnac,
            supports_videos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_id_round_trips_through_str() {
        for platform in PlatformId::ALL {
            let parsed: PlatformId = platform.as_str().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn platform_id_parse_is_case_insensitive() {
        assert_eq!("AliExpress".parse::<PlatformId>().unwrap(), PlatformId::Aliexpress);
    }

    #[test]
    fn platform_id_parse_rejects_unlisted_platform() {
        let err = "walmart".parse::<PlatformId>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlatform(ref s) if s == "walmart"));
    }

    #[test]
    fn platform_id_serializes_lowercase() {
        let json = serde_json::to_string(&PlatformId::Cdiscount).unwrap();
        assert_eq!(json, "\"cdiscount\"");
    }

    #[test]
    fn builtin_requirements_stay_within_review_band() {
        for platform in PlatformId::ALL {
            let req = PlatformRequirements::builtin(platform);
            assert!((55..=80).contains(&req.min_quality_score), "{platform}");
            assert!(req.expected_image_count >= 2, "{platform}");
            assert!(req.required_fields.contains(&RequiredField::Title));
            assert!(req.required_fields.contains(&RequiredField::Price));
            assert!(req.required_fields.contains(&RequiredField::Images));
        }
    }

    #[test]
    fn unknown_platform_does_not_require_external_id() {
        let req = PlatformRequirements::builtin(PlatformId::Unknown);
        assert!(!req.required_fields.contains(&RequiredField::ExternalId));
        let amazon = PlatformRequirements::builtin(PlatformId::Amazon);
        assert!(amazon.required_fields.contains(&RequiredField::ExternalId));
        assert_eq!(amazon.min_quality_score, 70);
    }

    #[test]
    fn required_field_serializes_snake_case() {
        let json = serde_json::to_string(&RequiredField::ExternalId).unwrap();
        assert_eq!(json, "\"external_id\"");
    }
}
