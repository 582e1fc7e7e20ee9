//! Weighted completeness score for a normalized product.
//!
//! Scores range from 0 to 100. Each field earns at most its full weight;
//! partial weights reward a field that is present but thin.

use shopnorm_core::{CanonicalProduct, PlatformId, PlatformRequirements, RequiredField};

use crate::rules::PlatformTable;

// ---------------------------------------------------------------------------
// Weight constants (full weights must sum to exactly 100)
// ---------------------------------------------------------------------------

/// Title of at least [`MIN_TITLE_CHARS`] characters.
pub const W_TITLE: u8 = 20;
/// Title present but shorter.
pub const W_TITLE_SHORT: u8 = 10;
/// Price above zero.
pub const W_PRICE: u8 = 15;
/// At least [`FULL_GALLERY_IMAGES`] images.
pub const W_IMAGES: u8 = 25;
/// At least [`PARTIAL_GALLERY_IMAGES`] images.
pub const W_IMAGES_PARTIAL: u8 = 20;
/// A single image.
pub const W_IMAGES_SINGLE: u8 = 10;
/// Description of at least [`MIN_DESCRIPTION_CHARS`] characters.
pub const W_DESCRIPTION: u8 = 15;
/// Description present but shorter.
pub const W_DESCRIPTION_SHORT: u8 = 8;
/// At least one variant.
pub const W_VARIANTS: u8 = 10;
pub const W_BRAND: u8 = 10;
pub const W_EXTERNAL_ID: u8 = 5;

pub const MIN_TITLE_CHARS: usize = 10;
pub const MIN_DESCRIPTION_CHARS: usize = 100;
pub const FULL_GALLERY_IMAGES: usize = 5;
pub const PARTIAL_GALLERY_IMAGES: usize = 3;

// Compile-time assertion that full weights sum to 100.
const _: () = assert!(
    W_TITLE as u32
        + W_PRICE as u32
        + W_IMAGES as u32
        + W_DESCRIPTION as u32
        + W_VARIANTS as u32
        + W_BRAND as u32
        + W_EXTERNAL_ID as u32
        == 100,
    "quality weights must sum to exactly 100"
);

const SCORED_FIELDS: [RequiredField; 7] = [
    RequiredField::Title,
    RequiredField::Price,
    RequiredField::Images,
    RequiredField::Description,
    RequiredField::Variants,
    RequiredField::Brand,
    RequiredField::ExternalId,
];

/// The product facts the score depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityInput<'a> {
    pub title: &'a str,
    pub price: f64,
    pub image_count: usize,
    pub description: Option<&'a str>,
    pub variant_count: usize,
    pub brand: Option<&'a str>,
    pub external_id: &'a str,
}

impl<'a> QualityInput<'a> {
    #[must_use]
    pub fn from_product(product: &'a CanonicalProduct) -> Self {
        Self {
            title: &product.title,
            price: product.price,
            image_count: product.images.len(),
            description: product.description.as_deref(),
            variant_count: product.variants.len(),
            brand: product.brand.as_deref(),
            external_id: &product.external_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReport {
    /// 0-100 weighted score.
    pub score: u8,
    /// `score` reached the platform's minimum.
    pub pass: bool,
    /// Required fields that earned no points, in requirement order.
    pub missing_fields: Vec<RequiredField>,
}

/// Scores `input` and checks it against `requirements`.
#[must_use]
pub fn score_product(input: &QualityInput<'_>, requirements: &PlatformRequirements) -> QualityReport {
    let total: u32 = SCORED_FIELDS
        .iter()
        .map(|field| u32::from(field_points(*field, input)))
        .sum();
    let score = u8::try_from(total.min(100)).unwrap_or(100);

    let missing_fields = requirements
        .required_fields
        .iter()
        .copied()
        .filter(|field| field_points(*field, input) == 0)
        .collect();

    QualityReport {
        score,
        pass: score >= requirements.min_quality_score,
        missing_fields,
    }
}

/// [`score_product`] against the built-in requirements for `platform`.
#[must_use]
pub fn score_for_platform(input: &QualityInput<'_>, platform: PlatformId) -> QualityReport {
    score_product(input, PlatformTable::builtin().requirements(platform))
}

/// Points `field` earns for `input`.
#[must_use]
pub fn field_points(field: RequiredField, input: &QualityInput<'_>) -> u8 {
    match field {
        RequiredField::Title => {
            let chars = present(input.title).map_or(0, |t| t.chars().count());
            if chars >= MIN_TITLE_CHARS {
                W_TITLE
            } else if chars > 0 {
                W_TITLE_SHORT
            } else {
                0
            }
        }
        RequiredField::Price => {
            if input.price > 0.0 {
                W_PRICE
            } else {
                0
            }
        }
        RequiredField::Images => match input.image_count {
            n if n >= FULL_GALLERY_IMAGES => W_IMAGES,
            n if n >= PARTIAL_GALLERY_IMAGES => W_IMAGES_PARTIAL,
            0 => 0,
            _ => W_IMAGES_SINGLE,
        },
        RequiredField::Description => {
            let chars = input
                .description
                .and_then(present)
                .map_or(0, |d| d.chars().count());
            if chars >= MIN_DESCRIPTION_CHARS {
                W_DESCRIPTION
            } else if chars > 0 {
                W_DESCRIPTION_SHORT
            } else {
                0
            }
        }
        RequiredField::Variants => {
            if input.variant_count > 0 {
                W_VARIANTS
            } else {
                0
            }
        }
        RequiredField::Brand => {
            if input.brand.and_then(present).is_some() {
                W_BRAND
            } else {
                0
            }
        }
        RequiredField::ExternalId => {
            if present(input.external_id).is_some() {
                W_EXTERNAL_ID
            } else {
                0
            }
        }
    }
}

fn present(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
