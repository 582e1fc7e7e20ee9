pub mod error;
pub mod external_id;
pub mod image;
pub mod normalize;
pub mod platform;
pub mod price;
pub mod quality;
pub mod rules;
pub mod text;
pub mod types;
pub mod variant;

pub use error::NormalizeError;
pub use external_id::{extract_external_id, extract_external_id_with};
pub use image::{normalize_image_url, normalize_image_url_with};
pub use normalize::{normalize_product, normalize_product_with};
pub use platform::{detect_platform, detect_platform_with};
pub use price::{detect_currency, parse_price};
pub use quality::{score_for_platform, score_product, QualityInput, QualityReport};
pub use rules::{ImageRewrite, PlatformRule, PlatformTable};
pub use types::{RawExtraction, RawVariant};
pub use variant::{normalize_variants, normalize_variants_with, OptionContext};
