//! Optional YAML overrides for the compiled-in platform rules.
//!
//! CDN resize tokens and storefront lists change without notice on the source
//! sites, so operators can adjust them without a rebuild:
//!
//! ```yaml
//! shopify_stores:
//!   - drinkcann.com
//! platforms:
//!   - platform: amazon
//!     min_quality_score: 65
//!     image_rewrites:
//!       - pattern: '\._[A-Z0-9_,]+_\.'
//!         replacement: '._AC_SL2000_.'
//! ```
//!
//! Regex patterns are only checked for emptiness here; compiling them is the
//! normalizer's job when it builds its platform table.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::{PlatformId, PlatformRequirements};
use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    /// Extra white-label storefront hosts detected as Shopify.
    #[serde(default)]
    pub shopify_stores: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<PlatformOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformOverride {
    pub platform: PlatformId,
    #[serde(default)]
    pub min_quality_score: Option<u8>,
    #[serde(default)]
    pub expected_image_count: Option<usize>,
    /// Cap on images kept per product.
    #[serde(default)]
    pub max_images: Option<usize>,
    /// Replaces (not extends) the platform's built-in rewrite list when set.
    #[serde(default)]
    pub image_rewrites: Option<Vec<ImageRewriteConfig>>,
}

impl PlatformOverride {
    /// Applies the requirement fields of this override onto `requirements`.
    pub fn apply_to(&self, requirements: &mut PlatformRequirements) {
        if let Some(min) = self.min_quality_score {
            requirements.min_quality_score = min;
        }
        if let Some(count) = self.expected_image_count {
            requirements.expected_image_count = count;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRewriteConfig {
    pub pattern: String,
    pub replacement: String,
}

impl RulesFile {
    /// Returns the override for `platform`, if the file has one.
    #[must_use]
    pub fn override_for(&self, platform: PlatformId) -> Option<&PlatformOverride> {
        self.platforms.iter().find(|o| o.platform == platform)
    }
}

/// Load and validate a rules file from disk.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<RulesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules = parse_rules(&content)?;
    tracing::info!(
        path = %path.display(),
        platform_overrides = rules.platforms.len(),
        shopify_stores = rules.shopify_stores.len(),
        "loaded platform rules"
    );
    Ok(rules)
}

/// Parse and validate rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_rules(content: &str) -> Result<RulesFile, ConfigError> {
    let mut rules: RulesFile = serde_yaml::from_str(content).map_err(ConfigError::RulesFileParse)?;

    for store in &mut rules.shopify_stores {
        *store = store.trim().trim_start_matches("www.").to_ascii_lowercase();
    }

    validate_rules(&rules)?;
    Ok(rules)
}

fn validate_rules(rules: &RulesFile) -> Result<(), ConfigError> {
    for store in &rules.shopify_stores {
        if store.is_empty() {
            return Err(ConfigError::Validation(
                "shopify store host must be non-empty".to_string(),
            ));
        }
        if store.contains('/') || store.contains(':') {
            return Err(ConfigError::Validation(format!(
                "shopify store '{store}' must be a bare hostname, not a URL"
            )));
        }
    }

    let mut seen = HashSet::new();
    for entry in &rules.platforms {
        if !seen.insert(entry.platform) {
            return Err(ConfigError::Validation(format!(
                "duplicate override for platform '{}'",
                entry.platform
            )));
        }

        if entry.min_quality_score.is_some_and(|min| min > 100) {
            return Err(ConfigError::Validation(format!(
                "platform '{}' has min_quality_score above 100",
                entry.platform
            )));
        }

        if entry.max_images == Some(0) {
            return Err(ConfigError::Validation(format!(
                "platform '{}' has max_images 0; must be at least 1",
                entry.platform
            )));
        }

        for rewrite in entry.image_rewrites.iter().flatten() {
            if rewrite.pattern.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "platform '{}' has an image rewrite with an empty pattern",
                    entry.platform
                )));
            }
            if rewrite.replacement.contains('?') {
                return Err(ConfigError::Validation(format!(
                    "platform '{}' image rewrite replacement must not contain '?'",
                    entry.platform
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
