//! Per-platform rule table driving detection, id extraction, image rewriting,
//! and variant option labels.
//!
//! Adding a platform means adding a [`PlatformId`] variant and one entry to
//! `BUILTIN_RULES`; nothing else branches on the platform.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use shopnorm_core::{PlatformId, PlatformRequirements, RulesFile};

use crate::error::NormalizeError;

/// Default cap on images kept per product.
pub const DEFAULT_MAX_IMAGES: usize = 20;

/// Hostname substrings checked in order; the first hit wins.
pub const HOST_MARKERS: [(&str, PlatformId); 9] = [
    ("amazon.", PlatformId::Amazon),
    ("aliexpress.", PlatformId::Aliexpress),
    ("ebay.", PlatformId::Ebay),
    ("temu.", PlatformId::Temu),
    ("etsy.", PlatformId::Etsy),
    ("shein.", PlatformId::Shein),
    ("wish.", PlatformId::Wish),
    ("cdiscount.", PlatformId::Cdiscount),
    ("fnac.", PlatformId::Fnac),
];

/// White-label storefronts known to run on Shopify.
const BUILTIN_SHOPIFY_STORES: [&str; 10] = [
    "gymshark.com",
    "allbirds.com",
    "brooklinen.com",
    "bombas.com",
    "untuckit.com",
    "chubbies.com",
    "meundies.com",
    "rothys.com",
    "outdoor-voices.com",
    "kotn.com",
];

const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

struct RuleDef {
    platform: PlatformId,
    id_patterns: &'static [&'static str],
    uppercase_id: bool,
    image_rewrites: &'static [(&'static str, &'static str)],
    property_labels: &'static [(&'static str, &'static str)],
}

const BUILTIN_RULES: [RuleDef; 11] = [
    RuleDef {
        platform: PlatformId::Amazon,
        id_patterns: &[
            r"(?i)/(?:dp|gp/product|gp/aw/d)/([A-Z0-9]{10})(?:[/?#]|$)",
            r"(?i)[?&]asin=([A-Z0-9]{10})(?:[&#]|$)",
        ],
        uppercase_id: true,
        image_rewrites: &[(r"\._[A-Z0-9_,]+_\.", "._AC_SL1500_.")],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Aliexpress,
        id_patterns: &[r"(?i)/(?:item|i)/(\d+)\.html|[?&]goods_id=(\d+)"],
        uppercase_id: false,
        image_rewrites: &[(r"(?i)_\d+x\d+(?:q\d+)?\.(jpe?g|png|webp)", "_800x800.${1}")],
        property_labels: &[("14", "Color"), ("5", "Size"), ("200007763", "Ships From")],
    },
    RuleDef {
        platform: PlatformId::Shopify,
        id_patterns: &[r"/products/([^/?#]+)"],
        uppercase_id: false,
        image_rewrites: &[(r"(?i)_(?:\d+x\d*|x\d+)(?:@\dx)?\.(jpe?g|png|webp|gif)", ".${1}")],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Ebay,
        id_patterns: &[r"(?i)/itm/(?:[^/?#]+/)?(\d+)"],
        uppercase_id: false,
        image_rewrites: &[(r"s-l\d+", "s-l1600")],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Temu,
        id_patterns: &[r"(?i)(?:/product|-g)-(\d+)\.html|[?&]goods_id=(\d+)"],
        uppercase_id: false,
        image_rewrites: &[("/thumb/", "/")],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Etsy,
        id_patterns: &[r"(?i)/listing/(\d+)"],
        uppercase_id: false,
        image_rewrites: &[(r"il_\d+x(?:\d+|N)", "il_fullxfull")],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Shein,
        id_patterns: &[r"(?i)-p-(\d+)|[?&]productId=(\d+)"],
        uppercase_id: false,
        image_rewrites: &[],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Wish,
        id_patterns: &[r"(?i)/(?:product|c)/([A-Za-z0-9]+)"],
        uppercase_id: false,
        image_rewrites: &[],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Cdiscount,
        id_patterns: &[r"(?i)/f-\d+-([A-Za-z0-9]+)\.html|/fp/([A-Za-z0-9]+)"],
        uppercase_id: false,
        image_rewrites: &[],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Fnac,
        id_patterns: &[r"(?i)/a(\d+)(?:[/?#]|$)"],
        uppercase_id: false,
        image_rewrites: &[],
        property_labels: &[],
    },
    RuleDef {
        platform: PlatformId::Unknown,
        id_patterns: &[],
        uppercase_id: false,
        image_rewrites: &[],
        property_labels: &[],
    },
];

static BUILTIN: LazyLock<PlatformTable> = LazyLock::new(PlatformTable::compile_builtin);

/// A compiled `pattern -> replacement` image URL rewrite.
#[derive(Debug, Clone)]
pub struct ImageRewrite {
    pattern: Regex,
    replacement: String,
}

impl ImageRewrite {
    /// # Errors
    ///
    /// Returns `regex::Error` if `pattern` does not compile.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    /// Replaces the first match of the pattern in `url`.
    #[must_use]
    pub fn apply<'a>(&self, url: &'a str) -> Cow<'a, str> {
        self.pattern.replace(url, self.replacement.as_str())
    }
}

/// Everything the normalizer knows about one platform.
#[derive(Debug, Clone)]
pub struct PlatformRule {
    pub platform: PlatformId,
    /// Tried in order; the first non-empty capture group of the first match wins.
    pub id_patterns: Vec<Regex>,
    /// ASINs are canonically upper-case.
    pub uppercase_id: bool,
    pub image_rewrites: Vec<ImageRewrite>,
    /// Known property ids in composite variant keys, e.g. AliExpress `14` -> `Color`.
    pub property_labels: HashMap<String, String>,
    pub requirements: PlatformRequirements,
    pub max_images: usize,
}

/// The full rule set, one [`PlatformRule`] per [`PlatformId`], plus the
/// storefront hosts detected as Shopify.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    rules: Vec<PlatformRule>,
    shopify_stores: Vec<String>,
}

impl PlatformTable {
    /// The compiled-in table, built once on first use.
    #[must_use]
    pub fn builtin() -> &'static PlatformTable {
        &BUILTIN
    }

    /// A new table with `overrides` layered over the compiled-in rules.
    ///
    /// Requirement fields and `max_images` replace the built-in values;
    /// `image_rewrites` replace the platform's whole rewrite list; extra
    /// Shopify stores are appended.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidRule`] if an image rewrite pattern does
    /// not compile.
    pub fn with_overrides(overrides: &RulesFile) -> Result<PlatformTable, NormalizeError> {
        let mut table = Self::builtin().clone();

        for entry in PlatformId::ALL
            .into_iter()
            .filter_map(|platform| overrides.override_for(platform))
        {
            let rule = table.rule_mut(entry.platform);
            entry.apply_to(&mut rule.requirements);
            if let Some(max) = entry.max_images {
                rule.max_images = max;
            }
            if let Some(rewrites) = &entry.image_rewrites {
                rule.image_rewrites = rewrites
                    .iter()
                    .map(|r| {
                        ImageRewrite::new(&r.pattern, &r.replacement).map_err(|e| {
                            NormalizeError::InvalidRule {
                                platform: entry.platform,
                                reason: format!("image rewrite pattern '{}': {e}", r.pattern),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
            }
        }

        for store in &overrides.shopify_stores {
            if !table.shopify_stores.contains(store) {
                table.shopify_stores.push(store.clone());
            }
        }

        tracing::debug!(
            platform_overrides = overrides.platforms.len(),
            shopify_stores = table.shopify_stores.len(),
            "built platform table with overrides"
        );
        Ok(table)
    }

    #[must_use]
    pub fn rule(&self, platform: PlatformId) -> &PlatformRule {
        &self.rules[platform as usize]
    }

    #[must_use]
    pub fn requirements(&self, platform: PlatformId) -> &PlatformRequirements {
        &self.rule(platform).requirements
    }

    /// All rules in [`PlatformId::ALL`] order.
    pub fn rules(&self) -> impl Iterator<Item = &PlatformRule> {
        self.rules.iter()
    }

    /// `true` for `*.myshopify.com` and for configured storefronts, matched as
    /// the exact host or any subdomain of it.
    #[must_use]
    pub fn is_shopify_host(&self, host: &str) -> bool {
        host.ends_with(MYSHOPIFY_SUFFIX)
            || self.shopify_stores.iter().any(|store| {
                host.strip_suffix(store.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
            })
    }

    fn rule_mut(&mut self, platform: PlatformId) -> &mut PlatformRule {
        &mut self.rules[platform as usize]
    }

    fn compile_builtin() -> PlatformTable {
        let rules = BUILTIN_RULES
            .iter()
            .map(|def| PlatformRule {
                platform: def.platform,
                id_patterns: def
                    .id_patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("valid builtin id pattern"))
                    .collect(),
                uppercase_id: def.uppercase_id,
                image_rewrites: def
                    .image_rewrites
                    .iter()
                    .map(|(p, r)| ImageRewrite::new(p, r).expect("valid builtin image rewrite"))
                    .collect(),
                property_labels: def
                    .property_labels
                    .iter()
                    .map(|(id, label)| ((*id).to_string(), (*label).to_string()))
                    .collect(),
                requirements: PlatformRequirements::builtin(def.platform),
                max_images: DEFAULT_MAX_IMAGES,
            })
            .collect();

        PlatformTable {
            rules,
            shopify_stores: BUILTIN_SHOPIFY_STORES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}
