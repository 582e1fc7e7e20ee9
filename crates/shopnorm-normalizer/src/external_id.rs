use shopnorm_core::PlatformId;

use crate::rules::{PlatformRule, PlatformTable};

/// Recovers the platform-native product id from `url`.
///
/// Returns `None` when no pattern matches; `Unknown` has no patterns.
#[must_use]
pub fn extract_external_id(url: &str, platform: PlatformId) -> Option<String> {
    extract_external_id_with(PlatformTable::builtin().rule(platform), url)
}

/// Like [`extract_external_id`], against an explicit rule.
#[must_use]
pub fn extract_external_id_with(rule: &PlatformRule, url: &str) -> Option<String> {
    let id = rule.id_patterns.iter().find_map(|pattern| {
        let caps = pattern.captures(url)?;
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|s| !s.is_empty())
    })?;

    Some(if rule.uppercase_id {
        id.to_ascii_uppercase()
    } else {
        id.to_string()
    })
}
