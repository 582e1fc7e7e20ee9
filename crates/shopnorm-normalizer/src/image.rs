use shopnorm_core::PlatformId;

use crate::rules::{PlatformRule, PlatformTable};

/// Rewrites a CDN image URL to its largest variant and strips the query and
/// fragment.
///
/// Protocol-relative URLs gain `https:`. Blank input and `data:` URIs yield
/// an empty string, which callers drop.
#[must_use]
pub fn normalize_image_url(url: &str, platform: PlatformId) -> String {
    normalize_image_url_with(PlatformTable::builtin().rule(platform), url)
}

/// Like [`normalize_image_url`], against an explicit rule.
#[must_use]
pub fn normalize_image_url_with(rule: &PlatformRule, url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || is_data_uri(trimmed) {
        return String::new();
    }

    let absolute = match trimmed.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => trimmed.to_string(),
    };

    let mut rewritten = strip_query_and_fragment(&absolute).to_string();
    for rewrite in &rule.image_rewrites {
        rewritten = rewrite.apply(&rewritten).into_owned();
    }

    // Override replacements are validated, but never let one reintroduce a query.
    strip_query_and_fragment(&rewritten).to_string()
}

fn is_data_uri(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}
