use shopnorm_core::PlatformId;
use url::Url;

use crate::rules::{PlatformTable, HOST_MARKERS};

/// Identifies the source platform of a product URL using the built-in table.
///
/// Never fails: malformed URLs and unrecognized hosts yield
/// [`PlatformId::Unknown`].
#[must_use]
pub fn detect_platform(url: &str) -> PlatformId {
    detect_platform_with(PlatformTable::builtin(), url)
}

/// Like [`detect_platform`], but consults `table` for Shopify storefronts.
#[must_use]
pub fn detect_platform_with(table: &PlatformTable, url: &str) -> PlatformId {
    let Some(host) = parse_host(url) else {
        tracing::debug!(url, "could not parse host; platform unknown");
        return PlatformId::Unknown;
    };

    if let Some((_, platform)) = HOST_MARKERS
        .iter()
        .find(|(marker, _)| host.contains(*marker))
    {
        return *platform;
    }

    if table.is_shopify_host(&host) {
        return PlatformId::Shopify;
    }

    PlatformId::Unknown
}

/// Lower-cased hostname of `url` without a trailing dot, `None` for
/// unparseable URLs and URLs without a host.
pub(crate) fn parse_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}
