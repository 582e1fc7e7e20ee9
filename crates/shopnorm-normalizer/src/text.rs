use std::sync::LazyLock;

use regex::Regex;

/// Titles longer than this are cut and suffixed with `...`.
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strips markup, decodes common entities, collapses whitespace, and caps the
/// length at [`MAX_TITLE_CHARS`].
#[must_use]
pub fn clean_title(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = decode_entities(&without_tags);
    let collapsed = collapse_whitespace(&decoded);
    truncate_chars(&collapsed, MAX_TITLE_CHARS)
}

/// Removes `<script>`/`<style>` blocks and collapses whitespace. Other markup
/// is kept for the storefront.
#[must_use]
pub fn clean_description(raw: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(raw, "");
    let collapsed = collapse_whitespace(&without_scripts);
    truncate_chars(&collapsed, MAX_DESCRIPTION_CHARS)
}

/// Plain single-line text, used for brand names.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, " ");
    collapse_whitespace(&decode_entities(&without_tags))
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Cuts to at most `max` chars, ending in `...` when anything was removed.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_title_strips_tags_and_entities() {
        assert_eq!(
            clean_title("  <b>Echo Dot</b>&nbsp;(4th Gen) &amp; Clock\n"),
            "Echo Dot (4th Gen) & Clock"
        );
    }

    #[test]
    fn clean_title_truncates_long_titles() {
        let long = "word ".repeat(100);
        let title = clean_title(&long);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn clean_title_counts_chars_not_bytes() {
        let title = "é".repeat(MAX_TITLE_CHARS);
        assert_eq!(clean_title(&title), title);
    }

    #[test]
    fn clean_description_removes_scripts_and_styles() {
        let html = "<p>Soft cotton.</p><script>alert('x')</script><STYLE>p{}</STYLE>\n\n<p>Machine wash.</p>";
        assert_eq!(clean_description(html), "<p>Soft cotton.</p> <p>Machine wash.</p>");
    }

    #[test]
    fn clean_description_caps_length() {
        let long = "a".repeat(MAX_DESCRIPTION_CHARS + 50);
        let out = clean_description(&long);
        assert_eq!(out.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn clean_text_is_single_line() {
        assert_eq!(clean_text("  Apple\n Inc. "), "Apple Inc.");
    }
}
