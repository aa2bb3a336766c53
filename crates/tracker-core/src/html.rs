//! Legacy HTML description cleanup.
//!
//! Older work items store their description as an HTML fragment instead of a
//! block tree. This pass reduces the fragment to plain markdown-ish text.

use regex::Regex;
use std::sync::OnceLock;

static IMG_RE: OnceLock<Regex> = OnceLock::new();
static BREAK_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn img_re() -> &'static Regex {
    IMG_RE.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']?([^"'\s>]*)["']?[^>]*>"#).unwrap()
    })
}

fn break_re() -> &'static Regex {
    BREAK_RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p\s*>").unwrap())
}

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn blank_run_re() -> &'static Regex {
    BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Convert an HTML fragment to plain text.
///
/// Images become `[image](src)` markers, `<br>` and `</p>` become newlines,
/// every other tag is dropped, and the `&nbsp; &lt; &gt; &amp;` entities are
/// decoded. Runs of three or more newlines collapse to a blank line and the
/// result is trimmed.
pub fn sanitize_html(html: &str) -> String {
    let text = img_re().replace_all(html, "[image]($1)");
    let text = break_re().replace_all(&text, "\n");
    let text = tag_re().replace_all(&text, "");
    // &amp; last so that "&amp;lt;" decodes to "&lt;" rather than "<".
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    let text = text.replace("\r\n", "\n");
    blank_run_re()
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}
