//! Structure-preserving extraction of HTML content.
//!
//! Arbitrary HTML is reduced to a small vocabulary of semantic tags
//! ([`KEEP_TAGS`]); everything else is unwrapped so its text survives while
//! the markup noise does not. Attributes are dropped, whitespace and Unicode
//! oddities (zero-width spaces, typographic spaces, BOMs) are normalized so
//! downstream segmentation sees clean, predictable text.

use std::sync::LazyLock;

use regex::Regex;
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

use crate::types::IngestError;

/// Tags that survive extraction (re-emitted without attributes).
pub const KEEP_TAGS: [&str; 14] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "table", "tr", "td", "th",
];

/// Block-level tags that get a trailing newline after their close tag.
pub const BLOCK_TAGS: [&str; 10] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "table",
];

static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n+").expect("newline-run pattern is valid")
});

static LINE_EDGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s+|\s+$").expect("line-edge pattern is valid")
});

static LIST_ITEMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<li>(.+?)</li>").expect("list-item pattern is valid")
});

static DIV_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<div[^>]*>|</div>").expect("div pattern is valid")
});

static UNICODE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}]")
        .expect("separator class is valid")
});

static FORMAT_CONTROLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x9F\u{200B}-\u{200F}\u{202A}-\u{202E}\u{FEFF}]")
        .expect("control class is valid")
});

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" +").expect("space-run pattern is valid")
});

static DEFAULT_BLOCK_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    block_break_regex(&BLOCK_TAGS).expect("default block tags form a valid pattern")
});

fn block_break_regex(block_tags: &[&str]) -> Result<Regex, IngestError> {
    let alternation = block_tags
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?s)(<(?:{alternation})[^>]*>)(.+?)(</(?:{alternation})>)"
    ))
    .map_err(|err| IngestError::Parse(err.to_string()))
}

/// Parser that converts HTML into cleaned, structure-preserving text.
///
/// Stateless; a single instance can be shared freely.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructureParser;

impl StructureParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts content from an HTML fragment, keeping only [`KEEP_TAGS`].
    ///
    /// Kept elements lose all attributes; every other element is unwrapped in
    /// place so its children survive. The serialized result is run through
    /// [`clean`](Self::clean) and trimmed. Plain text passes through intact,
    /// and empty input yields an empty string.
    pub fn extract(&self, fragment: &str) -> Result<String, IngestError> {
        let dom = Html::parse_fragment(fragment);
        let mut raw = String::new();
        serialize_kept(*dom.root_element(), &mut raw);
        let cleaned = self.clean(&raw, &BLOCK_TAGS)?;
        Ok(cleaned.trim().to_string())
    }

    /// Normalizes an HTML string: newline handling, per-line trimming,
    /// newlines after block elements and list items, `<div>` removal, and
    /// Unicode space/control cleanup.
    ///
    /// The passes run in a fixed order; reordering them changes the output
    /// (e.g. separator mapping must precede space collapsing).
    pub fn clean(&self, html: &str, block_tags: &[&str]) -> Result<String, IngestError> {
        let block_breaks = if block_tags == BLOCK_TAGS.as_slice() {
            None
        } else {
            Some(block_break_regex(block_tags)?)
        };
        let block_breaks = block_breaks.as_ref().unwrap_or_else(|| &*DEFAULT_BLOCK_BREAKS);

        let html = NEWLINE_RUNS.replace_all(html, "\n");
        let html = LINE_EDGES.replace_all(&html, "");
        let html = block_breaks.replace_all(&html, "${1}${2}${3}\n");
        let html = LIST_ITEMS.replace_all(&html, "<li>${1}</li>\n");
        let html = DIV_TAGS.replace_all(&html, "");
        let html = NEWLINE_RUNS.replace_all(&html, "\n");
        let html = UNICODE_SEPARATORS.replace_all(&html, " ");
        let html = FORMAT_CONTROLS.replace_all(&html, "");
        let html = SPACE_RUNS.replace_all(&html, " ");
        Ok(html.into_owned())
    }
}

/// Serializes the children of `node`, emitting kept tags without attributes
/// and unwrapping everything else. Comments and doctypes are dropped.
fn serialize_kept(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => escape_text(&text, out),
            Node::Element(element) => {
                let name = element.name();
                if KEEP_TAGS.contains(&name) {
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                    serialize_kept(child, out);
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                } else {
                    serialize_kept(child, out);
                }
            }
            _ => {}
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
