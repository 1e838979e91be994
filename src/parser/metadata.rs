//! Page-level metadata extraction from full HTML documents.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("title selector is valid")
});

static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("description selector is valid")
});

// Tried in order; a combined selector would yield ancestors first.
static MAIN_CANDIDATES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["main", "article", "body"]
        .iter()
        .map(|css| Selector::parse(css).expect("main-content selector is valid"))
        .collect()
});

/// Metadata pulled from a document's head and root element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl PageMetadata {
    /// Extracts metadata from a parsed document.
    ///
    /// Missing pieces come back as `None`; an empty `<title>` counts as
    /// missing.
    pub fn from_document(document: &Html) -> Self {
        let title = document
            .select(&TITLE)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty());

        let description = document
            .select(&META_DESCRIPTION)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|text| !text.is_empty());

        let language = document
            .root_element()
            .value()
            .attr("lang")
            .map(|lang| lang.trim().to_string())
            .filter(|text| !text.is_empty());

        Self {
            title,
            description,
            language,
        }
    }
}

/// Returns the markup of the main content region of a document.
///
/// Prefers `<main>`, then `<article>`, then falls back to `<body>`. Returns
/// the whole input when none match (e.g. a bare fragment).
pub fn main_content(document: &Html) -> String {
    MAIN_CANDIDATES
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| element.inner_html())
        .unwrap_or_else(|| document.html())
}
