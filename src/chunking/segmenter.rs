//! DOM walking that flattens cleaned content into ordered segments.
//!
//! Each segment carries the heading path that was live where it appeared,
//! so chunks can later report their place in the document hierarchy.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

/// What a segment was in the source document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Heading with its level (1-6).
    Heading(u8),
    #[default]
    Paragraph,
    ListItem,
    TableRow,
}

/// One content-bearing unit of the document, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
    /// Heading path at this point, outermost first. Heading segments
    /// include themselves.
    pub heading_path: Vec<String>,
}

/// Segments an HTML fragment (typically the output of
/// [`StructureParser::extract`](crate::parser::StructureParser::extract)).
pub fn segment_fragment(html: &str) -> Vec<Segment> {
    let dom = Html::parse_fragment(html);
    let mut walker = Walker::default();
    walker.walk(*dom.root_element());
    walker.flush_pending();
    walker.segments
}

#[derive(Default)]
struct Walker {
    heading_stack: Vec<(u8, String)>,
    pending: String,
    segments: Vec<Segment>,
}

impl Walker {
    fn path(&self) -> Vec<String> {
        self.heading_stack
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn push_segment(&mut self, text: String, kind: SegmentKind) {
        if !text.is_empty() {
            self.segments.push(Segment {
                text,
                kind,
                heading_path: self.path(),
            });
        }
    }

    /// Turns accumulated loose text (bare text nodes, unwrapped inline
    /// content) into a paragraph segment.
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = collapse_ws(&self.pending);
        self.pending.clear();
        self.push_segment(text, SegmentKind::Paragraph);
    }

    fn walk(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => self.pending.push_str(&text),
                Node::Element(element) => match element.name() {
                    name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                        self.flush_pending();
                        let level = name.as_bytes()[1] - b'0';
                        self.open_heading(level, collapse_ws(&element_text(child)));
                    }
                    "p" => {
                        self.flush_pending();
                        self.push_segment(collapse_ws(&element_text(child)), SegmentKind::Paragraph);
                    }
                    "ul" | "ol" => {
                        self.flush_pending();
                        self.walk_list(child);
                    }
                    "table" => {
                        self.flush_pending();
                        self.walk_table(child);
                    }
                    _ => self.walk(child),
                },
                _ => {}
            }
        }
    }

    fn open_heading(&mut self, level: u8, text: String) {
        while matches!(self.heading_stack.last(), Some((open, _)) if *open >= level) {
            self.heading_stack.pop();
        }
        if text.is_empty() {
            return;
        }
        self.heading_stack.push((level, text.clone()));
        self.push_segment(text, SegmentKind::Heading(level));
    }

    fn walk_list(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            if let Node::Element(element) = child.value() {
                match element.name() {
                    "li" => {
                        // Nested lists flatten into the parent item's text.
                        let text = collapse_ws(&element_text(child));
                        if !text.is_empty() {
                            self.push_segment(format!("- {text}"), SegmentKind::ListItem);
                        }
                    }
                    "ul" | "ol" => self.walk_list(child),
                    _ => {}
                }
            }
        }
    }

    fn walk_table(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            if let Node::Element(element) = child.value() {
                match element.name() {
                    "tr" => self.push_row(child),
                    "thead" | "tbody" | "tfoot" => self.walk_table(child),
                    _ => {}
                }
            }
        }
    }

    fn push_row(&mut self, row: NodeRef<'_, Node>) {
        let mut cells = Vec::new();
        for cell in row.children() {
            if let Node::Element(element) = cell.value() {
                if matches!(element.name(), "td" | "th") {
                    let text = collapse_ws(&element_text(cell));
                    if !text.is_empty() {
                        cells.push(text);
                    }
                }
            }
        }
        if !cells.is_empty() {
            self.push_segment(cells.join(" | "), SegmentKind::TableRow);
        }
    }
}

fn element_text(node: NodeRef<'_, Node>) -> String {
    ElementRef::wrap(node)
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
