//! Text and link extraction from rich-text documents
//!
//! The issue tracker stores descriptions, comments and some custom fields as
//! nested node trees. This module flattens such a tree into its plain text and
//! the link targets carried by its attributes.

mod node;

pub use node::{ContentNode, Mark, ObjectNode};

/// Node type of inline-card embeds
const INLINE_CARD: &str = "inlineCard";

/// Mark type of hyperlink annotations
const LINK_MARK: &str = "link";

/// Plain text and link targets pulled out of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Text of the node and its descendants, single-space separated
    pub text: String,

    /// Inline-card URLs and link-mark targets in document order
    pub links: Vec<String>,
}

/// Extracts text and links from a document node
///
/// # Traversal
///
/// For an object node:
/// 1. Children in `content`, in order, texts joined by single spaces
/// 2. The node's own `text`
/// 3. `attrs.url` when the node is an inline card
/// 4. `attrs.href` of every `link` mark
///
/// Lists are walked element by element in the same way, and scalars yield
/// nothing. Surrounding whitespace is trimmed at every level.
///
/// # Example
///
/// ```
/// use linkhound::extract::{extract, ContentNode};
/// use serde_json::json;
///
/// let doc = json!({
///     "type": "paragraph",
///     "content": [
///         {"type": "text", "text": "Design doc"},
///         {"type": "inlineCard", "attrs": {"url": "https://docs.google.com/document/d/abc"}}
///     ]
/// });
///
/// let extracted = extract(&ContentNode::from(&doc));
/// assert_eq!(extracted.text, "Design doc");
/// assert_eq!(extracted.links, vec!["https://docs.google.com/document/d/abc"]);
/// ```
pub fn extract(node: &ContentNode) -> Extracted {
    match node {
        ContentNode::Object(obj) => extract_object(obj),
        ContentNode::List(items) => {
            let mut pieces = Vec::with_capacity(items.len());
            let mut links = Vec::new();
            for item in items {
                let child = extract(item);
                pieces.push(child.text);
                links.extend(child.links);
            }
            Extracted {
                text: join_pieces(&pieces),
                links,
            }
        }
        ContentNode::Scalar => Extracted::default(),
    }
}

fn extract_object(obj: &ObjectNode) -> Extracted {
    let mut pieces = Vec::with_capacity(obj.content.len() + 1);
    let mut links = Vec::new();

    for child in &obj.content {
        let child = extract(child);
        pieces.push(child.text);
        links.extend(child.links);
    }

    if let Some(text) = &obj.text {
        pieces.push(text.clone());
    }

    if obj.node_type.as_deref() == Some(INLINE_CARD) {
        if let Some(url) = obj.attrs.get("url") {
            links.push(url.clone());
        }
    }

    for mark in &obj.marks {
        if mark.mark_type.as_deref() != Some(LINK_MARK) {
            continue;
        }
        if let Some(href) = mark.attrs.get("href") {
            links.push(href.clone());
        }
    }

    Extracted {
        text: join_pieces(&pieces),
        links,
    }
}

fn join_pieces(pieces: &[String]) -> String {
    pieces.join(" ").trim().to_string()
}
