use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One node of an issue-tracker rich-text document
///
/// Documents arrive as arbitrary JSON. Objects become [`ContentNode::Object`],
/// arrays become [`ContentNode::List`], and every other value is a
/// [`ContentNode::Scalar`] that contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Object(ObjectNode),
    List(Vec<ContentNode>),
    Scalar,
}

/// A typed document node such as a paragraph, text run or inline card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectNode {
    /// The `type` tag, e.g. `paragraph`, `text`, `inlineCard`
    pub node_type: Option<String>,

    /// Literal text carried by the node itself
    pub text: Option<String>,

    /// Child nodes in document order
    pub content: Vec<ContentNode>,

    /// String-valued attributes
    pub attrs: BTreeMap<String, String>,

    /// Formatting marks applied to the node
    pub marks: Vec<Mark>,
}

/// A formatting annotation on a node, e.g. a hyperlink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mark {
    pub mark_type: Option<String>,
    pub attrs: BTreeMap<String, String>,
}

impl From<&Value> for ContentNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(ObjectNode::from(map)),
            Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            _ => Self::Scalar,
        }
    }
}

impl From<&Map<String, Value>> for ObjectNode {
    fn from(map: &Map<String, Value>) -> Self {
        // A `content` that is not a list is ignored rather than walked
        let content = match map.get("content") {
            Some(Value::Array(items)) => items.iter().map(ContentNode::from).collect(),
            _ => Vec::new(),
        };

        let marks = match map.get("marks") {
            Some(Value::Array(marks)) => marks
                .iter()
                .filter_map(Value::as_object)
                .map(|mark| Mark {
                    mark_type: string_field(mark, "type"),
                    attrs: string_attrs(mark),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            node_type: string_field(map, "type"),
            text: string_field(map, "text"),
            content,
            attrs: string_attrs(map),
            marks,
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_attrs(map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.get("attrs")
        .and_then(Value::as_object)
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}
