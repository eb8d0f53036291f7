//! Canonical decoding of the XML result payloads
//!
//! Every result string goes through [`normalize`], whatever the endpoint.
//! The decode follows the element-name-keyed reduction the service's
//! ecosystem uses when turning XML into maps:
//!
//! - the root element's content is the top-level value,
//! - each child element becomes a key of a [`Node::Record`],
//! - a tag repeated among siblings becomes a [`Node::List`] of each
//!   occurrence's content, in document order,
//! - an element without child elements becomes a [`Node::Scalar`] holding its
//!   text, or an empty record when it has no text at all.
//!
//! Attributes, comments and whitespace-only text are dropped. An empty
//! payload decodes to an empty record, so each client applies its own
//! absent-field policy to it.
//!
//! A consequence is that one `<Customer>` decodes to a record while two
//! decode to a list. [`Node::as_sequence`] and [`resolve_customer_numbers`]
//! hide that from callers.

use crate::error::{PcsError, Result, ServiceError};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use xmltree::{Element, XMLNode};

/// A decoded response tree
///
/// Serializes untagged: scalars as strings, lists as arrays, records as
/// objects in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(String),
    List(Vec<Node>),
    Record(IndexMap<String, Node>),
}

impl Node {
    /// Field of a record
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Nested lookup through records, e.g. `&["CustomerNumbers", "Customer"]`
    pub fn path(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Number of entries; a scalar counts as one
    pub fn len(&self) -> usize {
        match self {
            Node::Scalar(_) => 1,
            Node::List(items) => items.len(),
            Node::Record(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loose boolean reading of a value
    ///
    /// Empty strings, `"0"`, and empty lists or records are false; anything
    /// else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Scalar(s) => !s.is_empty() && s != "0",
            Node::List(items) => !items.is_empty(),
            Node::Record(fields) => !fields.is_empty(),
        }
    }

    /// The entries of a list, or the node itself as a one-element sequence
    pub fn as_sequence(&self) -> Vec<&Node> {
        match self {
            Node::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    fn from_element(elem: &Element) -> Node {
        let children: Vec<&Element> = elem
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .collect();

        if children.is_empty() {
            let text = element_text(elem);
            return if text.trim().is_empty() {
                Node::Record(IndexMap::new())
            } else {
                Node::Scalar(text)
            };
        }

        let mut fields: IndexMap<String, Node> = IndexMap::new();
        for child in children {
            let value = Node::from_element(child);
            match fields.entry(child.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    // from_element never yields a list, so a list here comes
                    // from an earlier repetition
                    Node::List(items) => items.push(value),
                    existing => {
                        let first = std::mem::replace(existing, Node::List(Vec::new()));
                        *existing = Node::List(vec![first, value]);
                    }
                },
            }
        }

        Node::Record(fields)
    }
}

fn element_text(elem: &Element) -> String {
    elem.children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Text(t) | XMLNode::CData(t) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

/// Decodes a raw XML result string into a [`Node`] tree
///
/// An empty or whitespace-only payload is an empty record; only malformed
/// XML is an error.
pub fn normalize(raw_xml: &str) -> Result<Node> {
    if raw_xml.trim().is_empty() {
        return Ok(Node::Record(IndexMap::new()));
    }

    let root = Element::parse(raw_xml.trim().as_bytes())
        .map_err(|e| PcsError::unexpected_shape(format!("result is not well-formed XML: {}", e)))?;

    Ok(Node::from_element(&root))
}

/// Lower-cases a message, then upper-cases its first character
///
/// `"INVALID USER"` and `"invalid user"` both become `"Invalid user"`.
pub fn format_error_message(message: &str) -> String {
    let lower = message.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sentence-cased `errMsg` of a response, empty when absent
pub(crate) fn error_message(response: &Node) -> String {
    format_error_message(response.get("errMsg").and_then(Node::as_str).unwrap_or_default())
}

/// Customer numbers listed under `CustomerNumbers/Customer`
///
/// A single `<Customer>` and several of them both yield a flat sequence in
/// document order. No entries at all is a service failure carrying the
/// response's `errMsg`.
pub fn resolve_customer_numbers(response: &Node) -> Result<Vec<String>> {
    let customers = match response.path(&["CustomerNumbers", "Customer"]) {
        Some(node) if !node.is_empty() => node,
        _ => return Err(ServiceError::new(error_message(response)).into()),
    };

    customers
        .as_sequence()
        .into_iter()
        .map(|customer| {
            customer
                .get("CustomerNumber")
                .and_then(Node::as_str)
                .map(str::to_string)
                .ok_or_else(|| PcsError::unexpected_shape("Customer entry without CustomerNumber"))
        })
        .collect()
}
