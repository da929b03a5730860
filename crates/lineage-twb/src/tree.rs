//! Access helpers for the decoded attributed tree.
//!
//! The XML decoding itself is an external collaborator: this crate consumes
//! its output, a [`serde_json::Value`] in which elements are objects,
//! repeated elements appear as either a single object or an array, and
//! attributes are distinguished from child elements by a name prefix.

use serde_json::Value;

/// Explicit configuration for reading the attributed tree.
///
/// Passed into the entry point rather than held as module-global state, so
/// two documents decoded under different conventions can be parsed in the
/// same process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Prefix that marks attribute keys (e.g. `@name` vs a `name` child
    /// element).
    pub attribute_prefix: String,
    /// Decode XML entities in formula text before storage.
    pub decode_entities: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            attribute_prefix: "@".to_string(),
            decode_entities: true,
        }
    }
}

/// Human-readable kind name for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read an attribute of `element` as text.
///
/// Strings pass through; numbers and booleans are rendered (decoders commonly
/// leave numeric attributes untyped text, but not always). Structured values
/// are unreadable and yield `None`.
pub(crate) fn attr_text(element: &Value, options: &ParseOptions, name: &str) -> Option<String> {
    let key = format!("{}{}", options.attribute_prefix, name);
    match element.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A single child element, if present and object-shaped.
pub(crate) fn child<'a>(element: &'a Value, name: &str) -> Option<&'a Value> {
    match element.get(name)? {
        // A repeated element decoded as a list: the first entry stands in.
        Value::Array(items) => items.first(),
        value => Some(value),
    }
}

/// Child elements under `name`, normalizing the one-or-many decoding shapes:
/// absent -> empty, single object -> one element, array -> its elements.
pub(crate) fn children<'a>(element: &'a Value, name: &str) -> Vec<&'a Value> {
    match element.get(name) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(value) => vec![value],
    }
}
