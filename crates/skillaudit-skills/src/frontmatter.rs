//! YAML frontmatter extraction
//!
//! A markdown document opens with a `---` line, carries a YAML mapping, and
//! closes it with another `---` line. Everything after the closer is the body.

use crate::error::FrontmatterError;
use serde_yaml::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Keys whose values must be YAML integers
const INTEGER_FIELDS: &[&str] = &["version"];

/// A normalised frontmatter value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `key:` or `key: ~`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// String or non-integer number
    Text(String),
    /// Sequence of scalars
    List(Vec<String>),
    /// Mapping, or a sequence holding non-scalars
    Nested,
}

impl FieldValue {
    fn from_yaml(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Text(n.to_string()),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Sequence(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match scalar_to_string(item) {
                        Some(Some(s)) => list.push(s),
                        Some(None) => {}
                        None => return FieldValue::Nested,
                    }
                }
                FieldValue::List(list)
            }
            Value::Mapping(_) => FieldValue::Nested,
            Value::Tagged(tagged) => FieldValue::from_yaml(&tagged.value),
        }
    }

    /// Short name of the value's shape, for violation messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Text(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Nested => "nested structure",
        }
    }
}

/// `None` for non-scalars, `Some(None)` for null items
fn scalar_to_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::String(s) => Some(Some(s.clone())),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Parsed frontmatter mapping with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: BTreeMap<String, FieldValue>,
}

impl Frontmatter {
    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Whether the key is present, even with a null value
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// All keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Trimmed text value; `None` when absent, blank or not a string
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Integer value, if the key holds one
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Set of strings from either a YAML list or a comma separated string.
    ///
    /// Blank entries are dropped. `None` when the key is absent or holds
    /// another shape.
    pub fn string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        let items: Vec<&str> = match self.fields.get(key)? {
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Text(s) => s.split(',').collect(),
            _ => return None,
        };
        Some(
            items
                .into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the mapping has no keys
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A markdown document split into frontmatter and body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Parsed header mapping
    pub frontmatter: Frontmatter,
    /// Text after the closing `---`
    pub body: String,
}

/// Parse a markdown document's frontmatter and return it with the body
pub fn parse(content: &str) -> Result<Document, FrontmatterError> {
    let (yaml, body) = split(content)?;

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        // Empty or comment-only block
        Value::Null => Default::default(),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    let mut fields = BTreeMap::new();
    for (key, value) in &mapping {
        let key = key.as_str().ok_or(FrontmatterError::NonStringKey)?;
        let value = FieldValue::from_yaml(value);
        coerce(key, &value)?;
        fields.insert(key.to_string(), value);
    }

    Ok(Document {
        frontmatter: Frontmatter { fields },
        body: body.to_string(),
    })
}

fn coerce(key: &str, value: &FieldValue) -> Result<(), FrontmatterError> {
    if INTEGER_FIELDS.contains(&key)
        && !matches!(value, FieldValue::Integer(_) | FieldValue::Null)
    {
        return Err(FrontmatterError::Coercion {
            field: key.to_string(),
            reason: format!("must be an integer, found {}", value.kind()),
        });
    }
    Ok(())
}

/// Split a document into the raw YAML block and the body
fn split(content: &str) -> Result<(&str, &str), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().ok_or(FrontmatterError::Missing)?;
    if first.trim_end() != "---" {
        return Err(FrontmatterError::Missing);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Ok((&content[start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}
