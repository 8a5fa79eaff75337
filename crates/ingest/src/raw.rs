//! The as-exported, schema-variable record, prior to normalization.
//!
//! Export tools have cycled through several field-naming conventions over
//! the years (dash-separated, underscore-separated, and a few one-off
//! spellings). Every canonical field therefore carries an explicit, ordered
//! alias list, and the first key present with a non-empty value wins. That
//! resolution happens *here*, once — nothing downstream is allowed to
//! branch on a raw key spelling.

use serde_json::{Map, Value};

/// A weakly-typed bag of optional fields. Ephemeral; exists only while a
/// record flows through normalization, though the session layer retains it
/// alongside the canonical post for introspection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a parsed JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    fn is_empty_value(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            _ => false,
        }
    }

    /// First alias present with a non-empty value.
    pub fn first(&self, aliases: &[&str]) -> Option<&Value> {
        aliases.iter().filter_map(|key| self.0.get(*key)).find(|v| !Self::is_empty_value(v))
    }

    /// First alias holding a non-empty string.
    pub fn text(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
    }

    /// First alias holding a non-empty array.
    pub fn array(&self, aliases: &[&str]) -> Option<&Vec<Value>> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(Value::as_array)
            .find(|a| !a.is_empty())
    }

    /// The record's own id. Arrives as a string in most exports and a bare
    /// number in a few old ones.
    pub fn id(&self) -> Option<String> {
        match self.first(&["id"])? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First alias holding a non-empty array, flattened to its string items.
    pub fn text_list(&self, aliases: &[&str]) -> Vec<String> {
        self.array(aliases)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }
}
