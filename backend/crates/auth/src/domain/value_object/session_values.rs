//! Session Values
//!
//! String-keyed scalar attributes carried by a session. The map serializes
//! as a plain JSON object so both stores share one encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single scalar attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for SessionValue {
    fn from(value: bool) -> Self {
        SessionValue::Bool(value)
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        SessionValue::Int(value)
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        SessionValue::Text(value)
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        SessionValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionValues(BTreeMap<String, SessionValue>);

impl SessionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SessionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Some` only when the key holds a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(SessionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// `Some` only when the key holds text
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(SessionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters_are_strict() {
        let mut values = SessionValues::new();
        values.insert("authenticated", true);
        values.insert("visits", 3i64);
        values.insert("user_name", "alice");

        assert_eq!(values.get_bool("authenticated"), Some(true));
        assert_eq!(values.get_bool("user_name"), None);
        assert_eq!(values.get_text("user_name"), Some("alice"));
        assert_eq!(values.get("visits"), Some(&SessionValue::Int(3)));
        assert_eq!(values.get_bool("missing"), None);
    }

    #[test]
    fn test_json_shape() {
        let mut values = SessionValues::new();
        values.insert("authenticated", true);
        values.insert("n", 7i64);
        values.insert("who", "bob");

        assert_eq!(
            values.to_json().unwrap(),
            r#"{"authenticated":true,"n":7,"who":"bob"}"#
        );
        assert_eq!(SessionValues::from_json(&values.to_json().unwrap()).unwrap(), values);
    }

    #[test]
    fn test_rejects_non_scalar_json() {
        assert!(SessionValues::from_json(r#"{"a":[1,2]}"#).is_err());
        assert!(SessionValues::from_json(r#"{"a":null}"#).is_err());
        assert!(SessionValues::from_json("[]").is_err());
    }
}
