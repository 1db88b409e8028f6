use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Index;

/// Cleaned argument values of one tag invocation, keyed by argument name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TagData {
    values: BTreeMap<String, Value>,
}

impl TagData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// True only for a present `true`; absent flags read as false
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl Index<&str> for TagData {
    type Output = Value;

    /// Panics when no argument of that name was bound
    fn index(&self, name: &str) -> &Value {
        match self.values.get(name) {
            Some(value) => value,
            None => panic!("no argument named '{}'", name),
        }
    }
}

impl FromIterator<(String, Value)> for TagData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut data = TagData::new();
        data.insert("limit", Value::from(5));
        data.insert("name", Value::from("alice"));
        data.insert("flag", Value::Bool(true));

        assert_eq!(data.integer("limit"), Some(5));
        assert_eq!(data.string("name"), Some("alice"));
        assert!(data.flag("flag"));
        assert!(!data.flag("other"));
        assert_eq!(data["limit"], Value::Integer(5));
        assert_eq!(data.len(), 3);
        assert_eq!(
            data.to_json(),
            serde_json::json!({"flag": true, "limit": 5, "name": "alice"})
        );
    }

    #[test]
    #[should_panic(expected = "no argument named 'missing'")]
    fn test_index_missing_panics() {
        let data = TagData::new();
        let _ = &data["missing"];
    }
}
