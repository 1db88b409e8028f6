use crate::error::{Result, TagError};
use crate::value::{ModelInstance, ModelRegistry};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::json;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A runtime value produced by resolving a tag token against a render context
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// "No value present", distinct from any present value
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// Ordered sequence, as produced by `multi` arguments
    List(Vec<Value>),
    Model(ModelInstance),
}

/// Discriminant of a [`Value`], used in messages and manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Bool,
    Integer,
    Float,
    String,
    Date,
    Time,
    DateTime,
    List,
    Model,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Empty => "empty",
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "datetime",
            ValueKind::List => "list",
            ValueKind::Model => "model instance",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::List(_) => ValueKind::List,
            Value::Model(_) => ValueKind::Model,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            Value::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// Debug-style rendering used in error messages: strings are quoted
    pub fn repr(&self) -> String {
        match self {
            Value::Empty => "<empty>".to_string(),
            Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            Value::List(items) => format!(
                "[{}]",
                items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
            ),
            Value::Model(instance) => format!("<{}: {}>", instance.class().name(), instance),
            other => other.to_string(),
        }
    }

    /// Converts into plain JSON; dates and times become ISO-style strings
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Empty => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Integer(i) => json!(i),
            Value::Float(f) => json!(f),
            Value::String(s) => json!(s),
            Value::Date(d) => json!(d.format(DATE_FORMAT).to_string()),
            Value::Time(t) => json!(t.format(TIME_FORMAT).to_string()),
            Value::DateTime(dt) => json!(dt.format(DATETIME_FORMAT).to_string()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Model(instance) => json!({
                "model": instance.class().label(),
                "pk": instance.pk(),
                "fields": instance.fields(),
            }),
        }
    }

    /// Builds a value from JSON context data.
    ///
    /// Plain JSON maps onto the obvious variants (`null` is [`Value::Empty`]).
    /// Objects must carry a `$type` tag of `date`, `time`, `datetime` or
    /// `model`; model objects name a class registered in `registry`.
    pub fn from_json(json: &serde_json::Value, registry: &ModelRegistry) -> Result<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Empty),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| TagError::Parse(format!("unsupported number {}", n)))
                }
            }
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| Value::from_json(item, registry))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(map) => {
                let tag = map.get("$type").and_then(|t| t.as_str()).ok_or_else(|| {
                    TagError::Parse("object values need a '$type' of date, time, datetime or model".to_string())
                })?;
                let text = || {
                    map.get("value")
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| TagError::Parse(format!("'{}' value needs a string 'value'", tag)))
                };
                match tag {
                    "date" => NaiveDate::parse_from_str(text()?, DATE_FORMAT)
                        .map(Value::Date)
                        .map_err(|e| TagError::Parse(format!("invalid date: {}", e))),
                    "time" => NaiveTime::parse_from_str(text()?, TIME_FORMAT)
                        .map(Value::Time)
                        .map_err(|e| TagError::Parse(format!("invalid time: {}", e))),
                    "datetime" => {
                        let raw = text()?;
                        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
                            .map(Value::DateTime)
                            .map_err(|e| TagError::Parse(format!("invalid datetime: {}", e)))
                    }
                    "model" => {
                        let label = map.get("model").and_then(|m| m.as_str()).ok_or_else(|| {
                            TagError::Parse("model values need a 'model' label".to_string())
                        })?;
                        let class = registry
                            .get(label)
                            .ok_or_else(|| TagError::Parse(format!("unknown model '{}'", label)))?;
                        let mut instance = ModelInstance::new(class);
                        if let Some(pk) = map.get("pk").and_then(|pk| pk.as_i64()) {
                            instance = instance.with_pk(pk);
                        }
                        if let Some(fields) = map.get("fields").and_then(|f| f.as_object()) {
                            for (name, value) in fields {
                                instance = instance.with_field(name.clone(), value.clone());
                            }
                        }
                        if let Some(display) = map.get("display").and_then(|d| d.as_str()) {
                            instance = instance.with_display(display);
                        }
                        Ok(Value::Model(instance))
                    }
                    other => Err(TagError::Parse(format!("unsupported value type '{}'", other))),
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                f.write_str(&rendered.join(", "))
            }
            Value::Model(instance) => write!(f, "{}", instance),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ModelInstance> for Value {
    fn from(instance: ModelInstance) -> Self {
        Value::Model(instance)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Empty)
    }
}
