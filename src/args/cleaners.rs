use crate::args::ModelInstanceArg;
use crate::error::{Result, TagError};
use crate::value::{ModelClass, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Domain-specific validation and conversion of one resolved value.
///
/// Implementations must not look at the `multi`/`null` options; those gates
/// belong to [`Arg::base_clean`](crate::args::Arg::base_clean), which never
/// calls `clean` for a bypassed empty value.
pub trait Cleaner: fmt::Debug + Send + Sync {
    /// Name of the accepted domain, used in logs and manifests
    fn type_name(&self) -> &'static str;

    /// Validate `value` for the argument `name`, returning its canonical form
    fn clean(&self, name: &str, value: Value) -> Result<Value>;
}

/// Accepts any value unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicArg;

impl Cleaner for BasicArg {
    fn type_name(&self) -> &'static str {
        "basic"
    }

    fn clean(&self, _name: &str, value: Value) -> Result<Value> {
        Ok(value)
    }
}

/// Boolean values only; the cleaner behind flag arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanArg;

impl Cleaner for BooleanArg {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::Bool(_) => Ok(value),
            other => Err(TagError::validation(name, &other, "must be a boolean")),
        }
    }
}

/// Integers, or anything that converts to one with standard integer parsing
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerArg;

impl Cleaner for IntegerArg {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::Integer(_) => Ok(value),
            Value::String(ref text) => match text.trim().parse::<i64>() {
                Ok(parsed) => Ok(Value::Integer(parsed)),
                Err(_) => Err(TagError::validation(name, &value, "must be an integer")),
            },
            // Truncates toward zero, as integer conversion of a float does.
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
            Value::Float(f) if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() < i64::MAX as f64 => {
                Ok(Value::Integer(f.trunc() as i64))
            }
            other => Err(TagError::validation(name, &other, "must be an integer")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringArg;

impl Cleaner for StringArg {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::String(_) => Ok(value),
            other => Err(TagError::validation(name, &other, "must be a string")),
        }
    }
}

/// Pure dates; a date-time is rejected
#[derive(Debug, Clone, Copy, Default)]
pub struct DateArg;

impl Cleaner for DateArg {
    fn type_name(&self) -> &'static str {
        "date"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::Date(_) => Ok(value),
            other => Err(TagError::validation(name, &other, "must be a date")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeArg;

impl Cleaner for TimeArg {
    fn type_name(&self) -> &'static str {
        "time"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::Time(_) => Ok(value),
            other => Err(TagError::validation(name, &other, "must be a time")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeArg;

impl Cleaner for DateTimeArg {
    fn type_name(&self) -> &'static str {
        "datetime"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::DateTime(_) => Ok(value),
            other => Err(TagError::validation(name, &other, "must be a datetime")),
        }
    }
}

/// The closed set of value domains an argument can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    #[default]
    Basic,
    Boolean,
    Integer,
    String,
    Date,
    Time,
    #[serde(rename = "datetime")]
    DateTime,
    ModelInstance,
}

impl ValueDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueDomain::Basic => "basic",
            ValueDomain::Boolean => "boolean",
            ValueDomain::Integer => "integer",
            ValueDomain::String => "string",
            ValueDomain::Date => "date",
            ValueDomain::Time => "time",
            ValueDomain::DateTime => "datetime",
            ValueDomain::ModelInstance => "model_instance",
        }
    }

    /// Build the cleaner for this domain; only model instances take a model
    pub fn cleaner(&self, model: Option<Arc<ModelClass>>) -> Result<Arc<dyn Cleaner>> {
        if let (Some(model), false) = (&model, *self == ValueDomain::ModelInstance) {
            return Err(TagError::configuration(format!(
                "'model' ({}) only applies to model_instance arguments, not {}",
                model,
                self.as_str()
            )));
        }
        let cleaner: Arc<dyn Cleaner> = match self {
            ValueDomain::Basic => Arc::new(BasicArg),
            ValueDomain::Boolean => Arc::new(BooleanArg),
            ValueDomain::Integer => Arc::new(IntegerArg),
            ValueDomain::String => Arc::new(StringArg),
            ValueDomain::Date => Arc::new(DateArg),
            ValueDomain::Time => Arc::new(TimeArg),
            ValueDomain::DateTime => Arc::new(DateTimeArg),
            ValueDomain::ModelInstance => Arc::new(ModelInstanceArg::new(model)?),
        };
        Ok(cleaner)
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
