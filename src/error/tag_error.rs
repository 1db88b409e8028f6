use crate::error::TagErrorCode;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure raised while defining, binding or cleaning tag arguments
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagError {
    /// Invalid declaration, detected when the argument or tag is defined
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A resolved value failed its argument's domain constraint
    #[error("Value for '{argument}' {details} (got {value})")]
    Validation {
        argument: String,
        value: String,
        details: String,
    },

    /// A required argument was omitted or could not be resolved at all
    #[error("'{argument}' argument to '{tag}' is required")]
    ArgumentMissing { tag: String, argument: String },

    /// The raw arguments handed over by the parser do not fit the tag
    #[error("'{tag}' {details}")]
    Syntax { tag: String, details: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl TagError {
    pub fn configuration<S: Into<String>>(details: S) -> Self {
        TagError::Configuration(details.into())
    }

    /// Creates a validation error naming the argument and the offending value
    pub fn validation<A, D>(argument: A, value: &Value, details: D) -> Self
    where
        A: Into<String>,
        D: Into<String>,
    {
        TagError::Validation {
            argument: argument.into(),
            value: value.repr(),
            details: details.into(),
        }
    }

    pub fn missing<T: Into<String>, A: Into<String>>(tag: T, argument: A) -> Self {
        TagError::ArgumentMissing {
            tag: tag.into(),
            argument: argument.into(),
        }
    }

    pub fn syntax<T: Into<String>, D: Into<String>>(tag: T, details: D) -> Self {
        TagError::Syntax {
            tag: tag.into(),
            details: details.into(),
        }
    }

    /// Returns the stable error code for this error
    pub fn code(&self) -> TagErrorCode {
        match self {
            TagError::Configuration(_) => TagErrorCode::ConfigurationError,
            TagError::Validation { .. } => TagErrorCode::ValidationFailed,
            TagError::ArgumentMissing { .. } => TagErrorCode::ArgumentMissing,
            TagError::Syntax { .. } => TagErrorCode::SyntaxError,
            TagError::Parse(_) => TagErrorCode::ParseError,
            TagError::Io(_) => TagErrorCode::ResourceNotFound,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TagError::Validation { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, TagError::Configuration(_))
    }

    /// Argument the error refers to, if any
    pub fn argument(&self) -> Option<&str> {
        match self {
            TagError::Validation { argument, .. } | TagError::ArgumentMissing { argument, .. } => {
                Some(argument)
            }
            _ => None,
        }
    }

    /// Structured report used by the command line front end
    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code().code(),
            "kind": self.code().as_str(),
            "message": self.to_string(),
        })
    }
}

impl From<std::io::Error> for TagError {
    fn from(error: std::io::Error) -> Self {
        TagError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for TagError {
    fn from(error: serde_json::Error) -> Self {
        TagError::Parse(error.to_string())
    }
}

impl From<regex::Error> for TagError {
    fn from(error: regex::Error) -> Self {
        TagError::Configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_argument_and_value() {
        let error = TagError::validation("age", &Value::from("7b"), "must be an integer");
        assert_eq!(error.to_string(), "Value for 'age' must be an integer (got '7b')");
        assert_eq!(error.code(), TagErrorCode::ValidationFailed);
        assert_eq!(error.argument(), Some("age"));
        assert!(error.is_validation());
    }

    #[test]
    fn test_missing_and_syntax_messages() {
        let missing = TagError::missing("keyword_no_default", "limit");
        assert_eq!(
            missing.to_string(),
            "'limit' argument to 'keyword_no_default' is required"
        );

        let syntax = TagError::syntax("no_argument", "does not take argument 'limit'");
        assert_eq!(syntax.to_string(), "'no_argument' does not take argument 'limit'");
        assert_eq!(syntax.argument(), None);
    }

    #[test]
    fn test_report_shape() {
        let report = TagError::configuration("A 'model' option is required").report();
        assert_eq!(report["code"], 100);
        assert_eq!(report["kind"], "CONFIGURATION_ERROR");
    }
}
