use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes for every failure the tag layer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TagErrorCode {
    // Definition-time errors (100-199)
    ConfigurationError = 100,
    ParseError = 101,
    ResourceNotFound = 102,

    // Parse-time errors (200-299)
    SyntaxError = 200,
    ArgumentMissing = 201,

    // Render-time errors (300-399)
    ValidationFailed = 300,
}

impl TagErrorCode {
    /// Returns the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            TagErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            TagErrorCode::ParseError => "PARSE_ERROR",
            TagErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            TagErrorCode::SyntaxError => "SYNTAX_ERROR",
            TagErrorCode::ArgumentMissing => "ARGUMENT_MISSING",
            TagErrorCode::ValidationFailed => "VALIDATION_FAILED",
        }
    }

    /// Returns the standard human-readable message for the error code
    pub fn message(&self) -> &'static str {
        match self {
            TagErrorCode::ConfigurationError => "Configuration error",
            TagErrorCode::ParseError => "Parse error",
            TagErrorCode::ResourceNotFound => "Resource not found",
            TagErrorCode::SyntaxError => "Syntax error",
            TagErrorCode::ArgumentMissing => "Argument missing",
            TagErrorCode::ValidationFailed => "Validation failed",
        }
    }

    /// Returns the numeric error code value
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Whether the error is raised while a tag is being defined rather than used
    pub fn is_definition_time(&self) -> bool {
        (100..200).contains(&self.code())
    }

    /// Looks up a known code by its numeric value
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            100 => Some(TagErrorCode::ConfigurationError),
            101 => Some(TagErrorCode::ParseError),
            102 => Some(TagErrorCode::ResourceNotFound),
            200 => Some(TagErrorCode::SyntaxError),
            201 => Some(TagErrorCode::ArgumentMissing),
            300 => Some(TagErrorCode::ValidationFailed),
            _ => None,
        }
    }
}

impl fmt::Display for TagErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
