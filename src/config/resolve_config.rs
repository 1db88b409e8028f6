/// Configuration for turning raw tag tokens into values
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveConfig {
    /// Treat unquoted numbers as literals instead of variable names (Default: true)
    pub numeric_literals: bool,

    /// Maximum number of items a `multi` argument may carry (Default: 100)
    pub max_multi_items: usize,

    /// Value substituted for variables that cannot be resolved on optional
    /// arguments; `None` resolves them to the empty value (Default: None)
    pub string_if_invalid: Option<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            numeric_literals: true,
            max_multi_items: 100,
            string_if_invalid: None,
        }
    }
}

impl ResolveConfig {
    /// Create a new configuration with all default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Tight limits for templates written by untrusted authors
    pub fn strict() -> Self {
        Self {
            numeric_literals: true,
            max_multi_items: 16,
            string_if_invalid: None,
        }
    }

    /// Generous limits; every token that is not quoted is a variable name
    pub fn lenient() -> Self {
        Self {
            numeric_literals: false,
            max_multi_items: 10_000,
            string_if_invalid: Some(String::new()),
        }
    }

    pub fn with_string_if_invalid<S: Into<String>>(mut self, value: S) -> Self {
        self.string_if_invalid = Some(value.into());
        self
    }

    pub fn with_max_multi_items(mut self, max: usize) -> Self {
        self.max_multi_items = max;
        self
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_multi_items == 0 {
            return Err("max_multi_items must be greater than 0".to_string());
        }

        if let Some(ref invalid) = self.string_if_invalid {
            if invalid.len() > 1024 {
                return Err("string_if_invalid must be at most 1024 bytes".to_string());
            }
        }

        Ok(())
    }
}
