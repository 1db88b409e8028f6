use crate::args::Arg;
use crate::config::ResolveConfig;
use crate::error::{Result, TagError};
use crate::resolve::Resolver;
use crate::value::Value;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// One item of a comma separated list; quoted items may contain commas
static MULTI_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"[^\s",]*"(?:[^"\\]*(?:\\.[^"\\]*)*)"[^\s,]*|[^\s',]*'(?:[^'\\]*(?:\\.[^'\\]*)*)'[^\s,]*|[^\s,]+"#,
    )
    .unwrap()
});

static DOUBLE_QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)"$"#).unwrap());
static SINGLE_QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^'((?:[^'\\]|\\.)*)'$").unwrap());
static ESCAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(.)").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+$").unwrap());
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+\.\d+$").unwrap());

/// Raw, unresolved value of one argument, as split out by the tag parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A single token; `multi` arguments split it on commas outside quotes
    Token(String),
    /// Tokens the parser already split apart
    Tokens(Vec<String>),
}

impl RawValue {
    pub fn token<S: Into<String>>(token: S) -> Self {
        RawValue::Token(token.into())
    }

    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawValue::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for RawValue {
    fn from(token: &str) -> Self {
        RawValue::Token(token.to_string())
    }
}

/// Resolves raw tokens for a given argument
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    config: ResolveConfig,
}

impl TokenResolver {
    pub fn new(config: ResolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Split a comma separated token, keeping quoted items whole
    pub fn split_multi(token: &str) -> Vec<String> {
        MULTI_ITEM_RE
            .find_iter(token)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// The value of `token` if it is a literal rather than a variable name
    pub fn literal(&self, token: &str) -> Option<Value> {
        let quoted = DOUBLE_QUOTED_RE
            .captures(token)
            .or_else(|| SINGLE_QUOTED_RE.captures(token));
        if let Some(captures) = quoted {
            return Some(Value::String(ESCAPE_RE.replace_all(&captures[1], "$1").into_owned()));
        }

        if self.config.numeric_literals {
            if INTEGER_RE.is_match(token) {
                // Out-of-range integers fall back to floats
                return Some(
                    token
                        .parse::<i64>()
                        .map(Value::Integer)
                        .unwrap_or_else(|_| Value::Float(token.parse::<f64>().unwrap_or(f64::INFINITY))),
                );
            }
            if FLOAT_RE.is_match(token) {
                return token.parse::<f64>().ok().map(Value::Float);
            }
        }
        None
    }

    /// Resolve one token; `None` when it names a variable the context lacks
    pub fn resolve_token(&self, arg: &Arg, token: &str, context: &dyn Resolver) -> Option<Value> {
        if !arg.resolves() {
            return Some(Value::String(token.to_string()));
        }
        if let Some(value) = self.literal(token) {
            return Some(value);
        }
        let resolved = context.resolve(token);
        debug!(
            "Variable '{}' for '{}' resolved: {}",
            token,
            arg.display_name(),
            resolved.is_some()
        );
        resolved
    }

    /// Resolve the raw value of `arg` on the tag `tag`.
    ///
    /// A variable that cannot be resolved is an [`TagError::ArgumentMissing`]
    /// for required arguments; otherwise it becomes `string_if_invalid` or
    /// the empty value.
    pub fn resolve_value(
        &self,
        tag: &str,
        arg: &Arg,
        raw: &RawValue,
        context: &dyn Resolver,
    ) -> Result<Value> {
        let items = match raw {
            RawValue::Token(token) if arg.is_multi() => Self::split_multi(token),
            RawValue::Token(token) => return self.resolve_item(tag, arg, token, context),
            RawValue::Tokens(tokens) => tokens.clone(),
        };

        // Single value arguments reject any list later, in `base_clean`
        if arg.is_multi() && items.len() > self.config.max_multi_items {
            return Err(TagError::validation(
                arg.display_name(),
                &Value::String(format!("{} items", items.len())),
                format!("must have at most {} items", self.config.max_multi_items),
            ));
        }

        // A single item is a plain value, not a one-element list
        if let (RawValue::Token(_), [single]) = (raw, items.as_slice()) {
            return self.resolve_item(tag, arg, single, context);
        }

        items
            .iter()
            .map(|item| self.resolve_item(tag, arg, item, context))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn resolve_item(&self, tag: &str, arg: &Arg, token: &str, context: &dyn Resolver) -> Result<Value> {
        match self.resolve_token(arg, token, context) {
            Some(value) => Ok(value),
            None if arg.is_required() => Err(TagError::missing(tag, arg.display_name())),
            None => Ok(self
                .config
                .string_if_invalid
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Empty)),
        }
    }
}
