use crate::args::{Cleaner, ValueDomain};
use crate::error::{Result, TagError};
use crate::value::{ModelClass, Value};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

/// One declared tag argument: its options and its cleaning rule.
///
/// `name` is where the cleaned value is stored. It is required for
/// positional arguments; keyword arguments fall back to their keyword.
/// `keyword` is the name used in the tag itself and is assigned by the tag
/// the argument is added to.
#[derive(Clone)]
pub struct Arg {
    name: Option<String>,
    keyword: Option<String>,
    required: bool,
    default: Option<Value>,
    null: bool,
    resolve: bool,
    multi: bool,
    flag: bool,
    positional: bool,
    cleaner: Arc<dyn Cleaner>,
}

impl Arg {
    /// Start declaring an argument of the given domain
    pub fn builder(domain: ValueDomain) -> ArgBuilder {
        ArgBuilder::new(domain)
    }

    /// Start declaring an argument cleaned by a custom [`Cleaner`]
    pub fn custom(cleaner: Arc<dyn Cleaner>) -> ArgBuilder {
        ArgBuilder {
            cleaner: Some(cleaner),
            ..ArgBuilder::new(ValueDomain::Basic)
        }
    }

    pub fn basic() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Basic)
    }

    pub fn boolean() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Boolean)
    }

    pub fn integer() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Integer)
    }

    pub fn string() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::String)
    }

    pub fn date() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Date)
    }

    pub fn time() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Time)
    }

    pub fn datetime() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::DateTime)
    }

    /// Model instance argument; `.model(..)` must be supplied before `build`
    pub fn model_instance() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::ModelInstance)
    }

    /// Presence-only keyword argument
    pub fn flag() -> ArgBuilder {
        ArgBuilder::new(ValueDomain::Boolean).flag()
    }

    /// Name the cleaned value is stored under
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Name used in messages: the storage name, else the keyword
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.keyword.as_deref())
            .unwrap_or("<unnamed>")
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.null
    }

    pub fn resolves(&self) -> bool {
        self.resolve
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn is_flag(&self) -> bool {
        self.flag
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn type_name(&self) -> &'static str {
        self.cleaner.type_name()
    }

    /// Assigned while the owning tag is being defined
    pub(crate) fn assign_keyword(&mut self, keyword: &str) {
        self.keyword = Some(keyword.to_string());
        if self.name.is_none() && !keyword.is_empty() {
            self.name = Some(keyword.to_string());
        }
    }

    /// Validation that always takes place.
    ///
    /// Rejects sequences unless the argument is `multi`, lets an empty value
    /// through untouched when `null` is set, and otherwise hands the value to
    /// [`Arg::clean`]. For `multi` arguments each list item goes through the
    /// same gate and the cleaned list keeps its order.
    pub fn base_clean(&self, value: Value) -> Result<Value> {
        let name = self.display_name();
        if value.is_list() && !self.multi {
            return Err(TagError::validation(name, &value, "must be a single item"));
        }
        match value {
            Value::Empty if self.null => {
                debug!("'{}' is empty and nullable, skipping {} cleaning", name, self.type_name());
                Ok(Value::Empty)
            }
            Value::List(items) => items
                .into_iter()
                .map(|item| self.clean_item(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            other => self.clean(other),
        }
    }

    fn clean_item(&self, item: Value) -> Result<Value> {
        match item {
            Value::Empty if self.null => Ok(Value::Empty),
            Value::List(_) => Err(TagError::validation(
                self.display_name(),
                &item,
                "must not contain nested lists",
            )),
            other => self.clean(other),
        }
    }

    /// Domain cleaning only, without the `multi`/`null` gates
    pub fn clean(&self, value: Value) -> Result<Value> {
        let cleaned = self.cleaner.clean(self.display_name(), value)?;
        debug!("Cleaned '{}' as {}: {}", self.display_name(), self.type_name(), cleaned.repr());
        Ok(cleaned)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("name", &self.name)
            .field("keyword", &self.keyword)
            .field("type", &self.cleaner.type_name())
            .field("required", &self.required)
            .field("default", &self.default)
            .field("null", &self.null)
            .field("resolve", &self.resolve)
            .field("multi", &self.multi)
            .field("flag", &self.flag)
            .field("positional", &self.positional)
            .finish()
    }
}

/// Collects an argument's options and checks them together in [`ArgBuilder::build`]
#[derive(Debug, Clone)]
pub struct ArgBuilder {
    domain: ValueDomain,
    cleaner: Option<Arc<dyn Cleaner>>,
    model: Option<Arc<ModelClass>>,
    name: Option<String>,
    label: Option<String>,
    required: Option<bool>,
    default: Option<Value>,
    null: bool,
    resolve: bool,
    multi: bool,
    flag: bool,
    positional: bool,
}

impl ArgBuilder {
    pub fn new(domain: ValueDomain) -> Self {
        Self {
            domain,
            cleaner: None,
            model: None,
            name: None,
            label: None,
            required: None,
            default: None,
            null: false,
            resolve: true,
            multi: false,
            flag: false,
            positional: false,
        }
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name used in declaration errors when no storage name is set
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Mark a positional argument as optional
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn null(mut self) -> Self {
        self.null = true;
        self
    }

    pub fn resolve(mut self, resolve: bool) -> Self {
        self.resolve = resolve;
        self
    }

    /// Treat every token as a literal string
    pub fn literal(self) -> Self {
        self.resolve(false)
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    pub fn flag(mut self) -> Self {
        self.flag = true;
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Model class required by model instance arguments
    pub fn model(mut self, model: Arc<ModelClass>) -> Self {
        self.model = Some(model);
        self
    }

    /// Validate the option combination and produce the immutable [`Arg`]
    pub fn build(self) -> Result<Arg> {
        let label = self
            .name
            .clone()
            .or_else(|| self.label.clone())
            .unwrap_or_else(|| "<unnamed>".to_string());

        if self.required == Some(true) && self.default.is_some() {
            return Err(TagError::configuration(format!(
                "'{}' cannot be both required and have a default",
                label
            )));
        }

        if self.flag {
            if self.positional {
                return Err(TagError::configuration(format!(
                    "flag '{}' cannot be positional",
                    label
                )));
            }
            if self.multi {
                return Err(TagError::configuration(format!(
                    "flag '{}' cannot take multiple values",
                    label
                )));
            }
            if self.required.is_some() || self.default.is_some() {
                return Err(TagError::configuration(format!(
                    "flag '{}' is always optional and defaults to false",
                    label
                )));
            }
            if self.cleaner.is_some() || self.domain != ValueDomain::Boolean {
                return Err(TagError::configuration(format!(
                    "flag '{}' must be boolean, not {}",
                    label, self.domain
                )));
            }
        }

        let cleaner = match self.cleaner {
            Some(cleaner) => {
                if self.model.is_some() {
                    return Err(TagError::configuration(format!(
                        "'model' cannot be combined with a custom cleaner on '{}'",
                        label
                    )));
                }
                cleaner
            }
            None => self.domain.cleaner(self.model).map_err(|e| match e {
                TagError::Configuration(details) => {
                    TagError::configuration(format!("{} (argument '{}')", details, label))
                }
                other => other,
            })?,
        };

        let required = if self.flag {
            false
        } else if self.positional {
            self.required.unwrap_or(self.default.is_none())
        } else {
            self.required.unwrap_or(false)
        };

        if self.null && (required || self.default.is_some()) {
            warn!(
                "'null' on '{}' has no effect: the argument is required or has a default",
                label
            );
        }

        Ok(Arg {
            name: self.name,
            keyword: None,
            required,
            default: self.default,
            null: self.null,
            resolve: self.resolve,
            multi: self.multi,
            flag: self.flag,
            positional: self.positional,
            cleaner,
        })
    }
}
