use crate::args::Arg;
use crate::error::{Result, TagError};
use crate::resolve::{RawValue, Resolver, TokenResolver};
use crate::tag::{TagData, TagSpec};
use crate::value::Value;
use log::debug;
use std::collections::HashSet;

/// Arguments of one tag occurrence as split out by the template parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArgs {
    positional: Vec<RawValue>,
    keywords: Vec<(String, Option<RawValue>)>,
}

impl RawArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<R: Into<RawValue>>(mut self, raw: R) -> Self {
        self.positional.push(raw.into());
        self
    }

    pub fn keyword<K: Into<String>, R: Into<RawValue>>(mut self, keyword: K, raw: R) -> Self {
        self.keywords.push((keyword.into(), Some(raw.into())));
        self
    }

    /// A keyword that appeared without a value
    pub fn flag<K: Into<String>>(mut self, keyword: K) -> Self {
        self.keywords.push((keyword.into(), None));
        self
    }

    pub fn positional_values(&self) -> &[RawValue] {
        &self.positional
    }

    pub fn keyword_values(&self) -> &[(String, Option<RawValue>)] {
        &self.keywords
    }
}

/// Hooks a tag can use to clean values beyond each argument's own rule
pub trait TagHooks {
    /// Runs after the argument named `name` passed its own cleaning
    fn clean_arg(&self, _name: &str, value: Value) -> Result<Value> {
        Ok(value)
    }

    /// Runs once after every argument was cleaned
    fn clean(&self, data: TagData) -> Result<TagData> {
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl TagHooks for NoHooks {}

#[derive(Debug, Clone, PartialEq)]
enum Bound {
    Raw(RawValue),
    Default(Value),
    Flag(bool),
}

/// A tag occurrence whose raw arguments were matched against its [`TagSpec`].
///
/// Binding happens once, when the template is parsed; [`BoundTag::resolve`]
/// runs on every render.
#[derive(Debug, Clone)]
pub struct BoundTag<'a> {
    spec: &'a TagSpec,
    vars: Vec<(&'a Arg, Bound)>,
}

impl TagSpec {
    /// Match raw arguments to the declared ones
    pub fn bind(&self, raw: &RawArgs) -> Result<BoundTag<'_>> {
        let mut vars = Vec::new();

        if raw.positional.len() > self.positional_args().len() {
            return Err(TagError::syntax(
                self.name(),
                format!(
                    "takes at most {} positional arguments (got {})",
                    self.positional_args().len(),
                    raw.positional.len()
                ),
            ));
        }

        for (index, arg) in self.positional_args().iter().enumerate() {
            match raw.positional.get(index) {
                Some(value) => vars.push((arg, Bound::Raw(value.clone()))),
                None => {
                    if let Some(default) = arg.default_value() {
                        vars.push((arg, Bound::Default(default.clone())));
                    } else if arg.is_required() {
                        return Err(TagError::missing(self.name(), arg.display_name()));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for (keyword, value) in &raw.keywords {
            let arg = self.named_arg(keyword).ok_or_else(|| {
                TagError::syntax(self.name(), format!("does not take argument '{}'", keyword))
            })?;
            if !seen.insert(keyword.as_str()) {
                return Err(TagError::syntax(
                    self.name(),
                    format!("received '{}' more than once", keyword),
                ));
            }
            let bound = match (arg.is_flag(), value) {
                (true, None) => Bound::Flag(true),
                (true, Some(_)) => {
                    return Err(TagError::syntax(
                        self.name(),
                        format!("didn't expect a value after '{}'", keyword),
                    ))
                }
                (false, Some(value)) => Bound::Raw(value.clone()),
                (false, None) => {
                    return Err(TagError::syntax(
                        self.name(),
                        format!("expected a value after '{}'", keyword),
                    ))
                }
            };
            vars.push((arg, bound));
        }

        for (keyword, arg) in self.named_args() {
            if seen.contains(keyword.as_str()) {
                continue;
            }
            if arg.is_flag() {
                vars.push((arg, Bound::Flag(false)));
            } else if let Some(default) = arg.default_value() {
                vars.push((arg, Bound::Default(default.clone())));
            } else if arg.is_required() {
                return Err(TagError::missing(self.name(), arg.display_name()));
            }
        }

        debug!("Bound {} arguments for '{}'", vars.len(), self.name());
        Ok(BoundTag { spec: self, vars })
    }
}

impl<'a> BoundTag<'a> {
    pub fn spec(&self) -> &'a TagSpec {
        self.spec
    }

    /// Names of the arguments that will be present in the cleaned data
    pub fn bound_names(&self) -> Vec<&str> {
        self.vars.iter().map(|(arg, _)| arg.display_name()).collect()
    }

    /// Resolve and clean with the default resolver and no hooks
    pub fn resolve(&self, context: &dyn Resolver) -> Result<TagData> {
        self.resolve_with(&TokenResolver::default(), context, &NoHooks)
    }

    /// Resolve variables and clean, in this order for each argument: its own
    /// `base_clean`, then `hooks.clean_arg`; finally `hooks.clean` on the whole
    pub fn resolve_with(
        &self,
        resolver: &TokenResolver,
        context: &dyn Resolver,
        hooks: &dyn TagHooks,
    ) -> Result<TagData> {
        let mut data = TagData::new();
        for (arg, bound) in &self.vars {
            let value = match bound {
                Bound::Raw(raw) => resolver.resolve_value(self.spec.name(), arg, raw, context)?,
                Bound::Default(value) => value.clone(),
                Bound::Flag(present) => Value::Bool(*present),
            };
            let value = arg.base_clean(value)?;
            let name = arg.display_name();
            let value = hooks.clean_arg(name, value)?;
            data.insert(name, value);
        }
        hooks.clean(data)
    }
}
