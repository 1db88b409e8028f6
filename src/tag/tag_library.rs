use crate::config::ResolveConfig;
use crate::error::{Result, TagError};
use crate::resolve::{Resolver, TokenResolver};
use crate::tag::{RawArgs, TagData, TagHooks, TagSpec};
use log::info;
use std::collections::BTreeMap;

/// A named collection of tag declarations sharing one resolution config
#[derive(Debug, Clone, Default)]
pub struct TagLibrary {
    tags: BTreeMap<String, TagSpec>,
    resolver: TokenResolver,
}

impl TagLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolveConfig) -> Result<Self> {
        config.validate().map_err(TagError::configuration)?;
        Ok(Self {
            tags: BTreeMap::new(),
            resolver: TokenResolver::new(config),
        })
    }

    /// Add a tag; tag names are unique within a library
    pub fn register(&mut self, spec: TagSpec) -> Result<()> {
        if self.tags.contains_key(spec.name()) {
            return Err(TagError::configuration(format!(
                "tag '{}' is already registered",
                spec.name()
            )));
        }
        info!("Registered tag '{}'", spec.name());
        self.tags.insert(spec.name().to_string(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TagSpec> {
        self.tags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    pub fn tags(&self) -> impl Iterator<Item = &TagSpec> {
        self.tags.values()
    }

    pub fn resolver(&self) -> &TokenResolver {
        &self.resolver
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Bind `raw` to the tag `name` and clean it against `context`
    pub fn clean(
        &self,
        name: &str,
        raw: &RawArgs,
        context: &dyn Resolver,
        hooks: &dyn TagHooks,
    ) -> Result<TagData> {
        let spec = self
            .get(name)
            .ok_or_else(|| TagError::syntax(name, "is not a registered tag"))?;
        spec.bind(raw)?.resolve_with(&self.resolver, context, hooks)
    }
}
