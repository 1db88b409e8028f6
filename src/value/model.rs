use crate::error::{Result, TagError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// `app_label.ModelName`
static MODEL_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)$").expect("valid model label regex")
});

/// A model class that tag arguments can require instances of
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ModelClass {
    app_label: String,
    name: String,
    parents: Vec<Arc<ModelClass>>,
}

impl ModelClass {
    /// Create a model class from an `app_label.ModelName` label
    pub fn new(label: &str) -> Result<Arc<Self>> {
        Self::with_parents(label, Vec::new())
    }

    /// Create a model class that inherits from `parents`
    pub fn with_parents(label: &str, parents: Vec<Arc<ModelClass>>) -> Result<Arc<Self>> {
        let captures = MODEL_LABEL_RE.captures(label).ok_or_else(|| {
            TagError::configuration(format!(
                "'model' must be a model label of the form 'app_label.ModelName' (got '{}')",
                label
            ))
        })?;
        Ok(Arc::new(Self {
            app_label: captures[1].to_string(),
            name: captures[2].to_string(),
            parents,
        }))
    }

    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.name)
    }

    pub fn parents(&self) -> &[Arc<ModelClass>] {
        &self.parents
    }

    /// Whether this class is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &ModelClass) -> bool {
        if self.app_label == other.app_label && self.name == other.name {
            return true;
        }
        self.parents.iter().any(|parent| parent.is_subclass_of(other))
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.name)
    }
}

/// One object of a [`ModelClass`], as found in a render context
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    class: Arc<ModelClass>,
    pk: Option<i64>,
    fields: serde_json::Map<String, serde_json::Value>,
    display: Option<String>,
}

impl ModelInstance {
    pub fn new(class: Arc<ModelClass>) -> Self {
        Self {
            class,
            pk: None,
            fields: serde_json::Map::new(),
            display: None,
        }
    }

    pub fn with_pk(mut self, pk: i64) -> Self {
        self.pk = Some(pk);
        self
    }

    pub fn with_field<K: Into<String>>(mut self, name: K, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Text used when the instance is rendered
    pub fn with_display<S: Into<String>>(mut self, display: S) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn class(&self) -> &Arc<ModelClass> {
        &self.class
    }

    pub fn pk(&self) -> Option<i64> {
        self.pk
    }

    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    pub fn is_instance_of(&self, class: &ModelClass) -> bool {
        self.class.is_subclass_of(class)
    }
}

impl fmt::Display for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.display, self.pk) {
            (Some(display), _) => f.write_str(display),
            (None, Some(pk)) => write!(f, "{} object ({})", self.class.name, pk),
            (None, None) => write!(f, "{} object (None)", self.class.name),
        }
    }
}

/// Registry of known model classes, keyed by label
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<ModelClass>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model; every parent label must already be registered
    pub fn register(&mut self, label: &str, parents: &[&str]) -> Result<Arc<ModelClass>> {
        if self.models.contains_key(label) {
            return Err(TagError::configuration(format!(
                "model '{}' is already registered",
                label
            )));
        }
        let parents = parents
            .iter()
            .map(|parent| self.resolve(parent))
            .collect::<Result<Vec<_>>>()?;
        let class = ModelClass::with_parents(label, parents)?;
        debug!("Registered model {} ({} parents)", label, class.parents().len());
        self.models.insert(label.to_string(), Arc::clone(&class));
        Ok(class)
    }

    /// Add an already constructed model class
    pub fn insert(&mut self, class: Arc<ModelClass>) {
        self.models.insert(class.label(), class);
    }

    pub fn get(&self, label: &str) -> Option<Arc<ModelClass>> {
        self.models.get(label).cloned()
    }

    /// Look up a model that a declaration refers to
    pub fn resolve(&self, label: &str) -> Result<Arc<ModelClass>> {
        self.get(label).ok_or_else(|| {
            TagError::configuration(format!(
                "'model' must reference a registered model (got '{}')",
                label
            ))
        })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.models.contains_key(label)
    }

    pub fn labels(&self) -> Vec<&String> {
        let mut labels: Vec<&String> = self.models.keys().collect();
        labels.sort();
        labels
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_label_validation() {
        let link = ModelClass::new("links.Link").unwrap();
        assert_eq!(link.app_label(), "links");
        assert_eq!(link.name(), "Link");
        assert_eq!(link.label(), "links.Link");

        for bad in ["Link", "links.", ".Link", "links.Link.Extra", "links.9Link", ""] {
            let err = ModelClass::new(bad).unwrap_err();
            assert!(err.is_configuration(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_subclass_chain() {
        let mut registry = ModelRegistry::new();
        let base = registry.register("content.Item", &[]).unwrap();
        let link = registry.register("links.Link", &["content.Item"]).unwrap();
        let other = registry.register("people.Person", &[]).unwrap();

        assert!(link.is_subclass_of(&base));
        assert!(link.is_subclass_of(&link));
        assert!(!base.is_subclass_of(&link));
        assert!(!other.is_subclass_of(&base));

        let instance = ModelInstance::new(link).with_pk(3);
        assert!(instance.is_instance_of(&base));
        assert_eq!(instance.to_string(), "Link object (3)");
    }

    #[test]
    fn test_registry_errors() {
        let mut registry = ModelRegistry::new();
        assert!(registry.register("links.Link", &["content.Missing"]).is_err());
        registry.register("links.Link", &[]).unwrap();
        assert!(registry.register("links.Link", &[]).is_err());
        assert!(registry.resolve("links.Other").unwrap_err().is_configuration());
        assert_eq!(registry.labels(), vec!["links.Link"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_instance_display_override() {
        let link = ModelClass::new("links.Link").unwrap();
        let instance = ModelInstance::new(link)
            .with_field("url", serde_json::json!("http://bing.com"))
            .with_display("http://bing.com");
        assert_eq!(instance.to_string(), "http://bing.com");
        assert_eq!(instance.field("url"), Some(&serde_json::json!("http://bing.com")));
    }
}
