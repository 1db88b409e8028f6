use crate::args::{Arg, ValueDomain};
use crate::config::ResolveConfig;
use crate::error::{Result, TagError};
use crate::tag::{TagLibrary, TagSpec};
use crate::value::{ModelRegistry, Value};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Declarations of models and tags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Manifest version
    pub version: String,

    /// Model definitions keyed by `app_label.ModelName` (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<BTreeMap<String, ModelManifest>>,

    /// Tag definitions keyed by tag name
    #[serde(default)]
    pub tags: BTreeMap<String, TagManifest>,
}

impl Manifest {
    /// Create a new, empty manifest
    pub fn new(version: String) -> Self {
        Self {
            version,
            models: None,
            tags: BTreeMap::new(),
        }
    }

    /// Load a manifest from file (async wrapper)
    pub async fn from_file(path: &str) -> Result<Self> {
        crate::manifest::ManifestParser::from_file(path).await
    }

    pub fn add_model(&mut self, label: String, model: ModelManifest) {
        self.models.get_or_insert_with(BTreeMap::new).insert(label, model);
    }

    pub fn get_model(&self, label: &str) -> Option<&ModelManifest> {
        self.models.as_ref()?.get(label)
    }

    pub fn add_tag(&mut self, name: String, tag: TagManifest) {
        self.tags.insert(name, tag);
    }

    pub fn get_tag(&self, name: &str) -> Option<&TagManifest> {
        self.tags.get(name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Register every declared model, parents before children
    pub fn model_registry(&self) -> Result<ModelRegistry> {
        let mut registry = ModelRegistry::new();
        let Some(models) = &self.models else {
            return Ok(registry);
        };

        let mut pending: Vec<(&String, &ModelManifest)> = models.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for (label, model) in pending {
                if model.parents.iter().all(|parent| registry.contains(parent)) {
                    let parents: Vec<&str> = model.parents.iter().map(String::as_str).collect();
                    registry.register(label, &parents)?;
                } else {
                    deferred.push((label, model));
                }
            }
            if deferred.len() == before {
                let labels: Vec<&str> = deferred.iter().map(|(label, _)| label.as_str()).collect();
                return Err(TagError::configuration(format!(
                    "models with unknown or cyclic parents: {}",
                    labels.join(", ")
                )));
            }
            pending = deferred;
        }

        debug!("Built model registry with {} models", registry.len());
        Ok(registry)
    }

    /// Build every declared tag with the default resolution config
    pub fn build_library(&self) -> Result<TagLibrary> {
        self.build_library_with(ResolveConfig::default())
    }

    pub fn build_library_with(&self, config: ResolveConfig) -> Result<TagLibrary> {
        let registry = self.model_registry()?;
        let mut built: HashMap<String, TagSpec> = HashMap::new();
        for name in self.tags.keys() {
            self.build_tag(name, &registry, &mut built, &mut Vec::new())?;
        }

        let mut library = TagLibrary::with_config(config)?;
        for name in self.tags.keys() {
            if let Some(spec) = built.remove(name) {
                library.register(spec)?;
            }
        }
        info!(
            "Built tag library: {} tags, {} models",
            library.len(),
            registry.len()
        );
        Ok(library)
    }

    fn build_tag(
        &self,
        name: &str,
        registry: &ModelRegistry,
        built: &mut HashMap<String, TagSpec>,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        if built.contains_key(name) {
            return Ok(());
        }
        if chain.iter().any(|n| n == name) {
            chain.push(name.to_string());
            return Err(TagError::configuration(format!(
                "tag inheritance cycle: {}",
                chain.join(" -> ")
            )));
        }
        let tag = self.get_tag(name).ok_or_else(|| {
            TagError::configuration(format!("tag '{}' is not declared", name))
        })?;

        let mut builder = TagSpec::builder(name).block(tag.block);
        if let Some(description) = &tag.description {
            builder = builder.description(description.clone());
        }
        if let Some(parent) = &tag.extends {
            chain.push(name.to_string());
            self.build_tag(parent, registry, built, chain)?;
            chain.pop();
            if let Some(parent_spec) = built.get(parent) {
                builder = builder.extends(parent_spec);
            }
        }
        for arg in &tag.args {
            builder = builder.arg(arg.attr.clone(), arg.to_arg(registry)?);
        }
        built.insert(name.to_string(), builder.build()?);
        Ok(())
    }
}

/// Model declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelManifest {
    /// Labels of parent models (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    /// Model description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: String) -> Self {
        self.parents.push(parent);
        self
    }
}

/// Tag declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagManifest {
    /// Tag description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the tag wraps content up to `end<name>` (default: false)
    #[serde(default)]
    pub block: bool,

    /// Tag whose arguments this one inherits (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Argument declarations, in declaration order
    #[serde(default)]
    pub args: Vec<ArgumentManifest>,
}

impl TagManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn add_argument(&mut self, arg: ArgumentManifest) {
        self.args.push(arg);
    }

    pub fn get_argument(&self, attr: &str) -> Option<&ArgumentManifest> {
        self.args.iter().find(|arg| arg.attr == attr)
    }
}

/// Argument declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentManifest {
    /// Attribute name; the keyword is this with trailing underscores removed
    pub attr: String,

    /// Value domain (default: boolean for flags, basic otherwise)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<ValueDomain>,

    /// Storage name (optional, defaults to the keyword)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub positional: bool,

    /// Whether the argument must be given (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Default value (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default)]
    pub null: bool,

    /// Whether unquoted tokens are variable names (default: true)
    #[serde(default = "default_resolve")]
    pub resolve: bool,

    #[serde(default)]
    pub multi: bool,

    #[serde(default)]
    pub flag: bool,

    /// Model label for model_instance arguments (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Argument description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_resolve() -> bool {
    true
}

impl ArgumentManifest {
    /// Create a new argument manifest
    pub fn new(attr: String, arg_type: ValueDomain) -> Self {
        Self {
            attr,
            r#type: Some(arg_type),
            name: None,
            positional: false,
            required: None,
            default: None,
            null: false,
            resolve: true,
            multi: false,
            flag: false,
            model: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Declared domain; flags without a `type` are boolean
    pub fn domain(&self) -> ValueDomain {
        match self.r#type {
            Some(domain) => domain,
            None if self.flag => ValueDomain::Boolean,
            None => ValueDomain::Basic,
        }
    }

    /// Build the declared [`Arg`], resolving its model through `registry`
    pub fn to_arg(&self, registry: &ModelRegistry) -> Result<Arg> {
        let mut builder = Arg::builder(self.domain())
            .label(self.attr.clone())
            .resolve(self.resolve);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        match self.required {
            Some(true) => builder = builder.required(),
            Some(false) => builder = builder.optional(),
            None => {}
        }
        if let Some(default) = &self.default {
            let value = Value::from_json(default, registry).map_err(|e| {
                TagError::configuration(format!("invalid default for '{}': {}", self.attr, e))
            })?;
            builder = builder.default(value);
        }
        if self.null {
            builder = builder.null();
        }
        if self.multi {
            builder = builder.multi();
        }
        if self.flag {
            builder = builder.flag();
        }
        if self.positional {
            builder = builder.positional();
        }
        if let Some(model) = &self.model {
            builder = builder.model(registry.resolve(model)?);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Manifest {
        serde_json::from_value(json!({
            "version": "1.0.0",
            "models": {
                "links.Link": {"parents": ["content.Item"]},
                "content.Item": {}
            },
            "tags": {
                "argument_type": {
                    "args": [
                        {"attr": "age", "type": "integer", "null": true},
                        {"attr": "name_", "type": "string", "null": true},
                        {"attr": "url", "type": "model_instance", "model": "links.Link", "null": true},
                        {"attr": "flag", "type": "boolean", "flag": true}
                    ]
                },
                "keyword": {"args": [{"attr": "limit", "type": "integer", "default": 5}]},
                "keyword_more": {"extends": "keyword", "args": [{"attr": "step", "type": "integer", "default": 1}]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_models_registered_parents_first() {
        let registry = sample().model_registry().unwrap();
        let link = registry.get("links.Link").unwrap();
        let item = registry.get("content.Item").unwrap();
        assert!(link.is_subclass_of(&item));
    }

    #[test]
    fn test_build_library() {
        let library = sample().build_library().unwrap();
        assert_eq!(library.names(), vec!["argument_type", "keyword", "keyword_more"]);

        let argument_type = library.get("argument_type").unwrap();
        assert!(argument_type.named_arg("name").is_some());
        assert_eq!(argument_type.named_arg("url").unwrap().type_name(), "model_instance");

        let more = library.get("keyword_more").unwrap();
        assert!(more.named_arg("limit").is_some());
        assert!(more.named_arg("step").is_some());
    }

    #[test]
    fn test_unknown_model_reference_is_configuration_error() {
        let mut manifest = sample();
        manifest.tags.get_mut("argument_type").unwrap().args[2].model = Some("links.Missing".to_string());
        let err = manifest.build_library().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("links.Missing"));
    }

    #[test]
    fn test_missing_model_option_is_configuration_error() {
        let mut manifest = sample();
        manifest.tags.get_mut("argument_type").unwrap().args[2].model = None;
        assert!(manifest.build_library().unwrap_err().is_configuration());
    }

    #[test]
    fn test_flag_without_type_is_boolean() {
        let arg: ArgumentManifest = serde_json::from_value(json!({"attr": "loud", "flag": true})).unwrap();
        assert_eq!(arg.domain(), ValueDomain::Boolean);
        let built = arg.to_arg(&ModelRegistry::new()).unwrap();
        assert!(built.is_flag());
        assert_eq!(built.type_name(), "boolean");

        let arg: ArgumentManifest = serde_json::from_value(json!({"attr": "anything"})).unwrap();
        assert_eq!(arg.domain(), ValueDomain::Basic);
        assert!(serde_json::to_value(&arg).unwrap().get("type").is_none());
    }

    #[test]
    fn test_declaration_errors_name_the_attribute() {
        let registry = ModelRegistry::new();
        let cases = vec![
            json!({"attr": "loud", "type": "boolean", "flag": true, "required": false}),
            json!({"attr": "loud", "type": "integer", "flag": true}),
            json!({"attr": "loud", "type": "integer", "required": true, "default": 1}),
            json!({"attr": "loud", "type": "model_instance"}),
        ];
        for case in cases {
            let arg: ArgumentManifest = serde_json::from_value(case).unwrap();
            let err = arg.to_arg(&registry).unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().contains("'loud'"), "unnamed error: {}", err);
            assert!(!err.to_string().contains("<unnamed>"));
        }
    }

    #[test]
    fn test_cycles_rejected() {
        let mut manifest = Manifest::new("1.0".to_string());
        manifest.add_tag(
            "a".to_string(),
            TagManifest { extends: Some("b".to_string()), ..TagManifest::default() },
        );
        manifest.add_tag(
            "b".to_string(),
            TagManifest { extends: Some("a".to_string()), ..TagManifest::default() },
        );
        let err = manifest.build_library().unwrap_err();
        assert!(err.to_string().contains("cycle"));

        let mut models = Manifest::new("1.0".to_string());
        models.add_model("a.A".to_string(), ModelManifest::new().with_parent("b.B".to_string()));
        models.add_model("b.B".to_string(), ModelManifest::new().with_parent("a.A".to_string()));
        assert!(models.model_registry().is_err());
    }
}
