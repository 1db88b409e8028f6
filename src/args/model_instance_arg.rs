use crate::args::Cleaner;
use crate::error::{Result, TagError};
use crate::value::{ModelClass, Value};
use std::sync::Arc;

/// Accepts instances of one model class (or of classes inheriting from it)
#[derive(Debug, Clone)]
pub struct ModelInstanceArg {
    model_class: Arc<ModelClass>,
}

impl ModelInstanceArg {
    /// The model is mandatory; a missing one is a definition-time error
    pub fn new(model: Option<Arc<ModelClass>>) -> Result<Self> {
        let model_class =
            model.ok_or_else(|| TagError::configuration("A 'model' option is required"))?;
        Ok(Self { model_class })
    }

    pub fn for_model(model_class: Arc<ModelClass>) -> Self {
        Self { model_class }
    }

    pub fn model_class(&self) -> &Arc<ModelClass> {
        &self.model_class
    }
}

impl Cleaner for ModelInstanceArg {
    fn type_name(&self) -> &'static str {
        "model_instance"
    }

    fn clean(&self, name: &str, value: Value) -> Result<Value> {
        match value {
            Value::Model(ref instance) if instance.is_instance_of(&self.model_class) => Ok(value),
            other => Err(TagError::validation(
                name,
                &other,
                format!("must be an instance of {}", self.model_class),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ModelInstance, ModelRegistry};

    #[test]
    fn test_requires_model() {
        let err = ModelInstanceArg::new(None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'model'"));
    }

    #[test]
    fn test_instance_checks() {
        let mut registry = ModelRegistry::new();
        let item = registry.register("content.Item", &[]).unwrap();
        let link = registry.register("links.Link", &["content.Item"]).unwrap();
        let person = registry.register("people.Person", &[]).unwrap();

        let arg = ModelInstanceArg::for_model(item.clone());
        let link_value = Value::Model(ModelInstance::new(link).with_pk(1));
        assert_eq!(arg.clean("url", link_value.clone()).unwrap(), link_value);

        let err = arg
            .clean("url", Value::Model(ModelInstance::new(person).with_pk(2)))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value for 'url' must be an instance of content.Item (got <Person: Person object (2)>)"
        );
        assert!(arg.clean("url", Value::from(42)).is_err());
        assert_eq!(arg.model_class().label(), "content.Item");
    }
}
