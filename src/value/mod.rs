pub mod model;
pub mod template_value;

pub use model::{ModelClass, ModelInstance, ModelRegistry};
pub use template_value::{Value, ValueKind};
