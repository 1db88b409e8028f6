//! # ttag - Typed Template Tag Arguments
//!
//! Declarative argument definitions for template engine custom tags. A tag
//! declares its arguments once; every occurrence of the tag is bound to those
//! declarations when the template is parsed, then resolved against the render
//! context and cleaned into typed values.
//!
//! ## Features
//!
//! - **Typed Arguments**: integer, string, boolean, date, time, datetime and model instance arguments
//! - **Declaration Checks**: conflicting options fail with a configuration error at definition time
//! - **Null Bypass**: arguments declared `null` pass empty values through untouched
//! - **Multi-valued Arguments**: comma separated tokens cleaned item by item
//! - **Manifests**: JSON/YAML tag libraries loaded from disk
//!
//! ## Quick Start
//!
//! ```rust
//! use ttag::{Arg, EmptyContext, RawArgs, TagSpec, Value};
//!
//! fn main() -> ttag::Result<()> {
//!     let spec = TagSpec::builder("keyword")
//!         .arg("limit", Arg::integer().default(5).build()?)
//!         .arg("title", Arg::string().null().build()?)
//!         .build()?;
//!
//!     // {% keyword limit=200 %}
//!     let data = spec
//!         .bind(&RawArgs::new().keyword("limit", "200"))?
//!         .resolve(&EmptyContext)?;
//!     assert_eq!(data.get("limit"), Some(&Value::Integer(200)));
//!
//!     // {% keyword limit="many" %}
//!     let err = spec
//!         .bind(&RawArgs::new().keyword("limit", "\"many\""))?
//!         .resolve(&EmptyContext)
//!         .unwrap_err();
//!     assert!(err.is_validation());
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod manifest;
pub mod resolve;
pub mod tag;
pub mod utils;
pub mod value;

// Argument declarations
pub use args::{
    Arg, ArgBuilder, BasicArg, BooleanArg, Cleaner, DateArg, DateTimeArg, IntegerArg,
    ModelInstanceArg, StringArg, TimeArg, ValueDomain,
};

// Tag declarations and binding
pub use tag::{BoundTag, NoHooks, RawArgs, TagData, TagHooks, TagLibrary, TagSpec, TagSpecBuilder};

// Token resolution
pub use resolve::{EmptyContext, FnResolver, RawValue, Resolver, TokenResolver};

// Values
pub use value::{ModelClass, ModelInstance, ModelRegistry, Value, ValueKind};

// Manifest exports
pub use manifest::{ArgumentManifest, Manifest, ManifestParser, ModelManifest, TagManifest};

// Configuration exports
pub use config::ResolveConfig;

// Error exports
pub use error::{Result, TagError, TagErrorCode};

// Utility exports
pub use utils::TextUtils;

// Re-export common dependencies for convenience
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value as JsonValue};

/// Prelude module for convenient importing
pub mod prelude {
    pub use crate::{
        Arg, ArgBuilder, Cleaner, EmptyContext, Manifest, ManifestParser, RawArgs, RawValue,
        ResolveConfig, Resolver, Result, TagData, TagError, TagHooks, TagLibrary, TagSpec, Value,
        ValueDomain,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "rust-ttag");
    }
}
