pub mod manifest_parser;
pub mod tag_manifest;

pub use manifest_parser::ManifestParser;
pub use tag_manifest::{ArgumentManifest, Manifest, ModelManifest, TagManifest};
