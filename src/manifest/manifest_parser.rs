use crate::error::{Result, TagError};
use crate::manifest::Manifest;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").unwrap());
static TAG_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Manifest parser for JSON and YAML formats
pub struct ManifestParser;

impl ManifestParser {
    /// Parse Manifest from JSON string
    pub fn from_json(json_str: &str) -> Result<Manifest> {
        Self::from_json_with_context(json_str, None)
    }

    /// Parse Manifest from JSON string with file context
    pub fn from_json_with_context(json_str: &str, file_path: Option<&str>) -> Result<Manifest> {
        let context = file_path
            .map(|p| format!(" (file: {})", p))
            .unwrap_or_default();
        debug!(
            "Attempting to parse Manifest from JSON{} ({} bytes)",
            context,
            json_str.len()
        );

        if json_str.trim().is_empty() {
            error!("Manifest JSON string is empty{}", context);
            return Err(TagError::Parse(format!(
                "JSON parsing error{}: input string is empty",
                context
            )));
        }

        match serde_json::from_str::<Manifest>(json_str) {
            Ok(manifest) => {
                info!("Successfully parsed Manifest from JSON{}", context);
                debug!(
                    "Parsed Manifest version {} with {} tags",
                    manifest.version,
                    manifest.tags.len()
                );
                Ok(manifest)
            }
            Err(e) => {
                error!("Failed to parse Manifest from JSON{}: {}", context, e);

                let detailed_error = match e.classify() {
                    serde_json::error::Category::Io => {
                        format!("JSON parsing error{} - I/O issue: {}", context, e)
                    }
                    serde_json::error::Category::Syntax => format!(
                        "JSON parsing error{} - Syntax error at line {}, column {}: {}",
                        context,
                        e.line(),
                        e.column(),
                        e
                    ),
                    serde_json::error::Category::Data => {
                        format!("JSON parsing error{} - Invalid data structure: {}", context, e)
                    }
                    serde_json::error::Category::Eof => {
                        format!("JSON parsing error{} - Unexpected end of file: {}", context, e)
                    }
                };

                Err(TagError::Parse(detailed_error))
            }
        }
    }

    /// Parse Manifest from YAML string
    #[cfg(feature = "yaml-support")]
    pub fn from_yaml(yaml_str: &str) -> Result<Manifest> {
        Self::from_yaml_with_context(yaml_str, None)
    }

    /// Parse Manifest from YAML string with file context
    #[cfg(feature = "yaml-support")]
    pub fn from_yaml_with_context(yaml_str: &str, file_path: Option<&str>) -> Result<Manifest> {
        let context = file_path
            .map(|p| format!(" (file: {})", p))
            .unwrap_or_default();
        debug!(
            "Attempting to parse Manifest from YAML{} ({} bytes)",
            context,
            yaml_str.len()
        );

        if yaml_str.trim().is_empty() {
            error!("Manifest YAML string is empty{}", context);
            return Err(TagError::Parse(format!(
                "YAML parsing error{}: input string is empty",
                context
            )));
        }

        serde_yaml::from_str::<Manifest>(yaml_str).map_err(|e| {
            error!("Failed to parse Manifest from YAML{}: {}", context, e);
            let detailed_error = match e.location() {
                Some(location) => format!(
                    "YAML parsing error{} - Syntax error at line {}, column {}: {}",
                    context,
                    location.line(),
                    location.column(),
                    e
                ),
                None => format!("YAML parsing error{}: {}", context, e),
            };
            TagError::Parse(detailed_error)
        })
    }

    /// Parse Manifest from file (format picked from the extension)
    pub async fn from_file(path: &str) -> Result<Manifest> {
        info!("Loading Manifest from file: {}", path);

        if path.trim().is_empty() {
            error!("Manifest file path is empty");
            return Err(TagError::Io("File path cannot be empty".to_string()));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            error!("Failed to read Manifest file '{}': {}", path, e);
            TagError::Io(format!("Failed to read file {}: {}", path, e))
        })?;
        debug!("Read {} bytes from {}", content.len(), path);

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            Self::parse_yaml_file(&content, path)
        } else {
            if !path.ends_with(".json") {
                warn!("Unknown file extension for {}, defaulting to JSON format", path);
            }
            Self::from_json_with_context(&content, Some(path))
        }
    }

    #[cfg(feature = "yaml-support")]
    fn parse_yaml_file(content: &str, path: &str) -> Result<Manifest> {
        Self::from_yaml_with_context(content, Some(path))
    }

    #[cfg(not(feature = "yaml-support"))]
    fn parse_yaml_file(_content: &str, path: &str) -> Result<Manifest> {
        error!("YAML support not enabled for file: {}", path);
        Err(TagError::configuration(format!(
            "YAML support not enabled (file: {}). Enable 'yaml-support' feature.",
            path
        )))
    }

    /// Serialize Manifest to JSON string
    pub fn to_json(manifest: &Manifest) -> Result<String> {
        serde_json::to_string_pretty(manifest).map_err(|e| {
            error!("Failed to serialize Manifest to JSON: {}", e);
            TagError::Parse(format!("JSON serialization error: {}", e))
        })
    }

    /// Serialize Manifest to YAML string
    #[cfg(feature = "yaml-support")]
    pub fn to_yaml(manifest: &Manifest) -> Result<String> {
        serde_yaml::to_string(manifest).map_err(|e| {
            error!("Failed to serialize Manifest to YAML: {}", e);
            TagError::Parse(format!("YAML serialization error: {}", e))
        })
    }

    /// Validate Manifest structure and content
    pub fn validate(manifest: &Manifest) -> Result<()> {
        Self::validate_with_context(manifest, None)
    }

    /// Validate Manifest structure and content with file context.
    ///
    /// Checks the document itself: version, names and references. Option
    /// combinations are checked when the library is built.
    pub fn validate_with_context(manifest: &Manifest, file_path: Option<&str>) -> Result<()> {
        let context = file_path
            .map(|p| format!(" (file: {})", p))
            .unwrap_or_default();
        info!("Starting Manifest validation{}", context);

        if manifest.version.is_empty() {
            error!("Manifest validation failed{}: version is required", context);
            return Err(TagError::configuration(format!(
                "Manifest version is required{}",
                context
            )));
        }

        if !VERSION_RE.is_match(&manifest.version) {
            error!(
                "Manifest validation failed{}: invalid version format '{}'",
                context, manifest.version
            );
            return Err(TagError::configuration(format!(
                "Invalid version format: {}{}",
                manifest.version, context
            )));
        }

        if let Some(models) = &manifest.models {
            for (label, model) in models {
                for parent in &model.parents {
                    if !models.contains_key(parent) {
                        return Err(TagError::configuration(format!(
                            "Model '{}' extends unknown model '{}'{}",
                            label, parent, context
                        )));
                    }
                }
            }
        }

        if manifest.tags.is_empty() {
            warn!("Manifest declares no tags{}", context);
        }

        for (name, tag) in &manifest.tags {
            if !TAG_NAME_RE.is_match(name) {
                return Err(TagError::configuration(format!(
                    "Invalid tag name '{}'{}",
                    name, context
                )));
            }
            if let Some(parent) = &tag.extends {
                if !manifest.has_tag(parent) {
                    return Err(TagError::configuration(format!(
                        "Tag '{}' extends unknown tag '{}'{}",
                        name, parent, context
                    )));
                }
            }
            for arg in &tag.args {
                if arg.attr.is_empty() {
                    return Err(TagError::configuration(format!(
                        "Tag '{}' has an argument without an attribute name{}",
                        name, context
                    )));
                }
                if let Some(model) = &arg.model {
                    if manifest.get_model(model).is_none() {
                        return Err(TagError::configuration(format!(
                            "Argument '{}' of tag '{}' references unknown model '{}'{}",
                            arg.attr, name, model, context
                        )));
                    }
                }
            }
            debug!("✓ Tag '{}' is valid", name);
        }

        info!(
            "Validated{}: version {}, {} tags, {} models",
            context,
            manifest.version,
            manifest.tags.len(),
            manifest.models.as_ref().map_or(0, |m| m.len())
        );
        Ok(())
    }

    /// Load and validate Manifest from file in one step
    pub async fn load_and_validate(path: &str) -> Result<Manifest> {
        let manifest = Self::from_file(path).await?;
        Self::validate_with_context(&manifest, Some(path))?;
        Ok(manifest)
    }

    /// Load and validate Manifest from JSON string in one step
    pub fn load_and_validate_json(json_str: &str) -> Result<Manifest> {
        let manifest = Self::from_json(json_str)?;
        Self::validate(&manifest)?;
        Ok(manifest)
    }
}
