//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same file schema is accepted at both scopes (global and repo);
//! scope precedence is applied by [`super::Config`] accessors, not here.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected ranges (e.g., fontsize must be positive).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A parsed configuration file.
///
/// # Example
///
/// ```toml
/// [graph]
/// include_blobs = true
/// include_index = true
///
/// [display]
/// fontname = "Monaco"
/// fontsize = 8
/// blob_content_limit = 200
///
/// [render]
/// program = "dot"
/// format = "xdot"
///
/// [watch]
/// interval_ms = 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Graph construction settings
    pub graph: Option<GraphSection>,

    /// Node label and font settings
    pub display: Option<DisplaySection>,

    /// Renderer subprocess settings
    pub render: Option<RenderSection>,

    /// Watch mode settings
    pub watch: Option<WatchSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(display) = &self.display {
            display.validate()?;
        }
        if let Some(render) = &self.render {
            render.validate()?;
        }
        if let Some(watch) = &self.watch {
            watch.validate()?;
        }
        Ok(())
    }
}

/// Graph construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSection {
    /// Include blob objects and tree-to-blob edges
    pub include_blobs: Option<bool>,

    /// Include the staged-index overlay node
    pub include_index: Option<bool>,
}

/// Node label and font settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// Font family for node and edge labels
    pub fontname: Option<String>,

    /// Font size for node labels
    pub fontsize: Option<u32>,

    /// Maximum characters of blob content shown in a blob label
    pub blob_content_limit: Option<usize>,
}

impl DisplaySection {
    /// Validate the display settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fontname) = &self.fontname {
            if fontname.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "fontname cannot be empty".to_string(),
                ));
            }
        }
        if let Some(fontsize) = self.fontsize {
            if fontsize == 0 {
                return Err(ConfigError::InvalidValue(
                    "fontsize must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Renderer subprocess settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    /// Renderer executable (default: "dot")
    pub program: Option<String>,

    /// Output format passed as -T (default: "xdot")
    pub format: Option<String>,
}

impl RenderSection {
    /// Validate the renderer settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program) = &self.program {
            if program.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "render program cannot be empty".to_string(),
                ));
            }
        }
        if let Some(format) = &self.format {
            if format.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "render format cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Watch mode settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSection {
    /// Poll interval between fingerprint checks, in milliseconds
    pub interval_ms: Option<u64>,
}

impl WatchSection {
    /// Validate the watch settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(interval) = self.interval_ms {
            if interval == 0 {
                return Err(ConfigError::InvalidValue(
                    "watch interval must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}
