//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Gitviz has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! Both scopes share one file schema ([`FileConfig`]); any section may
//! appear at either scope.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GITVIZ_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitviz/config.toml`
//! 3. `<platform config dir>/gitviz/config.toml` (e.g. `~/.config/gitviz/config.toml`)
//!
//! # Repo Config Location
//!
//! `<git dir>/gitviz.toml` — inside the git directory rather than the
//! worktree, so bare repositories can carry config too.
//!
//! # Example
//!
//! ```no_run
//! use gitviz::core::config::Config;
//! use std::path::Path;
//!
//! // Load config for a repository
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//!
//! // Access configuration values with precedence applied
//! println!("Renderer: {}", config.render_program());
//! if !config.include_blobs() {
//!     println!("Blobs hidden");
//! }
//! ```

pub mod schema;

pub use schema::{DisplaySection, FileConfig, GraphSection, RenderSection, WatchSection};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// This struct provides accessor methods that apply precedence rules
/// automatically. Repo config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Repository configuration (if present)
    pub repo: Option<FileConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads `<git_dir>/gitviz.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// fail validation. Missing config files are not an error (defaults
    /// are used).
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path) = if let Some(dir) = git_dir {
            Self::load_repo(dir)?
        } else {
            (None, None)
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $GITVIZ_CONFIG
        if let Ok(path) = std::env::var("GITVIZ_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/gitviz/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitviz/config.toml");
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check the platform config dir
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("gitviz/config.toml");
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // No config found, use defaults
        Ok((FileConfig::default(), None))
    }

    /// Load repository configuration from the git directory.
    fn load_repo(git_dir: &Path) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigError> {
        let path = git_dir.join("gitviz.toml");
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_file(&path)?;
        Ok((Some(config), Some(path)))
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve a value with repo-over-global precedence.
    fn pick<'a, T: 'a>(&'a self, get: impl Fn(&'a FileConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|c| get(c))
            .or_else(|| get(&self.global))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Whether blob objects (and tree-to-blob edges) are included.
    ///
    /// Defaults to `true` if not configured.
    pub fn include_blobs(&self) -> bool {
        self.pick(|c| c.graph.as_ref().and_then(|g| g.include_blobs))
            .unwrap_or(true)
    }

    /// Whether the staged-index overlay is included.
    ///
    /// Defaults to `true` if not configured.
    pub fn include_index(&self) -> bool {
        self.pick(|c| c.graph.as_ref().and_then(|g| g.include_index))
            .unwrap_or(true)
    }

    /// Font family for node and edge labels.
    ///
    /// Defaults to "Monaco" if not configured.
    pub fn fontname(&self) -> &str {
        self.pick(|c| c.display.as_ref().and_then(|d| d.fontname.as_deref()))
            .unwrap_or("Monaco")
    }

    /// Font size for node labels.
    ///
    /// Defaults to 8 if not configured.
    pub fn fontsize(&self) -> u32 {
        self.pick(|c| c.display.as_ref().and_then(|d| d.fontsize))
            .unwrap_or(8)
    }

    /// Maximum characters of blob content shown in a blob label.
    ///
    /// Defaults to 200 if not configured.
    pub fn blob_content_limit(&self) -> usize {
        self.pick(|c| c.display.as_ref().and_then(|d| d.blob_content_limit))
            .unwrap_or(200)
    }

    /// Renderer executable.
    ///
    /// Defaults to "dot" if not configured.
    pub fn render_program(&self) -> &str {
        self.pick(|c| c.render.as_ref().and_then(|r| r.program.as_deref()))
            .unwrap_or("dot")
    }

    /// Renderer output format (passed as `-T`).
    ///
    /// Defaults to "xdot" if not configured.
    pub fn render_format(&self) -> &str {
        self.pick(|c| c.render.as_ref().and_then(|r| r.format.as_deref()))
            .unwrap_or("xdot")
    }

    /// Poll interval for watch mode, in milliseconds.
    ///
    /// Defaults to 200 if not configured.
    pub fn watch_interval_ms(&self) -> u64 {
        self.pick(|c| c.watch.as_ref().and_then(|w| w.interval_ms))
            .unwrap_or(200)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
