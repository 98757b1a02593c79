//! Editor configuration management for `pagedit.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── pages      # [pages.<lang>], [markers] validation
//! │   ├── repo       # [repo]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # AdminConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section           | Purpose                                   |
//! |-------------------|-------------------------------------------|
//! | `[site]`          | Site name and the origin pages load from  |
//! | `[repo]`          | Repository, branch and token for publish  |
//! | `[markers]`       | Marker attribute names                    |
//! | `[pages.<lang>]`  | Page registry: logical page → site path   |
//! | `[serve]`         | Admin server (port, interface)            |
//!
//! A missing file is not an error: every section has a default, so the
//! tool runs against `--origin` alone.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{RepoConfig, ServeConfig, SiteConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    debug,
    field::Markers,
    log,
    registry::{PageRegistry, PageTable},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pagedit.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site name and origin
    #[serde(default)]
    pub site: SiteConfig,

    /// Publishing target
    #[serde(default)]
    pub repo: RepoConfig,

    /// Marker attribute names
    #[serde(default)]
    pub markers: Markers,

    /// Language → page → path
    #[serde(default = "PageRegistry::default_table")]
    pub pages: PageTable,

    /// Admin server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            site: SiteConfig::default(),
            repo: RepoConfig::default(),
            markers: Markers::default(),
            pages: PageRegistry::default_table(),
            serve: ServeConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; without one the
    /// built-in defaults are used. CLI options are applied before
    /// validation so overrides are validated too.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.finalize(cli);
        config.validate(&cli.command)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) =
            Self::parse_with_ignored(&content).map_err(ConfigError::Toml)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// The page registry described by `[pages]`.
    pub fn registry(&self) -> PageRegistry {
        PageRegistry::new(self.pages.clone())
    }

    /// Site origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.site.origin.trim_end_matches('/')
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides and resolve paths.
    fn finalize(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.site.origin, cli.origin.as_ref());

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }

        if let Some(token_path) = self.repo.token_path.take() {
            self.repo.token_path = Some(crate::utils::path::expand_path(&token_path, &self.root));
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for `command`.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.repo.validate(&mut diag);
        section::pages::validate_pages(&self.pages, &mut diag);
        section::pages::validate_markers(&self.markers, &mut diag);

        match command {
            Commands::Publish { .. } => self.repo.validate_publish(&mut diag),
            Commands::Serve { .. } => {
                // Serving works without a repository; publishing from it won't
                let mut publish = ConfigDiagnostics::new();
                self.repo.validate_publish(&mut publish);
                for err in publish.errors() {
                    diag.warn(err.field, "not set, publishing from the admin page will fail");
                }
            }
            _ => {}
        }

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AdminConfig {
    let (parsed, ignored) = AdminConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
