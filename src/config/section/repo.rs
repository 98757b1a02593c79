//! `[repo]` section configuration.
//!
//! The repository the site is served from. Publishing writes the edited
//! page back through the GitHub contents API.
//!
//! # Example
//!
//! ```toml
//! [repo]
//! owner = "RadanPY"
//! name = "churomi-site"
//! branch = "main"
//! api = "https://api.github.com"
//! token_path = "~/.github-token"        # Optional: file holding a token
//! default_message = "Update site content"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Branch commits are written to.
    pub branch: String,

    /// API base URL.
    pub api: String,

    /// Path to a file containing a personal access token.
    ///
    /// Keep it outside the repository (e.g. `~/.github-token`).
    pub token_path: Option<PathBuf>,

    /// Commit message used when none is given.
    pub default_message: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            branch: "main".to_string(),
            api: "https://api.github.com".to_string(),
            token_path: None,
            default_message: "Update site content".to_string(),
        }
    }
}

impl RepoConfig {
    pub const OWNER: FieldPath = FieldPath::new("repo.owner");
    pub const NAME: FieldPath = FieldPath::new("repo.name");
    pub const BRANCH: FieldPath = FieldPath::new("repo.branch");
    pub const API: FieldPath = FieldPath::new("repo.api");
    pub const TOKEN_PATH: FieldPath = FieldPath::new("repo.token_path");

    /// Checks that apply whenever a config file is loaded.
    ///
    /// - `api` must be an absolute http(s) URL
    /// - `token_path`, when set, must be an existing file
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !crate::config::util::is_http_url(&self.api) {
            diag.error(Self::API, format!("not an absolute http(s) URL: `{}`", self.api));
        }

        if let Some(path) = &self.token_path {
            if !path.exists() {
                diag.error(
                    Self::TOKEN_PATH,
                    format!("{} file not found: {}", Self::TOKEN_PATH, path.display()),
                );
            } else if !path.is_file() {
                diag.error(
                    Self::TOKEN_PATH,
                    format!("{} is not a file: {}", Self::TOKEN_PATH, path.display()),
                );
            }
        }
    }

    /// Extra checks for commands that write to the repository.
    pub fn validate_publish(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            (Self::OWNER, &self.owner),
            (Self::NAME, &self.name),
            (Self::BRANCH, &self.branch),
        ] {
            if value.trim().is_empty() {
                diag.error_with_hint(
                    field,
                    "required for publishing",
                    format!("set `{}` in [repo]", field.as_str().trim_start_matches("repo.")),
                );
            }
        }
    }

    /// Token stored in `token_path`, trimmed. `None` when unset or empty.
    pub fn read_token(&self) -> Result<Option<String>> {
        let Some(path) = &self.token_path else {
            return Ok(None);
        };
        let token = fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, test_parse_config};

    #[test]
    fn test_repo_config() {
        let config = test_parse_config(
            r#"[repo]
owner = "RadanPY"
name = "churomi-site"
branch = "gh-pages"
token_path = "~/.github-token"
default_message = "Edit copy""#,
        );

        assert_eq!(config.repo.owner, "RadanPY");
        assert_eq!(config.repo.name, "churomi-site");
        assert_eq!(config.repo.branch, "gh-pages");
        assert_eq!(config.repo.api, "https://api.github.com");
        assert_eq!(
            config.repo.token_path,
            Some(PathBuf::from("~/.github-token"))
        );
        assert_eq!(config.repo.default_message, "Edit copy");
    }

    #[test]
    fn test_repo_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.repo.default_message, "Update site content");
        assert!(config.repo.token_path.is_none());
    }

    #[test]
    fn test_publish_requires_coordinates() {
        let mut diag = ConfigDiagnostics::new();
        RepoConfig::default().validate_publish(&mut diag);
        assert_eq!(diag.errors().len(), 2);
        assert_eq!(diag.errors()[0].field, RepoConfig::OWNER);
    }

    #[test]
    fn test_missing_token_file() {
        let repo = RepoConfig {
            token_path: Some(PathBuf::from("/definitely/not/here/token")),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        repo.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].message.contains("file not found"));
    }

    #[test]
    fn test_read_token_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  ghp_abc \n").unwrap();

        let repo = RepoConfig {
            token_path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(repo.read_token().unwrap().as_deref(), Some("ghp_abc"));

        fs::write(&path, "\n").unwrap();
        assert_eq!(repo.read_token().unwrap(), None);

        assert_eq!(RepoConfig::default().read_token().unwrap(), None);
    }

    #[test]
    fn test_repo_unknown_field_detected() {
        let (_, ignored) = AdminConfig::parse_with_ignored("[repo]\nunknown = \"field\"").unwrap();
        assert!(ignored.iter().any(|f| f.contains("unknown")));
    }
}
