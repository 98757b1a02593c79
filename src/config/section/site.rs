//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "churomi"                 # Prefix of exported file names
//! origin = "https://churomi.com"   # Where published pages are fetched from
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// The published site being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Short site name, used in export file names.
    pub name: String,

    /// Origin pages are loaded from (scheme, host and optional port).
    pub origin: String,
}

impl SiteConfig {
    pub const NAME: FieldPath = FieldPath::new("site.name");
    pub const ORIGIN: FieldPath = FieldPath::new("site.origin");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(Self::NAME, "site name must not be empty");
        } else if self.name.contains(['/', '\\']) {
            diag.error(Self::NAME, "site name is used in file names and must not contain `/`");
        }

        if !crate::config::util::is_http_url(&self.origin) {
            diag.error_with_hint(
                Self::ORIGIN,
                format!("not an absolute http(s) URL: `{}`", self.origin),
                "e.g. origin = \"https://example.com\"",
            );
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "site".to_string(),
            origin: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_config() {
        let config =
            test_parse_config("[site]\nname = \"churomi\"\norigin = \"https://churomi.com\"");
        assert_eq!(config.site.name, "churomi");
        assert_eq!(config.site.origin, "https://churomi.com");
    }

    #[test]
    fn test_site_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.name, "site");
        assert_eq!(config.site.origin, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_site_validation() {
        let mut diag = ConfigDiagnostics::new();
        SiteConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());

        let bad = SiteConfig {
            name: "a/b".into(),
            origin: "churomi.com".into(),
        };
        let mut diag = ConfigDiagnostics::new();
        bad.validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }
}
