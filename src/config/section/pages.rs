//! `[pages.<lang>]` and `[markers]` validation.
//!
//! # Example
//!
//! ```toml
//! [markers]
//! text = "data-edit"
//! href = "data-edit-href"
//! mailto = "data-edit-mailto"
//!
//! [pages.en]
//! home = "/index.html"
//! privacy = "/privacy.html"
//!
//! [pages.zh]
//! home = "/zh/index.html"
//! ```
//!
//! Both tables deserialize straight into the types the editor uses
//! ([`PageTable`] and [`Markers`]); this module only checks them.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::field::Markers;
use crate::registry::{HOME_PAGE, PageTable};
use std::collections::HashSet;

pub const PAGES: FieldPath = FieldPath::new("pages");
pub const MARKERS: FieldPath = FieldPath::new("markers");

/// Every language needs a home page, every path must be root-relative.
pub fn validate_pages(pages: &PageTable, diag: &mut ConfigDiagnostics) {
    if pages.is_empty() {
        diag.error_with_hint(
            PAGES,
            "no pages configured",
            "add a table such as [pages.en] with home = \"/index.html\"",
        );
        return;
    }

    for (lang, table) in pages {
        if !table.contains_key(HOME_PAGE) {
            diag.error(PAGES, format!("language `{lang}` has no `{HOME_PAGE}` page"));
        }
        for (page, path) in table {
            if !path.starts_with('/') {
                diag.error_with_hint(
                    PAGES,
                    format!("pages.{lang}.{page}: path `{path}` must start with `/`"),
                    format!("use \"/{}\"", path.trim_start_matches("./")),
                );
            }
        }
    }
}

/// Marker attribute names must be non-empty and distinct.
pub fn validate_markers(markers: &Markers, diag: &mut ConfigDiagnostics) {
    let mut seen = HashSet::new();
    for (kind, name) in markers.by_kind() {
        if name.trim().is_empty() {
            diag.error(MARKERS, format!("markers.{kind} must not be empty"));
        } else if name.chars().any(|c| c.is_ascii_whitespace() || c == '=' || c == '>') {
            diag.error(MARKERS, format!("markers.{kind}: `{name}` is not a valid attribute name"));
        } else if !seen.insert(name.to_ascii_lowercase()) {
            diag.error(MARKERS, format!("markers.{kind}: `{name}` is already used by another marker"));
        }
    }
}
