//! Export the edited page as a standalone HTML file.

use crate::registry::Selection;
use crate::session::Session;
use crate::utils::mime;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// A serialized page ready to be downloaded or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub content: String,
}

impl Export {
    pub fn new(site: &str, session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            file_name: file_name(site, &session.selection, now),
            content: session.to_html(),
        }
    }

    pub const fn content_type(&self) -> &'static str {
        mime::types::HTML_DOWNLOAD
    }

    /// Write into `dir`, creating it if needed. Returns the written path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// `{site}-{lang}-{page}-{timestamp}.html`, with `:` and `.` of the UTC
/// timestamp replaced so the name is valid everywhere.
pub fn file_name(site: &str, selection: &Selection, now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{site}-{}-{}-{stamp}.html", selection.lang, selection.page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Markers;
    use chrono::TimeZone;

    const PAGE: &str = "<!DOCTYPE html>\n<html><head><title>T</title></head>\n<body><p data-edit=\"a.b\">one</p></body>\n</html>\n";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123)
    }

    fn session() -> Session {
        Session::from_html(Selection::new("zh", "terms"), "/zh/terms.html", PAGE, &Markers::default())
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("churomi", &Selection::new("zh", "terms"), at()),
            "churomi-zh-terms-2026-10-19T08-30-00-123Z.html"
        );
    }

    #[test]
    fn test_unedited_export_matches_source() {
        let export = Export::new("site", &session(), at());
        let expected = PAGE.replacen("<!DOCTYPE html>", "<!doctype html>", 1);
        assert_eq!(export.content, expected);
        assert_eq!(export.content_type(), "text/html;charset=utf-8");
    }

    #[test]
    fn test_export_carries_edits() {
        let edited = session().with_edit("a.b", "two").unwrap();
        let export = Export::new("site", &edited, at());
        assert!(export.content.contains("<p data-edit=\"a.b\">two</p>"));
    }

    #[test]
    fn test_write_to_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let export = Export::new("site", &session(), at());

        let path = export.write_to(&out).unwrap();
        assert_eq!(path, out.join("site-zh-terms-2026-10-19T08-30-00-123Z.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), export.content);
    }
}
