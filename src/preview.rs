//! Live preview rendering.
//!
//! The preview is inline frame content (`srcdoc`), never a URL, so the frame
//! shows the in-memory document rather than what is published. A `<base>`
//! tag makes root-relative assets resolve against the page's language
//! subtree.

use crate::registry::PageRegistry;
use crate::session::Session;
use crate::utils::html::escape;

/// Marker the base tag is inserted after.
const HEAD_OPEN: &str = "<head>";

/// Insert `<base href>` right after the first literal `<head>`.
///
/// Documents without a bare `<head>` tag are returned unchanged.
pub fn with_base(html: &str, base_href: &str) -> String {
    html.replacen(
        HEAD_OPEN,
        &format!("{HEAD_OPEN}\n    <base href=\"{}\" />", escape(base_href)),
        1,
    )
}

/// Preview content for the current state of `session`, with the base made
/// absolute against the site `origin`.
///
/// Needed when the preview is shown from a different origin than the site
/// (the local admin server), where a bare `/zh/` would point at the wrong host.
pub fn render_for_origin(session: &Session, registry: &PageRegistry, origin: &str) -> String {
    let base = format!(
        "{}{}",
        origin.trim_end_matches('/'),
        registry.base_href(&session.path)
    );
    with_base(&session.to_html(), &base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Markers;
    use crate::registry::Selection;

    const PAGE: &str = "<!DOCTYPE html>\n<html><head><title>x</title></head><body><p data-edit=\"a\">one</p></body></html>";

    fn session(selection: Selection, path: &str) -> Session {
        Session::from_html(selection, path, PAGE, &Markers::default())
    }

    #[test]
    fn test_with_base_inserts_once() {
        let html = with_base("<html><head></head><body><head></head></body></html>", "/zh/");
        assert_eq!(html.matches("<base").count(), 1);
        assert!(html.starts_with("<html><head>\n    <base href=\"/zh/\" /></head>"));
    }

    #[test]
    fn test_with_base_without_head() {
        let html = "<html><head lang=\"x\"></head></html>";
        assert_eq!(with_base(html, "/"), html);
    }

    #[test]
    fn test_render_root_page() {
        let registry = PageRegistry::default();
        let s = session(Selection::default(), "/index.html");
        let preview = render_for_origin(&s, &registry, "https://churomi.com");
        assert!(preview.starts_with("<!doctype html>\n"));
        assert!(preview.contains("<head>\n    <base href=\"https://churomi.com/\" />"));
    }

    #[test]
    fn test_render_language_subtree() {
        let registry = PageRegistry::default();
        let s = session(Selection::new("zh", "home"), "/zh/index.html");
        let preview = render_for_origin(&s, &registry, "https://churomi.com/");
        assert!(preview.contains("<base href=\"https://churomi.com/zh/\" />"));
    }

    #[test]
    fn test_render_reflects_edits() {
        let registry = PageRegistry::default();
        let s = session(Selection::default(), "/index.html")
            .with_edit("a", "two")
            .unwrap();
        let preview = render_for_origin(&s, &registry, "http://127.0.0.1:8000");
        assert!(preview.contains("<p data-edit=\"a\">two</p>"));
    }
}
