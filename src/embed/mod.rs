//! Embedded static resources for the admin page.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `admin` - Admin page (admin.html, admin.js, admin.css)
//!
//! # Usage
//!
//! ```ignore
//! use embed::admin::{ADMIN_HTML, AdminVars};
//!
//! let html = ADMIN_HTML.render(&AdminVars {
//!     site: "churomi",
//!     origin: "https://churomi.com",
//!     repo: "RadanPY/churomi-site@main",
//!     version: env!("CARGO_PKG_VERSION"),
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod admin {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for admin.html.
    pub struct AdminVars<'a> {
        pub site: &'a str,
        pub origin: &'a str,
        pub repo: &'a str,
        pub version: &'a str,
    }

    impl TemplateVars for AdminVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE__", &escape(self.site))
                .replace("__ORIGIN__", &escape(self.origin))
                .replace("__REPO__", &escape(self.repo))
                .replace("__VERSION__", &escape(self.version))
        }
    }

    /// Admin page shell; the script fills it from `/api/state`.
    pub const ADMIN_HTML: Template<AdminVars<'static>> =
        Template::new(include_str!("admin/admin.html"));

    /// Admin page behavior.
    pub const ADMIN_JS: &str = include_str!("admin/admin.js");

    /// Admin page styles.
    pub const ADMIN_CSS: &str = include_str!("admin/admin.css");

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_admin_html_vars() {
            let html = ADMIN_HTML.render(&AdminVars {
                site: "a&b",
                origin: "https://churomi.com",
                repo: "RadanPY/churomi-site@main",
                version: "0.1.0",
            });
            assert!(html.contains("a&amp;b"));
            assert!(html.contains("RadanPY/churomi-site@main"));
            assert!(!html.contains("__SITE__"));
            assert!(!html.contains("__VERSION__"));
            assert!(html.contains("/admin.js"));
        }

        #[test]
        fn test_assets_wire_controls() {
            for id in [
                "langSelect",
                "pageSelect",
                "reloadBtn",
                "downloadBtn",
                "publishBtn",
                "tokenInput",
                "commitInput",
                "modules",
                "previewFrame",
                "log",
            ] {
                assert!(ADMIN_HTML.content().contains(&format!("id=\"{id}\"")), "{id}");
                assert!(ADMIN_JS.contains(id), "{id}");
            }
            assert!(ADMIN_CSS.contains(".admin-module"));
        }
    }
}
