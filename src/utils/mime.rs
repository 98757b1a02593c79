//! MIME type constants for the admin server and exports.

/// Common MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";

    /// Content type of downloaded page exports.
    pub const HTML_DOWNLOAD: &str = "text/html;charset=utf-8";
}
