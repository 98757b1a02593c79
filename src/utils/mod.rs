//! Shared helpers: HTML escaping, MIME types, path handling.

pub mod html;
pub mod mime;
pub mod path;
