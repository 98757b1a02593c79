//! Configuration section definitions.
//!
//! Each module corresponds to a section in `pagedit.toml`:
//!
//! | Module  | TOML Section    | Purpose                              |
//! |---------|-----------------|--------------------------------------|
//! | `pages` | `[pages.<lang>]`| Page registry and marker attributes  |
//! | `repo`  | `[repo]`        | Repository publishing target         |
//! | `serve` | `[serve]`       | Admin server                         |
//! | `site`  | `[site]`        | Site name and origin                 |

pub mod pages;
mod repo;
mod serve;
mod site;

pub use repo::RepoConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
