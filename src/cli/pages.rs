//! `pages` command: list the page registry.

use crate::config::AdminConfig;
use crate::registry::PageRegistry;
use owo_colors::OwoColorize;
use std::fmt::Write;

pub fn run_pages(config: &AdminConfig) {
    print!("{}", render(&config.registry(), config.origin()));
}

/// One line per `(language, page)`: `en  home     https://site/index.html`.
fn render(registry: &PageRegistry, origin: &str) -> String {
    let width = registry
        .languages()
        .flat_map(|lang| registry.pages(lang))
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for lang in registry.languages() {
        for (page, path) in registry.pages(lang) {
            let _ = writeln!(
                out,
                "{}  {page:<width$}  {}{}",
                lang.bold(),
                origin.dimmed(),
                path
            );
        }
    }
    out
}
