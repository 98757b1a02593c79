//! Page registry: `(language, page)` → site path.
//!
//! The registry is fixed once configuration is loaded. Paths are
//! root-relative (`/zh/privacy.html`) and double as repository paths once
//! the leading `/` is removed.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical name of the landing page.
pub const HOME_PAGE: &str = "home";

/// Path used when a selection is not in the registry.
pub const DEFAULT_PATH: &str = "/index.html";

/// Characters kept as-is in a path segment (same set as `encodeURIComponent`).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Language → page → path table, as written in config.
pub type PageTable = BTreeMap<String, BTreeMap<String, String>>;

/// The active `(language, page)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub lang: String,
    pub page: String,
}

impl Selection {
    pub fn new(lang: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            page: page.into(),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new("en", HOME_PAGE)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lang, self.page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRegistry {
    pages: PageTable,
}

impl PageRegistry {
    pub fn new(pages: PageTable) -> Self {
        Self { pages }
    }

    /// Built-in registry: English at the site root, Chinese under `/zh/`.
    pub fn default_table() -> PageTable {
        let lang = |prefix: &str| {
            [HOME_PAGE, "privacy", "terms"]
                .into_iter()
                .map(|page| {
                    let file = if page == HOME_PAGE { "index" } else { page };
                    (page.to_string(), format!("{prefix}/{file}.html"))
                })
                .collect::<BTreeMap<_, _>>()
        };
        BTreeMap::from([("en".to_string(), lang("")), ("zh".to_string(), lang("/zh"))])
    }

    /// Site path for `selection`, or [`DEFAULT_PATH`] when unknown.
    pub fn resolve(&self, selection: &Selection) -> &str {
        self.pages
            .get(&selection.lang)
            .and_then(|pages| pages.get(&selection.page))
            .map_or(DEFAULT_PATH, String::as_str)
    }

    pub fn contains(&self, selection: &Selection) -> bool {
        self.pages
            .get(&selection.lang)
            .is_some_and(|pages| pages.contains_key(&selection.page))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Logical pages of `lang`, in name order.
    pub fn pages(&self, lang: &str) -> impl Iterator<Item = (&str, &str)> {
        self.pages
            .get(lang)
            .into_iter()
            .flat_map(|pages| pages.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Base href for previewing `path`: the language subtree it lives in,
    /// or `/` for pages at the site root.
    pub fn base_href(&self, path: &str) -> String {
        self.languages()
            .map(|lang| format!("/{lang}/"))
            .find(|prefix| path.starts_with(prefix.as_str()))
            .unwrap_or_else(|| "/".to_string())
    }
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new(Self::default_table())
    }
}

/// Repository path of a site path (leading `/` removed).
pub fn repo_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Percent-encode one path segment or query value.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encode each `/`-separated segment of a repository path.
pub fn encode_repo_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
