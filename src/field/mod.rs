//! Editable fields extracted from a page.
//!
//! A field is one logical piece of content named by a dotted key
//! (`hero.title`, `links.0.href`). The same key may mark several elements
//! (a phone number in the header and the footer, say); every edit fans out
//! to all of them so the copies never drift apart.
//!
//! Three marker attributes select the field kind:
//!
//! | Marker (default)    | Kind     | Value read from / written to          |
//! |---------------------|----------|---------------------------------------|
//! | `data-edit`         | `text`   | text content                          |
//! | `data-edit-href`    | `href`   | `href` attribute                      |
//! | `data-edit-mailto`  | `mailto` | `href` (without `mailto:`) and text   |

mod label;

pub use label::{group_name, label_from_key, title_case};

use crate::document::{EditableDocument, ElementId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Prefix of mail contact link targets.
pub const MAILTO_PREFIX: &str = "mailto:";

/// Attribute a link or mail field writes to.
const HREF: &str = "href";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Href,
    Mailto,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Href => "href",
            Self::Mailto => "mailto",
        })
    }
}

/// Marker attribute names, one per field kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub text: String,
    pub href: String,
    pub mailto: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            text: "data-edit".to_string(),
            href: "data-edit-href".to_string(),
            mailto: "data-edit-mailto".to_string(),
        }
    }
}

impl Markers {
    /// Markers in scan order, paired with the kind they produce.
    pub fn by_kind(&self) -> [(FieldKind, &str); 3] {
        [
            (FieldKind::Text, self.text.as_str()),
            (FieldKind::Href, self.href.as_str()),
            (FieldKind::Mailto, self.mailto.as_str()),
        ]
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.text, &self.href, &self.mailto]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// One editable unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub kind: FieldKind,
    pub value: String,
    /// Every element marked with this key, in scan order.
    pub elements: Vec<ElementId>,
}

/// Fields of one page, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(BTreeMap<String, Field>);

impl FieldMap {
    /// Collect all marked fields of `doc`.
    ///
    /// Text markers are scanned first, then link markers, then mail markers.
    /// A key's kind is fixed by the first marker that named it.
    pub fn extract(doc: &EditableDocument, markers: &Markers) -> Self {
        let mut fields: BTreeMap<String, Field> = BTreeMap::new();

        for (kind, marker) in markers.by_kind() {
            for (id, key) in doc.elements_with(marker) {
                if key.is_empty() {
                    continue;
                }
                let field = fields.entry(key.clone()).or_insert_with(|| Field {
                    key,
                    kind,
                    value: String::new(),
                    elements: Vec::new(),
                });
                if !field.elements.contains(&id) {
                    field.elements.push(id);
                }
            }
        }

        // Values come from the first element that named the key
        for field in fields.values_mut() {
            if let Some(&first) = field.elements.first() {
                field.value = read_value(doc, first, field.kind);
            }
        }

        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.values()
    }

    /// Write `value` into every element of field `key`, using the field's
    /// update rule, and remember it as the field's current value.
    pub fn apply(
        &mut self,
        doc: &mut EditableDocument,
        key: &str,
        value: &str,
    ) -> Result<(), EditError> {
        let field = self
            .0
            .get_mut(key)
            .ok_or_else(|| EditError::UnknownField(key.to_string()))?;

        match field.kind {
            FieldKind::Href => {
                for &id in &field.elements {
                    doc.set_attr(id, HREF, value);
                }
                field.value = value.to_string();
            }
            FieldKind::Mailto => {
                let email = value.trim();
                let target = format!("{MAILTO_PREFIX}{email}");
                for &id in &field.elements {
                    doc.set_attr(id, HREF, &target);
                    doc.set_text(id, email);
                }
                field.value = email.to_string();
            }
            FieldKind::Text => {
                for &id in &field.elements {
                    doc.set_text(id, value);
                }
                field.value = value.to_string();
            }
        }
        Ok(())
    }
}

/// Read a field's current value from one of its elements.
fn read_value(doc: &EditableDocument, id: ElementId, kind: FieldKind) -> String {
    match kind {
        FieldKind::Href => doc.attr(id, HREF).unwrap_or_default(),
        FieldKind::Mailto => match doc.attr(id, HREF) {
            Some(href) if href.starts_with(MAILTO_PREFIX) => {
                href[MAILTO_PREFIX.len()..].to_string()
            }
            _ => doc.text(id).trim().to_string(),
        },
        FieldKind::Text => doc.text(id).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(src: &str) -> (EditableDocument, FieldMap) {
        let markers = Markers::default();
        let doc = EditableDocument::parse(src, &markers.names());
        let fields = FieldMap::extract(&doc, &markers);
        (doc, fields)
    }

    #[test]
    fn test_extract_kinds_and_values() {
        let (_, fields) = load(
            r#"<html><body>
<h1 data-edit="hero.title">  Hello
  world </h1>
<a data-edit-href="links.0.href" href="/docs">Docs</a>
<a data-edit-mailto="contact.email" href="mailto:hello@example.com">Write us</a>
</body></html>"#,
        );

        assert_eq!(fields.len(), 3);

        let title = fields.get("hero.title").unwrap();
        assert_eq!(title.kind, FieldKind::Text);
        assert_eq!(title.value, "Hello\n  world");

        let link = fields.get("links.0.href").unwrap();
        assert_eq!(link.kind, FieldKind::Href);
        assert_eq!(link.value, "/docs");

        let mail = fields.get("contact.email").unwrap();
        assert_eq!(mail.kind, FieldKind::Mailto);
        assert_eq!(mail.value, "hello@example.com");
    }

    #[test]
    fn test_mailto_falls_back_to_text() {
        let (_, fields) = load(r#"<a data-edit-mailto="c" href="/contact"> hi@example.com </a>"#);
        assert_eq!(fields.get("c").unwrap().value, "hi@example.com");

        let (_, fields) = load(r#"<span data-edit-mailto="c">me@example.com</span>"#);
        assert_eq!(fields.get("c").unwrap().value, "me@example.com");
    }

    #[test]
    fn test_missing_href_reads_empty() {
        let (_, fields) = load(r#"<a data-edit-href="nav.x">x</a>"#);
        assert_eq!(fields.get("nav.x").unwrap().value, "");
    }

    #[test]
    fn test_empty_page_yields_no_fields() {
        let (_, fields) = load("<html><body><p>static</p></body></html>");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_empty_key_ignored() {
        let (_, fields) = load(r#"<p data-edit="">x</p><p data-edit="ok">y</p>"#);
        assert_eq!(fields.len(), 1);
        assert!(fields.get("ok").is_some());
    }

    #[test]
    fn test_duplicate_key_updates_all_elements() {
        let (mut doc, mut fields) = load(
            r#"<header><b data-edit="brand.phone">555-0100</b></header>
<main><p>Call <span data-edit="brand.phone">555-0100</span></p></main>
<footer><i data-edit="brand.phone">555-0100</i></footer>"#,
        );

        let field = fields.get("brand.phone").unwrap();
        assert_eq!(field.elements.len(), 3);

        fields.apply(&mut doc, "brand.phone", "555-0199").unwrap();

        let field = fields.get("brand.phone").unwrap();
        for &id in &field.elements {
            assert_eq!(doc.text(id), "555-0199");
        }
        let html = doc.to_html();
        assert_eq!(html.matches("555-0199").count(), 3);
        assert!(!html.contains("555-0100"));
    }

    #[test]
    fn test_mailto_edit_updates_href_and_text() {
        let (mut doc, mut fields) = load(
            r#"<a data-edit-mailto="contact.email" href="mailto:hello@example.com">hello@example.com</a>"#,
        );

        fields
            .apply(&mut doc, "contact.email", "  new@example.com ")
            .unwrap();

        let field = fields.get("contact.email").unwrap();
        assert_eq!(field.value, "new@example.com");
        let id = field.elements[0];
        assert_eq!(doc.attr(id, "href").as_deref(), Some("mailto:new@example.com"));
        assert_eq!(doc.text(id), "new@example.com");
    }

    #[test]
    fn test_href_edit_keeps_text() {
        let (mut doc, mut fields) = load(r#"<a data-edit-href="cta" href="/a">Start</a>"#);
        fields.apply(&mut doc, "cta", "/b").unwrap();

        let id = fields.get("cta").unwrap().elements[0];
        assert_eq!(doc.attr(id, "href").as_deref(), Some("/b"));
        assert_eq!(doc.text(id), "Start");
    }

    #[test]
    fn test_text_edit_is_verbatim() {
        let (mut doc, mut fields) = load(r#"<p data-edit="p">x</p>"#);
        fields.apply(&mut doc, "p", "  spaced  ").unwrap();
        assert_eq!(fields.get("p").unwrap().value, "  spaced  ");
        assert!(doc.to_html().contains(r#"<p data-edit="p">  spaced  </p>"#));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let (mut doc, mut fields) = load(r#"<p data-edit="p">x</p>"#);
        assert_eq!(
            fields.apply(&mut doc, "nope", "y"),
            Err(EditError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_first_marker_kind_wins() {
        let (_, fields) = load(
            r#"<a data-edit-href="dup" href="/x">A</a><p data-edit="dup">B</p>"#,
        );
        let field = fields.get("dup").unwrap();
        // Text markers are scanned before link markers
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.elements.len(), 2);
        assert_eq!(field.value, "B");
    }
}
