//! Editable page document.
//!
//! An [`EditableDocument`] owns the fetched page source and the marked
//! elements found in it. Edits are recorded per element and spliced into the
//! source when the document is serialized, so regions nobody touched are
//! emitted exactly as they were fetched.
//!
//! ```text
//! source ──scan──▶ [Element{span, content, attrs}]     (immutable, shared)
//!                      │
//! set_text/set_attr ──▶ edits: ElementId → Edit        (cheap to clone)
//!                      │
//! to_html() ─────────▶ splice edits over source, normalize doctype
//! ```

mod attrs;
mod scan;

pub use attrs::Attribute;

use crate::utils::html::{escape_attr_value, escape_text, unescape};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

/// Doctype written in front of every serialized document.
pub const DOCTYPE: &str = "<!doctype html>";

/// Handle to a marked element inside one [`EditableDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(usize);

/// A marked element located in the page source.
#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    /// Whole element, opening tag through closing tag.
    pub span: Range<usize>,
    /// Inner content; `None` for void and self-closing elements.
    pub content: Option<Range<usize>>,
    /// Where a missing attribute gets inserted.
    pub insert_at: usize,
    pub attrs: Vec<Attribute>,
    /// Decoded text content as fetched.
    pub text: String,
}

#[derive(Debug, Clone, Default)]
struct Edit {
    text: Option<String>,
    attrs: Vec<(String, String)>,
}

/// A replacement of `range` in the source with `text`.
struct Splice {
    range: Range<usize>,
    text: String,
}

#[derive(Debug, Clone)]
pub struct EditableDocument {
    source: Arc<str>,
    elements: Arc<[Element]>,
    edits: BTreeMap<ElementId, Edit>,
}

impl EditableDocument {
    /// Parse `source`, keeping every element that carries one of `markers`.
    ///
    /// Any input is accepted; malformed markup is read the way a browser
    /// would read it.
    pub fn parse(source: &str, markers: &[&str]) -> Self {
        let elements = scan::scan_marked(source, markers);
        Self {
            source: Arc::from(source),
            elements: elements.into(),
            edits: BTreeMap::new(),
        }
    }

    /// The page source as fetched.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether any edit has been recorded.
    pub fn is_edited(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Elements carrying `attr`, in page order, with the attribute's decoded value.
    pub fn elements_with<'a>(&'a self, attr: &'a str) -> impl Iterator<Item = (ElementId, String)> + 'a {
        self.elements.iter().enumerate().filter_map(move |(i, el)| {
            el.attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(attr))
                .map(|a| (ElementId(i), decode(a.raw_value.as_deref())))
        })
    }

    /// Current value of an attribute, reflecting edits. `None` if absent.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<String> {
        if let Some(edit) = self.edits.get(&id)
            && let Some((_, value)) = edit.attrs.iter().find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            return Some(value.clone());
        }
        self.element(id)
            .attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| decode(a.raw_value.as_deref()))
    }

    /// Current text content, reflecting edits.
    pub fn text(&self, id: ElementId) -> &str {
        self.edits
            .get(&id)
            .and_then(|e| e.text.as_deref())
            .unwrap_or(&self.element(id).text)
    }

    /// Replace the text content of an element.
    pub fn set_text(&mut self, id: ElementId, value: &str) {
        self.edits.entry(id).or_default().text = Some(value.to_string());
    }

    /// Set an attribute on an element, adding it when absent.
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        let edit = self.edits.entry(id).or_default();
        match edit.attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_string(),
            None => edit.attrs.push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    /// Serialize as `<!doctype html>`, the document markup, and a trailing newline.
    ///
    /// Any doctype in the fetched source is replaced by [`DOCTYPE`].
    pub fn to_html(&self) -> String {
        let markup = self.render_markup();
        let body = strip_doctype(&markup);
        format!("{DOCTYPE}\n{}\n", body.trim())
    }

    /// The fetched source with every recorded edit spliced in.
    pub fn render_markup(&self) -> String {
        let mut splices = self.collect_splices();
        splices.sort_by_key(|s| s.range.start);

        let source = &*self.source;
        let mut out = String::with_capacity(source.len() + 64);
        let mut cursor = 0;
        for splice in splices {
            // Inside a range an enclosing text edit already replaced
            if splice.range.start < cursor {
                continue;
            }
            out.push_str(&source[cursor..splice.range.start]);
            out.push_str(&splice.text);
            cursor = splice.range.end;
        }
        out.push_str(&source[cursor..]);
        out
    }

    fn collect_splices(&self) -> Vec<Splice> {
        let mut splices = Vec::new();
        for (id, edit) in &self.edits {
            let element = self.element(*id);

            for (name, value) in &edit.attrs {
                let quoted = format!("\"{}\"", escape_attr_value(value));
                let splice = match element.attrs.iter().find(|a| a.name == *name) {
                    Some(Attribute { value_span: Some(span), .. }) => Splice {
                        range: span.clone(),
                        text: quoted,
                    },
                    Some(Attribute { span, .. }) => Splice {
                        range: span.end..span.end,
                        text: format!("={quoted}"),
                    },
                    None => Splice {
                        range: element.insert_at..element.insert_at,
                        text: format!(" {name}={quoted}"),
                    },
                };
                splices.push(splice);
            }

            if let (Some(text), Some(content)) = (&edit.text, &element.content) {
                splices.push(Splice {
                    range: content.clone(),
                    text: escape_text(text).into_owned(),
                });
            }
        }
        splices
    }
}

fn decode(raw: Option<&str>) -> String {
    raw.map(|v| unescape(v).into_owned()).unwrap_or_default()
}

/// Remove a leading byte-order mark and `<!doctype ...>` declaration.
pub fn strip_doctype(markup: &str) -> &str {
    let rest = markup.trim_start_matches('\u{feff}').trim_start();
    let is_doctype = rest
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return rest;
    }
    match rest.find('>') {
        Some(end) => rest[end + 1..].trim_start(),
        None => rest,
    }
}
