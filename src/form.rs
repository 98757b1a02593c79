//! Edit form generation.
//!
//! Fields are grouped by the first segment of their key. Groups and the
//! fields inside them are sorted by name, ignoring case; every group starts
//! expanded.
//! [`render_html`] turns the model into the markup the admin page shows.

use crate::field::{FieldKind, FieldMap, group_name, label_from_key, title_case};
use crate::utils::html::escape;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Values longer than this get a multi-line control.
pub const LONG_VALUE_CHARS: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Input,
    Textarea,
}

impl Widget {
    /// Pick the control for a value.
    pub fn for_value(value: &str) -> Self {
        if value.chars().count() > LONG_VALUE_CHARS || value.contains('\n') {
            Self::Textarea
        } else {
            Self::Input
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormGroup {
    pub name: String,
    pub title: String,
    pub open: bool,
    pub fields: Vec<FormField>,
}

/// Build the form model for a page's fields.
pub fn build(fields: &FieldMap) -> Vec<FormGroup> {
    let mut groups: BTreeMap<&str, Vec<FormField>> = BTreeMap::new();
    for field in fields.iter() {
        groups
            .entry(group_name(&field.key))
            .or_default()
            .push(FormField {
                key: field.key.clone(),
                label: label_from_key(&field.key),
                kind: field.kind,
                value: field.value.clone(),
                widget: Widget::for_value(&field.value),
            });
    }

    let mut groups: Vec<_> = groups
        .into_iter()
        .map(|(name, mut fields)| {
            fields.sort_by(|a, b| by_name(&a.key, &b.key));
            FormGroup {
                name: name.to_string(),
                title: title_case(name),
                open: true,
                fields,
            }
        })
        .collect();
    groups.sort_by(|a, b| by_name(&a.name, &b.name));
    groups
}

/// Case-insensitive order; names equal but for case fall back to byte order.
fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Element id for a field control, unique per key.
///
/// ASCII letters, digits and `-` are kept; every other byte is written as
/// `_` plus two hex digits, so `a.b` and `a-b` stay distinct.
fn dom_id(key: &str) -> String {
    let mut id = String::from("field-");
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            id.push(char::from(byte));
        } else {
            let _ = write!(id, "_{byte:02x}");
        }
    }
    id
}

/// Render the form as collapsible `<details>` blocks.
///
/// Every control carries `data-key` so the page script can send edits back.
pub fn render_html(groups: &[FormGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let open = if group.open { " open" } else { "" };
        let _ = writeln!(out, "<details class=\"admin-module\"{open}>");
        let _ = writeln!(out, "  <summary>{}</summary>", escape(&group.title));
        let _ = writeln!(out, "  <div class=\"admin-field-row\">");
        for field in &group.fields {
            render_field(&mut out, field);
        }
        let _ = writeln!(out, "  </div>");
        let _ = writeln!(out, "</details>");
    }
    out
}

fn render_field(out: &mut String, field: &FormField) {
    let key = escape(&field.key);
    let id = dom_id(&field.key);

    let _ = writeln!(out, "    <div class=\"admin-field\" data-kind=\"{}\">", field.kind);
    let _ = writeln!(out, "      <label for=\"{id}\">{}</label>", escape(&field.label));
    match field.widget {
        Widget::Textarea => {
            let _ = writeln!(
                out,
                "      <textarea id=\"{id}\" data-key=\"{key}\" rows=\"4\">{}</textarea>",
                escape(&field.value)
            );
        }
        Widget::Input => {
            let _ = writeln!(
                out,
                "      <input id=\"{id}\" type=\"text\" data-key=\"{key}\" value=\"{}\" />",
                escape(&field.value)
            );
        }
    }
    let _ = writeln!(out, "      <div class=\"admin-key\">{key}</div>");
    let _ = writeln!(out, "    </div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EditableDocument;
    use crate::field::Markers;

    fn fields(src: &str) -> FieldMap {
        let markers = Markers::default();
        let doc = EditableDocument::parse(src, &markers.names());
        FieldMap::extract(&doc, &markers)
    }

    #[test]
    fn test_groups_sorted_and_open() {
        let groups = build(&fields(
            r#"<p data-edit="zeta.a">1</p><p data-edit="hero.title">2</p><p data-edit="hero.ctaLabel">3</p><a data-edit-href="links.0.href" href="/">4</a>"#,
        ));

        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["hero", "links", "zeta"]);
        assert!(groups.iter().all(|g| g.open));

        let hero = &groups[0];
        assert_eq!(hero.title, "Hero");
        let keys: Vec<_> = hero.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["hero.ctaLabel", "hero.title"]);
        assert_eq!(hero.fields[0].label, "Hero Cta Label");

        assert_eq!(groups[1].fields[0].label, "Links [0] Href");
        assert_eq!(groups[1].fields[0].kind, FieldKind::Href);
    }

    #[test]
    fn test_sort_ignores_case() {
        let groups = build(&fields(
            r#"<p data-edit="beta.x">1</p><p data-edit="Alpha.b">2</p><p data-edit="Alpha.A">3</p><p data-edit="Alpha.c">4</p>"#,
        ));

        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "beta"]);
        let keys: Vec<_> = groups[0].fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["Alpha.A", "Alpha.b", "Alpha.c"]);
    }

    #[test]
    fn test_dom_ids_are_distinct() {
        assert_eq!(dom_id("hero.title"), "field-hero_2etitle");
        assert_eq!(dom_id("hero-title"), "field-hero-title");
        assert_eq!(dom_id("hero_title"), "field-hero_5ftitle");
        assert_ne!(dom_id("a.b"), dom_id("a-b"));
        assert_eq!(dom_id("é"), "field-_c3_a9");
    }

    #[test]
    fn test_widget_choice() {
        assert_eq!(Widget::for_value("short"), Widget::Input);
        assert_eq!(Widget::for_value(&"x".repeat(90)), Widget::Input);
        assert_eq!(Widget::for_value(&"x".repeat(91)), Widget::Textarea);
        assert_eq!(Widget::for_value("two\nlines"), Widget::Textarea);
    }

    #[test]
    fn test_render_html_controls() {
        let long = "word ".repeat(30);
        let src = format!(
            r#"<p data-edit="about.body">{long}</p><h1 data-edit="hero.title">Say "hi" &amp; wave</h1>"#
        );
        let html = render_html(&build(&fields(&src)));

        assert_eq!(html.matches("<details class=\"admin-module\" open>").count(), 2);
        assert!(html.contains("<summary>About</summary>"));
        assert!(html.contains("<textarea id=\"field-about_2ebody\" data-key=\"about.body\""));
        assert!(html.contains("<label for=\"field-about_2ebody\">About Body</label>"));
        assert!(html.contains(
            "<input id=\"field-hero_2etitle\" type=\"text\" data-key=\"hero.title\" value=\"Say &quot;hi&quot; &amp; wave\" />"
        ));
        assert!(html.contains("<div class=\"admin-key\">hero.title</div>"));
    }

    #[test]
    fn test_empty_form() {
        assert!(build(&FieldMap::default()).is_empty());
        assert_eq!(render_html(&[]), "");
    }
}
