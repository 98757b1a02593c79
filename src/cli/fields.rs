//! `fields` command: print a page's editable fields.
//!
//! The text output mirrors the admin page's form: one block per group,
//! one line per field with its label, key, control and current value.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Write;

use super::common::open_page;
use crate::activity::ActivityLog;
use crate::cli::args::PageArgs;
use crate::config::AdminConfig;
use crate::form::{self, FormGroup, Widget};
use crate::loader;
use crate::net::Transport;
use crate::registry::Selection;

/// JSON shape of `fields --json`.
#[derive(Debug, Serialize)]
pub struct FieldsReport<'a> {
    pub selection: &'a Selection,
    pub path: &'a str,
    pub groups: &'a [FormGroup],
}

pub fn run_fields(
    config: &AdminConfig,
    transport: &dyn Transport,
    target: &PageArgs,
    json: bool,
) -> Result<()> {
    // JSON output stays machine-readable: progress lines are not echoed
    let activity = if json {
        ActivityLog::new()
    } else {
        ActivityLog::echoing()
    };
    let session = open_page(config, transport, target, &activity)?;
    let groups = form::build(&session.fields);

    if json {
        let report = FieldsReport {
            selection: &session.selection,
            path: &session.path,
            groups: &groups,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if groups.is_empty() {
        println!("{}", loader::EMPTY_NOTICE);
    } else {
        print!("{}", render_text(&groups));
    }
    Ok(())
}

fn render_text(groups: &[FormGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.title.bold());
        for field in &group.fields {
            let widget = match field.widget {
                Widget::Input => "",
                Widget::Textarea => " (multi-line)",
            };
            let _ = writeln!(
                out,
                "  {} {}{}",
                field.label,
                format!("[{}, {}]", field.key, field.kind).dimmed(),
                widget.dimmed()
            );
            for line in field.value.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Markers;
    use crate::session::Session;

    #[test]
    fn test_render_text() {
        let page = r#"<h1 data-edit="hero.ctaLabel">Start now</h1><a data-edit-mailto="contact.email" href="mailto:a@b.c">a@b.c</a>"#;
        let session =
            Session::from_html(Selection::default(), "/index.html", page, &Markers::default());
        let out = render_text(&form::build(&session.fields));

        assert!(out.contains("Contact"));
        assert!(out.contains("Hero Cta Label"));
        assert!(out.contains("hero.ctaLabel, text"));
        assert!(out.contains("contact.email, mailto"));
        assert!(out.contains("    Start now"));
        // Groups in name order
        assert!(out.find("Contact").unwrap() < out.find("Hero").unwrap());
    }

    #[test]
    fn test_report_json_shape() {
        let page = r#"<p data-edit="about.body">Text</p>"#;
        let session =
            Session::from_html(Selection::new("zh", "home"), "/zh/index.html", page, &Markers::default());
        let groups = form::build(&session.fields);
        let report = FieldsReport {
            selection: &session.selection,
            path: &session.path,
            groups: &groups,
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["selection"]["lang"], "zh");
        assert_eq!(value["path"], "/zh/index.html");
        assert_eq!(value["groups"][0]["name"], "about");
        assert_eq!(value["groups"][0]["fields"][0]["widget"], "input");
        assert_eq!(value["groups"][0]["fields"][0]["kind"], "text");
    }
}
