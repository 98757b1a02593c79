//! Locate marked elements and their byte spans.
//!
//! A single forward pass over the page source. Opening tags go through
//! [`parse_open_tag`] so attribute offsets are exact; element boundaries
//! follow the HTML tree-construction rules a browser applies to the same
//! markup:
//!
//! - `<li>`, `<dd>`, `<dt>`, `<option>` and table parts close an open sibling
//! - block-level start tags close an open `<p>`
//! - an end tag closes everything opened inside the element it matches
//! - end of input closes whatever is still open
//!
//! Comments, `<script>`/`<style>` bodies and other raw text are skipped, so
//! markup quoted inside them is never mistaken for page content.

use super::Element;
use super::attrs::{OpenTag, parse_open_tag};
use crate::utils::html::{is_void_element, text_content, unescape};

/// Elements whose body is raw text up to the matching end tag.
const RAW_TEXT: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Elements whose body is text with entities but no tags.
const RCDATA: &[&str] = &["textarea", "title"];

/// Start tags that close an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dialog", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "li", "listing", "main", "menu", "nav", "ol", "p",
    "plaintext", "pre", "search", "section", "table", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that bound a lookup for an open element.
const SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// Boundaries when looking for an open table part.
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];

/// Scan `source` and return every element carrying one of `markers`,
/// ordered by position in the page.
pub(super) fn scan_marked(source: &str, markers: &[&str]) -> Vec<Element> {
    let mut scanner = Scanner {
        source,
        markers,
        stack: Vec::new(),
        found: Vec::new(),
    };
    scanner.run();

    scanner
        .found
        .into_iter()
        .map(|found| found.into_element(source))
        .collect()
}

/// An element on the open-element stack.
struct Open {
    name: String,
    /// Index into `Scanner::found` when the element is marked.
    found: Option<usize>,
}

/// A marked element, complete once it is closed.
struct Found {
    start: usize,
    tag: OpenTag,
    /// Void and self-closing elements have no content.
    void: bool,
    content_end: usize,
    end: usize,
}

impl Found {
    fn into_element(self, source: &str) -> Element {
        let content = (!self.void).then(|| self.tag.end..self.content_end);
        let text = content
            .as_ref()
            .map(|range| element_text(&self.tag.name, &source[range.clone()]))
            .unwrap_or_default();

        Element {
            name: self.tag.name,
            span: self.start..self.end,
            content,
            insert_at: self.tag.insert_at,
            attrs: self.tag.attrs,
            text,
        }
    }
}

struct Scanner<'a> {
    source: &'a str,
    markers: &'a [&'a str],
    stack: Vec<Open>,
    found: Vec<Found>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        let source = self.source;
        let mut i = 0;

        while let Some(offset) = source[i..].find('<') {
            let at = i + offset;
            let rest = &source[at..];

            i = if let Some(body) = rest.strip_prefix("<!--") {
                if body.starts_with('>') {
                    at + 5
                } else {
                    body.find("-->").map_or(source.len(), |pos| at + 4 + pos + 3)
                }
            } else if rest.starts_with("</") {
                self.end_tag(at)
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                after_gt(source, at)
            } else if let Some(tag) = parse_open_tag(source, at) {
                self.start_tag(at, tag)
            } else {
                at + 1
            };
        }

        self.close_from(0, source.len(), source.len());
    }

    /// Handle a start tag at `at`; returns where scanning resumes.
    fn start_tag(&mut self, at: usize, tag: OpenTag) -> usize {
        self.close_implied(&tag.name, at);

        let marked = self.markers.iter().any(|m| tag.attr(m).is_some());
        let name = tag.name.clone();
        let tag_end = tag.end;
        let void = tag.self_closing || is_void_element(&name);

        let found = marked.then(|| {
            self.found.push(Found {
                start: at,
                tag,
                void,
                content_end: tag_end,
                end: tag_end,
            });
            self.found.len() - 1
        });

        if void {
            return tag_end;
        }

        if RAW_TEXT.contains(&name.as_str()) || RCDATA.contains(&name.as_str()) {
            let (content_end, end) = find_end_tag(self.source, tag_end, &name)
                .unwrap_or((self.source.len(), self.source.len()));
            if let Some(index) = found {
                self.finish(index, content_end, end);
            }
            return end;
        }

        self.stack.push(Open { name, found });
        tag_end
    }

    /// Handle an end tag at `at`; returns where scanning resumes.
    fn end_tag(&mut self, at: usize) -> usize {
        let end = after_gt(self.source, at);
        let Some(name) = end_tag_name(self.source, at) else {
            return end;
        };

        let stops: &[&str] = match name.as_str() {
            "p" => &["button"],
            "li" => &["ol", "ul"],
            _ => &[],
        };
        // A stray end tag closes nothing
        if let Some(index) = self.find_open(|n| n == name, SCOPE, stops) {
            self.close_from(index, at, end);
        }
        end
    }

    /// Close the elements a start tag named `name` ends implicitly.
    fn close_implied(&mut self, name: &str, at: usize) {
        match name {
            "li" => self.close_open(|n| n == "li", SCOPE, &["ol", "ul"], at),
            "dd" | "dt" => self.close_open(|n| n == "dd" || n == "dt", SCOPE, &["dl"], at),
            "tr" => self.close_open(|n| n == "tr", TABLE_SCOPE, &["thead", "tbody", "tfoot"], at),
            "td" | "th" => self.close_open(|n| n == "td" || n == "th", TABLE_SCOPE, &["tr"], at),
            "thead" | "tbody" | "tfoot" => self.close_open(
                |n| matches!(n, "thead" | "tbody" | "tfoot"),
                TABLE_SCOPE,
                &[],
                at,
            ),
            "option" | "optgroup" => {
                if self.current() == Some("option") {
                    self.close_from(self.stack.len() - 1, at, at);
                }
            }
            _ => {}
        }

        if CLOSES_P.contains(&name) {
            self.close_open(|n| n == "p", SCOPE, &["button"], at);
        }

        if HEADINGS.contains(&name) && self.current().is_some_and(|n| HEADINGS.contains(&n)) {
            self.close_from(self.stack.len() - 1, at, at);
        }
    }

    fn current(&self) -> Option<&str> {
        self.stack.last().map(|open| open.name.as_str())
    }

    fn close_open(
        &mut self,
        matches: impl Fn(&str) -> bool,
        scope: &[&str],
        stops: &[&str],
        at: usize,
    ) {
        if let Some(index) = self.find_open(matches, scope, stops) {
            self.close_from(index, at, at);
        }
    }

    /// Innermost open element satisfying `matches`, not looking past an
    /// element in `scope` or `stops`.
    fn find_open(
        &self,
        matches: impl Fn(&str) -> bool,
        scope: &[&str],
        stops: &[&str],
    ) -> Option<usize> {
        for (index, open) in self.stack.iter().enumerate().rev() {
            if matches(&open.name) {
                return Some(index);
            }
            if scope.contains(&open.name.as_str()) || stops.contains(&open.name.as_str()) {
                return None;
            }
        }
        None
    }

    /// Pop `stack[index..]`. Elements above `index` end where the closing
    /// markup begins; the element at `index` ends at `end`.
    fn close_from(&mut self, index: usize, at: usize, end: usize) {
        while self.stack.len() > index {
            let Some(open) = self.stack.pop() else { break };
            let end = if self.stack.len() == index { end } else { at };
            if let Some(found) = open.found {
                self.finish(found, at, end);
            }
        }
    }

    fn finish(&mut self, index: usize, content_end: usize, end: usize) {
        let found = &mut self.found[index];
        found.content_end = content_end;
        found.end = end;
    }
}

/// Text content of an element body, as `textContent` would report it.
fn element_text(name: &str, body: &str) -> String {
    if RAW_TEXT.contains(&name) {
        body.to_string()
    } else if RCDATA.contains(&name) {
        unescape(body).into_owned()
    } else {
        text_content(body)
    }
}

/// One past the next `>` at or after `at`, or the end of input.
fn after_gt(source: &str, at: usize) -> usize {
    source[at..].find('>').map_or(source.len(), |pos| at + pos + 1)
}

/// Lowercased name of the end tag at `at`; `None` for `</>` and bogus comments.
fn end_tag_name(source: &str, at: usize) -> Option<String> {
    let rest = &source[at + 2..];
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let len = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    Some(rest[..len].to_ascii_lowercase())
}

/// Find `</name` at or after `from`. Returns where it starts and one past its `>`.
fn find_end_tag(source: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut i = from;
    while let Some(pos) = source[i..].find("</") {
        let at = i + pos;
        let name_end = at + 2 + name.len();
        let matches = bytes
            .get(at + 2..name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()));
        let bounded = bytes
            .get(name_end)
            .is_none_or(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>');
        if matches && bounded {
            return Some((at, after_gt(source, at)));
        }
        i = at + 2;
    }
    None
}
