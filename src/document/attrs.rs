//! Opening-tag lexer that keeps byte offsets.
//!
//! The editor rewrites single attribute values in place, so it needs to know
//! exactly where each attribute sits in the page source. Everything outside
//! the rewritten value stays byte-for-byte identical.

use std::ops::Range;

/// One attribute of an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Value as written in the source (entities not decoded, quotes removed).
    pub raw_value: Option<String>,
    /// Whole `name=value` text.
    pub span: Range<usize>,
    /// Value text including its quotes, if a value is present.
    pub value_span: Option<Range<usize>>,
}

/// A lexed opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Offset where a new attribute can be inserted (the `>` or `/>`).
    pub insert_at: usize,
    /// One past the closing `>`.
    pub end: usize,
    /// Written as `<tag ... />`.
    pub self_closing: bool,
}

impl OpenTag {
    /// Find an attribute by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Lex the opening tag that starts at `start` (which must point at `<`).
///
/// Returns `None` for anything that is not a well-formed start tag,
/// such as closing tags, comments, or a tag cut off by end of input.
pub fn parse_open_tag(source: &str, start: usize) -> Option<OpenTag> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'<') {
        return None;
    }

    let mut i = start + 1;
    let name_start = i;
    while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let name = source[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && is_space(bytes[i]) {
            i += 1;
        }
        let &b = bytes.get(i)?;

        match b {
            b'>' => {
                return Some(OpenTag {
                    name,
                    attrs,
                    insert_at: i,
                    end: i + 1,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(OpenTag {
                    name,
                    attrs,
                    insert_at: i,
                    end: i + 2,
                    self_closing: true,
                });
            }
            b'/' | b'=' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        // Attribute name
        let attr_start = i;
        while i < bytes.len()
            && !is_space(bytes[i])
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name_end = i;
        let attr_name = source[attr_start..name_end].to_ascii_lowercase();

        // Optional value
        let mut j = i;
        while j < bytes.len() && is_space(bytes[j]) {
            j += 1;
        }
        if bytes.get(j) != Some(&b'=') {
            attrs.push(Attribute {
                name: attr_name,
                raw_value: None,
                span: attr_start..name_end,
                value_span: None,
            });
            continue;
        }

        j += 1;
        while j < bytes.len() && is_space(bytes[j]) {
            j += 1;
        }
        let value_start = j;
        let &first = bytes.get(j)?;
        let (raw_value, value_end) = if first == b'"' || first == b'\'' {
            let close = source[j + 1..].find(first as char)? + j + 1;
            (source[j + 1..close].to_string(), close + 1)
        } else {
            while j < bytes.len() && !is_space(bytes[j]) && bytes[j] != b'>' {
                j += 1;
            }
            (source[value_start..j].to_string(), j)
        };

        attrs.push(Attribute {
            name: attr_name,
            raw_value: Some(raw_value),
            span: attr_start..value_end,
            value_span: Some(value_start..value_end),
        });
        i = value_end;
    }
}

#[inline]
const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}
