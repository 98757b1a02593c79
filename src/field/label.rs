//! Human-readable labels derived from field keys.

use crate::utils::html::collapse_whitespace;

/// Group a field belongs to: the key up to its first `.`.
pub fn group_name(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

/// Upper-case the first letter of every space-separated word.
///
/// Hyphens count as word separators.
pub fn title_case(text: &str) -> String {
    text.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a form label from a dotted key.
///
/// Numeric segments become `[n]`, camel-case humps become separate words.
///
/// ```ignore
/// assert_eq!(label_from_key("hero.ctaLabel"), "Hero Cta Label");
/// assert_eq!(label_from_key("links.0.href"), "Links [0] Href");
/// ```
pub fn label_from_key(key: &str) -> String {
    let pretty = key
        .split('.')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                format!("[{segment}]")
            } else {
                split_camel_case(segment).trim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    title_case(&collapse_whitespace(&pretty))
}

fn split_camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for c in segment.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_camel_case() {
        assert_eq!(label_from_key("hero.ctaLabel"), "Hero Cta Label");
    }

    #[test]
    fn test_label_numeric_index() {
        assert_eq!(label_from_key("links.0.href"), "Links [0] Href");
        assert_eq!(label_from_key("faq.12.answer"), "Faq [12] Answer");
    }

    #[test]
    fn test_label_hyphen_and_acronym() {
        assert_eq!(label_from_key("footer.legal-note"), "Footer Legal Note");
        assert_eq!(label_from_key("meta.ogURL"), "Meta Og U R L");
    }

    #[test]
    fn test_label_single_segment() {
        assert_eq!(label_from_key("title"), "Title");
        assert_eq!(label_from_key("Title"), "Title");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hero"), "Hero");
        assert_eq!(title_case("contact-us"), "Contact Us");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_group_name() {
        assert_eq!(group_name("hero.title"), "hero");
        assert_eq!(group_name("footer"), "footer");
        assert_eq!(group_name("a.b.c"), "a");
    }
}
