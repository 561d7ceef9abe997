//! Helpers for deriving readable identifiers from element text.
//!
//! These produce candidate maps; the renamer never calls them.

use std::collections::HashSet;

/// Default word limit for [`slugify`].
pub const SLUG_MAX_WORDS: usize = 5;
/// Default length limit for [`slugify`].
pub const SLUG_MAX_LEN: usize = 40;

/// Replace tags with spaces, decode `&nbsp;` and `&amp;`, drop other named
/// entities, and collapse whitespace.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) if close > 1 => {
                text.push(' ');
                rest = &rest[open + close + 1..];
            }
            _ => {
                text.push('<');
                rest = &rest[open + 1..];
            }
        }
    }
    text.push_str(rest);

    let text = text.replace("&nbsp;", " ").replace("&amp;", "and");
    drop_named_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn drop_named_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let name_len = after.bytes().take_while(u8::is_ascii_lowercase).count();
        if name_len > 0 && after[name_len..].starts_with(';') {
            rest = &after[name_len + 1..];
        } else {
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Lowercase kebab-case slug of the first `max_words` words, cut to `max_len`
/// bytes. Non-ASCII characters and punctuation are dropped.
#[must_use]
pub fn slugify(text: &str, max_words: usize, max_len: usize) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let mut slug = cleaned
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join("-");
    slug.truncate(max_len);
    slug.trim_end_matches('-').to_string()
}

/// Hands out names, suffixing `-2`, `-3`, ... on repeats.
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name` without returning a variant, e.g. for identifiers that
    /// already exist in the document.
    pub fn reserve(&mut self, name: impl Into<String>) {
        let _ = self.used.insert(name.into());
    }

    /// Claim `candidate`, or the first free `candidate-N` for `N >= 2`.
    pub fn claim(&mut self, candidate: &str) -> String {
        let mut name = candidate.to_string();
        let mut n = 2;
        while self.used.contains(&name) {
            name = format!("{candidate}-{n}");
            n += 1;
        }
        let _ = self.used.insert(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<h1>Fast&nbsp;<b>&amp;</b>\n easy&hellip;</h1>"),
            "Fast and easy"
        );
    }

    #[test]
    fn test_strip_tags_keeps_lone_brackets() {
        assert_eq!(strip_tags("1 <> 2 & 3 < 4"), "1 <> 2 & 3 < 4");
    }

    #[test]
    fn test_slugify_limits() {
        assert_eq!(
            slugify("Step 1: Install the Pack now today!", 5, 40),
            "step-1-install-the-pack"
        );
        assert_eq!(slugify("abcdef ghijk", 5, 7), "abcdef");
        assert_eq!(slugify("Café déjà", 5, 40), "caf-dj");
        assert_eq!(slugify("!!!", 5, 40), "");
    }

    #[test]
    fn test_unique_names() {
        let mut names = UniqueNames::new();
        names.reserve("faq");
        assert_eq!(names.claim("faq"), "faq-2");
        assert_eq!(names.claim("faq"), "faq-3");
        assert_eq!(names.claim("hero"), "hero");
    }
}
