//! Frontmatter adapter: the flat `key: value` preamble of a long-form record.
//!
//! ```text
//! ---
//! name: api-design
//! description: "Design REST APIs. Use when adding endpoints."
//! tags: [rest, openapi]
//! ---
//! # API Design
//! ```
//!
//! Only top-level scalars and `[a, b]` inline lists are read. Blank lines,
//! `#` comments and any line starting with whitespace (continuations and
//! nested mappings) are skipped, as are keys whose value is empty.
//! The sentinel is matched after trimming, so `  ---  ` also opens or closes
//! the block.

use toon_codec::Fields;

use crate::error::FrontmatterError;

/// Line that opens and closes a frontmatter block.
pub const SENTINEL: &str = "---";

/// A frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    Text(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Text(s) => Some(s),
            FrontmatterValue::List(_) => None,
        }
    }

    /// The value as a list. Text is split on commas and whitespace.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FrontmatterValue::List(items) => items.clone(),
            FrontmatterValue::Text(s) => split_words(s),
        }
    }
}

/// Parsed frontmatter, in declaration order.
pub type Frontmatter = Fields<FrontmatterValue>;

/// Split a document into its frontmatter mapping and the body that follows
/// the closing sentinel.
///
/// # Errors
///
/// [`FrontmatterError::Missing`] if the first line is not the sentinel,
/// [`FrontmatterError::Unterminated`] if no closing sentinel follows.
pub fn extract(text: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = LineSpans::new(text);

    match lines.next() {
        Some((_, line)) if is_sentinel(line) => {}
        _ => return Err(FrontmatterError::Missing),
    }

    let mut fields = Frontmatter::new();
    for (end, line) in lines {
        if is_sentinel(line) {
            return Ok((fields, &text[end..]));
        }
        if let Some((key, value)) = parse_line(line) {
            fields.insert(key, value);
        }
    }
    Err(FrontmatterError::Unterminated)
}

fn is_sentinel(line: &str) -> bool {
    line.trim() == SENTINEL
}

fn parse_line(line: &str) -> Option<(String, FrontmatterValue)> {
    if line.trim().is_empty() || line.starts_with('#') || line.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }

    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let items: Vec<String> = inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return None;
        }
        return Some((key.to_string(), FrontmatterValue::List(items)));
    }

    let value = unquote(value);
    if value.is_empty() {
        return None;
    }
    Some((key.to_string(), FrontmatterValue::Text(value.to_string())))
}

/// Strip one pair of matching single or double quotes.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

pub(crate) fn split_words(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lines without their terminators, each paired with the byte offset just
/// past its terminator.
struct LineSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineSpans<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for LineSpans<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let (line, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        Some((self.pos, line.strip_suffix('\r').unwrap_or(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_only_strips_matching_pairs() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"a'"), "\"a'");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn line_spans_report_offsets_past_terminators() {
        let spans: Vec<_> = LineSpans::new("a\r\nbc\nd").collect();
        assert_eq!(spans, vec![(3, "a"), (6, "bc"), (7, "d")]);
    }
}
