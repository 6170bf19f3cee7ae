//! TOON Decoder — parses Token-Oriented Object Notation into a [`Document`].
//!
//! Decoding is a single pass over lines driven by a small state machine:
//!
//! - `TopLevel`: blank and comment lines are skipped; `key: value`
//!   lines become scalars (or lists, see below); `key[N]{f1,f2}:` opens a
//!   table and moves to `CollectingRows`.
//! - `CollectingRows`: a line is a row only if it is not itself a
//!   scalar assignment or table header and it splits into exactly as many
//!   cells as the header has fields. Anything else closes the table. A blank
//!   line closes it and is consumed; any other closing line is re-processed
//!   at top level.
//! - `CollectingItems`: the multi-line list form `key[N]:` followed
//!   by indented item lines. Closes after N items or at the first line that
//!   is blank or not indented.
//!
//! Abbreviated keys (`N`, `D`, ...) are expanded through
//! [`keys::canonical`](crate::keys::canonical), so `N: x` and `name: x`
//! decode to the same document. Later assignments to a key replace earlier
//! ones.
//!
//! # Type inference
//!
//! Unquoted `T`, `F` and `true`/`false` (any case) become booleans, unquoted
//! `-?[0-9]+` becomes an integer when it fits in an `i64`, quoted values are
//! unescaped strings, and everything else is a bare string.

use crate::encoder::{
    is_key_char, looks_boolean, looks_integer, CELL_DELIMITER, COMMENT_MARKER, LIST_DELIMITER,
};
use crate::error::{Result, ToonError};
use crate::keys;
use crate::types::{Document, Row, Scalar, ToonValue};

/// Why the decoder set a line aside instead of storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A line inside a table whose cell count did not match the header. The
    /// table ended there; the line itself was not a valid top-level line.
    AmbiguousArrayRow,
    /// A top-level line that is neither an assignment, a header, a comment
    /// nor blank.
    UnrecognizedLine,
}

/// A skipped line, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

/// Decode a TOON string into a document.
///
/// Empty and comment-only input decodes to an empty document. Lines that
/// cannot be placed are skipped; use [`decode_with_diagnostics`] to see them.
/// The only hard failure is an unterminated quoted list item or table cell;
/// an unmarked value whose quotes do not balance decodes as a bare string.
pub fn decode(toon: &str) -> Result<Document> {
    decode_with_diagnostics(toon).map(|(doc, _)| doc)
}

/// Decode and also report every line that was skipped.
pub fn decode_with_diagnostics(toon: &str) -> Result<(Document, Vec<Diagnostic>)> {
    let lines: Vec<&str> = toon.lines().collect();
    let mut doc = Document::new();
    let mut diagnostics = Vec::new();
    let mut state = State::TopLevel;
    // Set when a table closed on a cell-count mismatch, so the re-processed
    // line can be reported as such if it turns out to be unusable.
    let mut closed_by_mismatch = false;
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let line_no = i + 1;
        let trimmed = raw.trim();

        state = match state {
            State::TopLevel => {
                let mismatch = std::mem::take(&mut closed_by_mismatch);
                i += 1;
                match classify(trimmed) {
                    Line::Blank | Line::Comment => State::TopLevel,
                    Line::Header { key, count, fields } => {
                        if fields.is_empty() {
                            // Zero-column table: nothing to collect.
                            doc.insert(key, ToonValue::Table(vec![Row::new(); count]));
                            State::TopLevel
                        } else {
                            State::CollectingRows {
                                key,
                                fields,
                                rows: Vec::new(),
                            }
                        }
                    }
                    Line::Assign { key, count, value } => {
                        match assignment_value(count, value, line_no)? {
                            Assigned::Value(v) => {
                                doc.insert(key, v);
                                State::TopLevel
                            }
                            Assigned::OpenItems(expected) => State::CollectingItems {
                                key,
                                remaining: expected,
                                items: Vec::new(),
                            },
                        }
                    }
                    Line::Other => {
                        diagnostics.push(Diagnostic {
                            line: line_no,
                            kind: if mismatch {
                                DiagnosticKind::AmbiguousArrayRow
                            } else {
                                DiagnosticKind::UnrecognizedLine
                            },
                        });
                        State::TopLevel
                    }
                }
            }

            State::CollectingRows {
                key,
                fields,
                mut rows,
            } => match classify(trimmed) {
                Line::Blank => {
                    i += 1;
                    doc.insert(key, ToonValue::Table(rows));
                    State::TopLevel
                }
                Line::Comment => {
                    i += 1;
                    State::CollectingRows { key, fields, rows }
                }
                Line::Header { .. } | Line::Assign { .. } => {
                    doc.insert(key, ToonValue::Table(rows));
                    State::TopLevel
                }
                Line::Other => {
                    let cells = split_delimited(trimmed, CELL_DELIMITER, line_no)?;
                    if cells.len() == fields.len() {
                        i += 1;
                        rows.push(build_row(&fields, &cells, line_no)?);
                        State::CollectingRows { key, fields, rows }
                    } else {
                        closed_by_mismatch = true;
                        doc.insert(key, ToonValue::Table(rows));
                        State::TopLevel
                    }
                }
            },

            State::CollectingItems {
                key,
                remaining,
                mut items,
            } => {
                let indented = raw.starts_with(char::is_whitespace);
                if trimmed.starts_with(COMMENT_MARKER) {
                    i += 1;
                    State::CollectingItems {
                        key,
                        remaining,
                        items,
                    }
                } else if trimmed.is_empty() || !indented {
                    doc.insert(key, ToonValue::List(items));
                    State::TopLevel
                } else {
                    i += 1;
                    if let Some(item) = parse_scalar_token(trimmed, line_no)? {
                        items.push(item);
                    }
                    if remaining <= 1 {
                        doc.insert(key, ToonValue::List(items));
                        State::TopLevel
                    } else {
                        State::CollectingItems {
                            key,
                            remaining: remaining - 1,
                            items,
                        }
                    }
                }
            }
        };
    }

    // End of input closes whatever block is open.
    match state {
        State::TopLevel => {}
        State::CollectingRows { key, rows, .. } => {
            doc.insert(key, ToonValue::Table(rows));
        }
        State::CollectingItems { key, items, .. } => {
            doc.insert(key, ToonValue::List(items));
        }
    }

    Ok((doc, diagnostics))
}

/// Decoder state between lines.
enum State {
    TopLevel,
    CollectingRows {
        key: String,
        fields: Vec<String>,
        rows: Vec<Row>,
    },
    CollectingItems {
        key: String,
        remaining: usize,
        items: Vec<Scalar>,
    },
}

/// How a single trimmed line reads on its own, independent of state.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Comment,
    /// `key[N]{f1,f2}:`
    Header {
        key: String,
        count: usize,
        fields: Vec<String>,
    },
    /// `key: value` or `key[N]: value`
    Assign {
        key: String,
        count: Option<usize>,
        value: &'a str,
    },
    Other,
}

fn classify(trimmed: &str) -> Line<'_> {
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with(COMMENT_MARKER) {
        return Line::Comment;
    }
    let Some((key, rest)) = split_key(trimmed) else {
        return Line::Other;
    };
    let Some((count, rest)) = split_count(rest) else {
        return Line::Other;
    };

    if let (Some(count), Some(body)) = (count, rest.strip_prefix('{')) {
        let Some(close) = body.find('}') else {
            return Line::Other;
        };
        let after = &body[close + 1..];
        if after.strip_prefix(':').map(str::trim) != Some("") {
            return Line::Other;
        }
        let fields_str = body[..close].trim();
        let fields = if fields_str.is_empty() {
            Vec::new()
        } else {
            fields_str.split(',').map(|f| f.trim().to_string()).collect()
        };
        return Line::Header {
            key: keys::canonical(key),
            count,
            fields,
        };
    }

    match rest.strip_prefix(':') {
        Some(value) => Line::Assign {
            key: keys::canonical(key),
            count,
            value: value.trim(),
        },
        None => Line::Other,
    }
}

/// Split a leading `[A-Za-z_][A-Za-z0-9_.-]*` key off a line.
fn split_key(s: &str) -> Option<(&str, &str)> {
    let first = s.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = s.find(|c: char| !is_key_char(c)).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Split an optional `[N]` count off the text after a key. `None` means the
/// brackets were present but malformed.
fn split_count(rest: &str) -> Option<(Option<usize>, &str)> {
    let Some(inner) = rest.strip_prefix('[') else {
        return Some((None, rest));
    };
    let close = inner.find(']')?;
    let count = inner[..close].trim().parse::<usize>().ok()?;
    Some((Some(count), &inner[close + 1..]))
}

/// What a scalar-assignment line produced.
enum Assigned {
    Value(ToonValue),
    /// `key[N]:` with N > 0 and nothing inline: items follow on their own lines.
    OpenItems(usize),
}

fn assignment_value(count: Option<usize>, value: &str, line_no: usize) -> Result<Assigned> {
    match count {
        Some(0) => Ok(Assigned::Value(ToonValue::List(Vec::new()))),
        Some(n) if value.is_empty() => Ok(Assigned::OpenItems(n)),
        Some(_) => Ok(Assigned::Value(ToonValue::List(parse_list(value, line_no)?))),
        None => {
            // An unmarked value whose quotes do not balance stays a bare string.
            let Ok(parts) = split_delimited(value, LIST_DELIMITER, line_no) else {
                return Ok(Assigned::Value(ToonValue::Scalar(Scalar::Str(value.to_string()))));
            };
            if parts.len() > 1 {
                // Unmarked list: an unquoted `|` can only be a separator.
                let items = collect_items(&parts, line_no)?;
                return Ok(Assigned::Value(ToonValue::List(items)));
            }
            let scalar =
                parse_scalar_token(value, line_no)?.unwrap_or_else(|| Scalar::Str(String::new()));
            Ok(Assigned::Value(ToonValue::Scalar(scalar)))
        }
    }
}

fn parse_list(value: &str, line_no: usize) -> Result<Vec<Scalar>> {
    let parts = split_delimited(value, LIST_DELIMITER, line_no)?;
    collect_items(&parts, line_no)
}

/// Empty unquoted list items are dropped.
fn collect_items(parts: &[&str], line_no: usize) -> Result<Vec<Scalar>> {
    let mut items = Vec::with_capacity(parts.len());
    for part in parts {
        if let Some(item) = parse_scalar_token(part, line_no)? {
            items.push(item);
        }
    }
    Ok(items)
}

/// Build a table row; empty unquoted cells leave the field absent.
fn build_row(fields: &[String], cells: &[&str], line_no: usize) -> Result<Row> {
    let mut row = Row::new();
    for (field, cell) in fields.iter().zip(cells) {
        if let Some(value) = parse_scalar_token(cell, line_no)? {
            row.insert(field.clone(), value);
        }
    }
    Ok(row)
}

/// Split on `delimiter` outside double quotes. Only a `"` that begins a
/// segment (after leading whitespace) opens a quoted token; any other `"` is
/// literal. Returned slices are untrimmed and keep their quotes.
fn split_delimited(s: &str, delimiter: char, line_no: usize) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quotes = false;
            }
        } else if ch == '"' && s[start..idx].trim().is_empty() {
            in_quotes = true;
        } else if ch == delimiter {
            parts.push(&s[start..idx]);
            start = idx + ch.len_utf8();
        }
    }

    if in_quotes {
        return Err(ToonError::Parse {
            line: line_no,
            message: "unterminated quoted value".to_string(),
        });
    }
    parts.push(&s[start..]);
    Ok(parts)
}

/// Parse one token into a scalar. `None` for an empty unquoted token.
fn parse_scalar_token(token: &str, line_no: usize) -> Result<Option<Scalar>> {
    let s = token.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Some(inner) = s.strip_prefix('"') {
        match find_closing_quote(inner) {
            Some(end) if end + 1 == inner.len() => {
                return Ok(Some(Scalar::Str(unescape_string(&inner[..end]))));
            }
            Some(_) => {} // `"a"b` reads as a bare string
            None => {
                return Err(ToonError::Parse {
                    line: line_no,
                    message: "unterminated quoted value".to_string(),
                });
            }
        }
    }

    if looks_boolean(s) {
        return Ok(Some(Scalar::Bool(s == "T" || s.eq_ignore_ascii_case("true"))));
    }

    if looks_integer(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Some(Scalar::Integer(n)));
        }
    }

    Ok(Some(Scalar::Str(s.to_string())))
}

/// Byte offset of the first unescaped `"` in `s`.
fn find_closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Unescape a quoted TOON string (handle \\, \", \n, \r, \t)
fn unescape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_scalar_and_compact_forms() {
        assert_eq!(
            classify("name: api"),
            Line::Assign {
                key: "name".into(),
                count: None,
                value: "api"
            }
        );
        assert_eq!(
            classify("N:api"),
            Line::Assign {
                key: "name".into(),
                count: None,
                value: "api"
            }
        );
    }

    #[test]
    fn classify_header_and_list() {
        assert_eq!(
            classify("S[2]{n,action}:"),
            Line::Header {
                key: "steps".into(),
                count: 2,
                fields: vec!["n".into(), "action".into()]
            }
        );
        assert_eq!(
            classify("tags[3]: a|b|c"),
            Line::Assign {
                key: "tags".into(),
                count: Some(3),
                value: "a|b|c"
            }
        );
    }

    #[test]
    fn classify_rejects_rows_and_malformed_headers() {
        assert_eq!(classify("1,Design the API"), Line::Other);
        assert_eq!(classify("a,b"), Line::Other);
        assert_eq!(classify("key[x]: 1"), Line::Other);
        assert_eq!(classify("key[2]{a,b}: trailing"), Line::Other);
        assert_eq!(classify("# note"), Line::Comment);
        assert_eq!(classify(""), Line::Blank);
    }

    #[test]
    fn split_respects_quotes() {
        let parts = split_delimited(r#"a,"b,c",d"#, ',', 1).unwrap();
        assert_eq!(parts, vec!["a", r#""b,c""#, "d"]);
        let parts = split_delimited(r#""x\"|y"|z"#, '|', 1).unwrap();
        assert_eq!(parts, vec![r#""x\"|y""#, "z"]);
        assert!(split_delimited(r#"a,"b"#, ',', 4).is_err());
    }

    #[test]
    fn inner_quotes_are_literal() {
        let parts = split_delimited(r#"27" wide,b"#, ',', 1).unwrap();
        assert_eq!(parts, vec![r#"27" wide"#, "b"]);
        let parts = split_delimited(r#"a| "b|c"|d"#, '|', 1).unwrap();
        assert_eq!(parts, vec!["a", r#" "b|c""#, "d"]);
    }
}
