//! TOON Encoder — renders a [`Document`] as Token-Oriented Object Notation.
//!
//! The grammar is deliberately flat. Each top-level field becomes one of:
//!
//! - **Scalar**: `key: value`
//! - **List**: `key[N]: v1|v2|v3` (`key[0]:` when empty)
//! - **Table**: `key[N]{f1,f2}:` followed by one `  c1,c2` row per record and
//!   a blank separator line
//!
//! Booleans are written as `T`/`F`. Strings are quoted only when leaving them
//! bare would change how the decoder reads them back (see [`needs_quoting`]).
//!
//! # Example
//! ```
//! use toon_codec::{encode, Document, Scalar, ToonValue};
//!
//! let mut doc = Document::new();
//! doc.insert("name", ToonValue::from("api-design"));
//! doc.insert("tags", ToonValue::List(vec![Scalar::from("rest"), Scalar::from("http")]));
//! assert_eq!(encode(&doc).unwrap(), "name: api-design\ntags[2]: rest|http\n");
//! ```

use crate::error::{Result, ToonError};
use crate::keys;
use crate::types::{Document, Row, Scalar, ToonValue};

/// Separates table cells.
pub const CELL_DELIMITER: char = ',';
/// Separates list items.
pub const LIST_DELIMITER: char = '|';
/// Starts a comment line.
pub const COMMENT_MARKER: char = '#';

/// How top-level keys are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// Keys exactly as stored in the document.
    #[default]
    Full,
    /// Keys with an entry in [`keys::KEY_ALIASES`] are written as their letter.
    Abbreviated,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    pub key_style: KeyStyle,
}

impl EncodeOptions {
    pub fn abbreviated() -> Self {
        Self {
            key_style: KeyStyle::Abbreviated,
        }
    }
}

/// Encode a document with full-length keys.
pub fn encode(doc: &Document) -> Result<String> {
    encode_with(doc, &EncodeOptions::default())
}

/// Encode a document with the given options.
///
/// Fails with [`ToonError::Encode`] when a key or table field name cannot be
/// written bare, or when a key would be misread as an abbreviation on decode.
pub fn encode_with(doc: &Document, options: &EncodeOptions) -> Result<String> {
    let mut out = String::new();
    for (key, value) in doc.iter() {
        let written_key = render_key(key, options.key_style)?;
        match value {
            ToonValue::Scalar(scalar) => {
                out.push_str(&written_key);
                out.push_str(": ");
                encode_scalar(scalar, &mut out);
            }
            ToonValue::List(items) => {
                out.push_str(&format!("{}[{}]:", written_key, items.len()));
                if !items.is_empty() {
                    out.push(' ');
                    encode_list_items(items, &mut out);
                }
            }
            ToonValue::Table(rows) => {
                encode_table(&written_key, key, rows, &mut out)?;
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Pick the written form of a key and reject keys the decoder would not read
/// back as the same string.
fn render_key(key: &str, style: KeyStyle) -> Result<String> {
    if !is_valid_key(key) {
        return Err(ToonError::Encode(format!(
            "key `{key}` must match [A-Za-z_][A-Za-z0-9_.-]*"
        )));
    }
    if let Some(full) = keys::expand(key) {
        return Err(ToonError::Encode(format!(
            "key `{key}` would decode as its abbreviation for `{full}`"
        )));
    }
    if style == KeyStyle::Abbreviated {
        if let Some(letter) = keys::abbreviate(key) {
            return Ok(letter.to_string());
        }
    }
    Ok(key.to_string())
}

/// Emit `|`-separated list items.
fn encode_list_items(items: &[Scalar], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(LIST_DELIMITER);
        }
        encode_scalar(item, out);
    }
}

/// Emit a table header, its rows, and the blank line that closes the block.
///
/// The column set comes from the first record only. Later records with extra
/// fields lose them; records missing a field get an empty cell.
fn encode_table(written_key: &str, key: &str, rows: &[Row], out: &mut String) -> Result<()> {
    let fields: Vec<&str> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();
    for field in &fields {
        if !is_valid_key(field) {
            return Err(ToonError::Encode(format!(
                "table `{key}` has field `{field}` that must match [A-Za-z_][A-Za-z0-9_.-]*"
            )));
        }
    }

    out.push_str(&format!(
        "{}[{}]{{{}}}:",
        written_key,
        rows.len(),
        fields.join(",")
    ));

    if !fields.is_empty() {
        for (idx, row) in rows.iter().enumerate() {
            // A single-column row with no value would print as a blank line,
            // which closes the block.
            if fields.len() == 1 && !row.contains_key(fields[0]) {
                return Err(ToonError::Encode(format!(
                    "table `{key}` row {idx} has no value for its only column `{}`",
                    fields[0]
                )));
            }
            out.push_str("\n  ");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(CELL_DELIMITER);
                }
                if let Some(cell) = row.get(field) {
                    encode_scalar(cell, out);
                }
            }
        }
    }

    // Blank separator after every table block.
    out.push('\n');
    Ok(())
}

/// Emit a scalar. Booleans use single-character tokens.
fn encode_scalar(scalar: &Scalar, out: &mut String) {
    match scalar {
        Scalar::Bool(b) => out.push(if *b { 'T' } else { 'F' }),
        Scalar::Integer(n) => out.push_str(&n.to_string()),
        Scalar::Str(s) => encode_string(s, out),
    }
}

/// Emit a string value, quoting and escaping only when necessary.
fn encode_string(s: &str, out: &mut String) {
    if !needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// Determine if a string must be quoted to survive a decode.
///
/// A string MUST be quoted if it:
/// - Is empty (an empty cell means "field absent")
/// - Contains any whitespace
/// - Contains a cell or list delimiter (`,` `|`), a colon, a quote or backslash
/// - Contains brackets or braces (header syntax)
/// - Starts with the comment marker
/// - Would be coerced to a boolean or an integer
pub fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.starts_with(COMMENT_MARKER) {
        return true;
    }
    if s.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, ',' | '|' | ':' | '"' | '\\' | '[' | ']' | '{' | '}')
    }) {
        return true;
    }
    looks_boolean(s) || looks_integer(s)
}

/// `T`, `F`, or `true`/`false` in any case.
pub(crate) fn looks_boolean(s: &str) -> bool {
    s == "T" || s == "F" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

/// `-?[0-9]+`, regardless of whether it fits in an `i64`.
pub(crate) fn looks_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Test if a key can be written bare: `^[A-Za-z_][A-Za-z0-9_.-]*$`
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_key_char)
}

pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
