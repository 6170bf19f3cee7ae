//! Record metadata → TOON.

use std::path::Path;

use toon_codec::{encode_with, Document, EncodeOptions, Scalar, ToonError, ToonValue};

use crate::record::Record;

/// The record's metadata as a TOON document. `path` is the record directory
/// relative to `root`, with `/` separators.
pub fn to_document(record: &Record, root: &Path) -> Document {
    let list = |items: &[String]| {
        ToonValue::List(items.iter().map(|s| Scalar::from(s.as_str())).collect())
    };
    let rel = record.dir.strip_prefix(root).unwrap_or(&record.dir);
    let path = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let mut doc = Document::new();
    doc.insert("name", ToonValue::from(record.name.as_str()));
    doc.insert("category", ToonValue::from(record.category.as_str()));
    doc.insert("description", ToonValue::from(record.description.as_str()));
    doc.insert("tags", list(&record.tags));
    doc.insert("platforms", list(&record.platforms));
    doc.insert("allowed_tools", list(&record.allowed_tools));
    doc.insert("path", ToonValue::from(path));
    doc
}

/// The record's metadata as abbreviated-key TOON.
pub fn to_toon(record: &Record, root: &Path) -> Result<String, ToonError> {
    encode_with(&to_document(record, root), &EncodeOptions::abbreviated())
}
