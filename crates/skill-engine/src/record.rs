//! The record model and the two file kinds a record is read from.

use std::path::{Path, PathBuf};

use serde::Serialize;
use toon_codec::{Document, Scalar, ToonValue};

use crate::error::{RecordError, Result};
use crate::frontmatter::{self, split_words, Frontmatter, FrontmatterValue};

/// Category assigned to records stored directly under the registry root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// How a record's source file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Markdown with a `---` frontmatter block (`SKILL.md`).
    LongForm,
    /// A TOON document (`SKILL.toon`).
    Encoded,
}

impl SourceKind {
    /// `.toon` files are encoded; everything else is long-form.
    pub fn for_file(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toon") => SourceKind::Encoded,
            _ => SourceKind::LongForm,
        }
    }
}

/// A named unit of instructional content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub platforms: Vec<String>,
    pub allowed_tools: Vec<String>,
    pub kind: SourceKind,
    /// Directory holding the record's tier files.
    pub dir: PathBuf,
    /// File the record was read from.
    pub file: PathBuf,
    /// Markdown after the frontmatter. Empty for encoded records.
    #[serde(skip)]
    pub body: String,
}

impl Record {
    /// Read and parse a record file.
    pub fn load(file: &Path, category: &str) -> Result<Self> {
        let text = std::fs::read_to_string(file).map_err(|e| RecordError::io(file, e))?;
        Self::parse(file, &text, category)
    }

    /// Parse record text, picking the parser from the file name.
    ///
    /// # Errors
    ///
    /// Frontmatter and TOON failures, and [`RecordError::MissingRequiredField`]
    /// when `name` or `description` is absent or empty.
    pub fn parse(file: &Path, text: &str, category: &str) -> Result<Self> {
        let kind = SourceKind::for_file(file);
        let fields = match kind {
            SourceKind::LongForm => {
                let (fm, body) = frontmatter::extract(text)?;
                RawFields::from_frontmatter(&fm, body.trim())
            }
            SourceKind::Encoded => RawFields::from_document(&toon_codec::decode(text)?),
        };

        let name = fields.name.ok_or(RecordError::MissingRequiredField("name"))?;
        let description = fields
            .description
            .ok_or(RecordError::MissingRequiredField("description"))?;

        Ok(Record {
            name,
            description,
            category: category.to_string(),
            tags: fields.tags,
            platforms: fields.platforms,
            allowed_tools: fields.allowed_tools,
            kind,
            dir: file.parent().map(Path::to_path_buf).unwrap_or_default(),
            file: file.to_path_buf(),
            body: fields.body,
        })
    }
}

/// Field values pulled out of either source kind before required-field checks.
struct RawFields {
    name: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    platforms: Vec<String>,
    allowed_tools: Vec<String>,
    body: String,
}

impl RawFields {
    fn from_frontmatter(fm: &Frontmatter, body: &str) -> Self {
        let text = |key: &str| {
            fm.get(key)
                .and_then(FrontmatterValue::as_text)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let list = |key: &str| fm.get(key).map(FrontmatterValue::to_list);

        RawFields {
            name: text("name"),
            description: text("description"),
            tags: list("tags").unwrap_or_default(),
            platforms: list("platforms").unwrap_or_default(),
            allowed_tools: list("allowed-tools")
                .or_else(|| list("allowed_tools"))
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    fn from_document(doc: &Document) -> Self {
        let text = |key: &str| match doc.get(key) {
            Some(ToonValue::Scalar(s)) => Some(s.to_string()).filter(|s| !s.trim().is_empty()),
            _ => None,
        };
        let list = |key: &str| -> Option<Vec<String>> {
            match doc.get(key) {
                Some(ToonValue::List(items)) => Some(items.iter().map(Scalar::to_string).collect()),
                Some(ToonValue::Scalar(s)) => Some(split_words(&s.to_string())),
                _ => None,
            }
        };

        RawFields {
            name: text("name"),
            description: text("description"),
            tags: list("tags").unwrap_or_default(),
            platforms: list("platforms").unwrap_or_default(),
            allowed_tools: list("allowed_tools")
                .or_else(|| list("allowed-tools"))
                .unwrap_or_default(),
            body: String::new(),
        }
    }
}
