//! Authoring checks for long-form records.
//!
//! Errors mark a record the registry cannot load: no frontmatter, an unclosed
//! frontmatter block, or a missing/empty `name` or `description`. Everything
//! else is a warning: naming conventions, description quality, unusual tools,
//! thin or overlong bodies, and duplicate identifiers across the tree.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toon_codec::ToonValue;

use crate::error::{RecordError, Result};
use crate::frontmatter::{self, Frontmatter, FrontmatterValue};
use crate::record::SourceKind;
use crate::registry::{discover, RegistryOptions, WarningKind};

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MIN_DESCRIPTION_LEN: usize = 20;
pub const MIN_BODY_LEN: usize = 100;
pub const MAX_BODY_LINES: usize = 500;

/// Phrases that tell an agent when to pick the record.
pub const TRIGGER_PHRASES: &[&str] = &["use when", "use for", "handles", "covers"];

/// Tools recognised without a warning.
pub const COMMON_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "Grep",
    "Glob",
    "Bash",
    "WebFetch",
    "WebSearch",
    "python",
    "node",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// One finding about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path.display(), self.severity, self.message)
    }
}

/// Findings for a whole tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Files examined.
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Check one long-form document. `dir_name` is the name of the directory
/// holding it, which the record name should equal.
pub fn check_document(path: &Path, text: &str, dir_name: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut push = |severity, message: String| {
        issues.push(Issue {
            path: path.to_path_buf(),
            severity,
            message,
        })
    };

    let (fm, body) = match frontmatter::extract(text) {
        Ok(parts) => parts,
        Err(err) => {
            push(Severity::Error, err.to_string());
            return issues;
        }
    };

    for field in ["name", "description"] {
        if text_field(&fm, field).is_none() {
            let what = if fm.contains_key(field) { "empty" } else { "missing" };
            push(Severity::Error, format!("required field `{field}` is {what}"));
        }
    }

    if let Some(name) = text_field(&fm, "name") {
        if name.chars().count() > MAX_NAME_LEN {
            push(
                Severity::Warning,
                format!("name is longer than {MAX_NAME_LEN} characters"),
            );
        }
        if !is_valid_name(name) {
            push(
                Severity::Warning,
                format!("name `{name}` should be lowercase words joined by single hyphens"),
            );
        }
        if name != dir_name {
            push(
                Severity::Warning,
                format!("name `{name}` differs from its directory `{dir_name}`"),
            );
        }
    }

    if let Some(description) = text_field(&fm, "description") {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            push(
                Severity::Warning,
                format!("description is longer than {MAX_DESCRIPTION_LEN} characters ({len})"),
            );
        }
        if len < MIN_DESCRIPTION_LEN {
            push(Severity::Warning, "description is very short".to_string());
        }
        let lower = description.to_lowercase();
        if !TRIGGER_PHRASES.iter().any(|p| lower.contains(p)) {
            push(
                Severity::Warning,
                format!(
                    "description has no trigger phrase ({})",
                    TRIGGER_PHRASES.join(", ")
                ),
            );
        }
    }

    let tools = fm
        .get("allowed-tools")
        .or_else(|| fm.get("allowed_tools"))
        .map(FrontmatterValue::to_list)
        .unwrap_or_default();
    for tool in tools.iter().filter(|t| !COMMON_TOOLS.contains(&t.as_str())) {
        push(Severity::Warning, format!("uncommon allowed tool `{tool}`"));
    }

    let body = body.trim();
    if body.is_empty() {
        push(Severity::Warning, "body is empty".to_string());
    } else {
        if body.chars().count() < MIN_BODY_LEN {
            push(Severity::Warning, "body is very short".to_string());
        }
        let lines = body.lines().count();
        if lines > MAX_BODY_LINES {
            push(
                Severity::Warning,
                format!("body has {lines} lines (more than {MAX_BODY_LINES})"),
            );
        }
        if !body.contains("# ") {
            push(Severity::Warning, "body has no `# ` title".to_string());
        }
        if !body.contains("## ") {
            push(Severity::Warning, "body has no `## ` sections".to_string());
        }
    }

    issues
}

fn text_field<'a>(fm: &'a Frontmatter, key: &str) -> Option<&'a str> {
    fm.get(key)
        .and_then(FrontmatterValue::as_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `[a-z0-9]+(-[a-z0-9]+)*`
pub fn is_valid_name(name: &str) -> bool {
    name.split('-').all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    })
}

/// Check every long-form record under `root`.
///
/// Encoded records are counted against duplicate names but not checked
/// further.
pub fn check_tree(root: &Path, options: &RegistryOptions) -> Result<ValidationReport> {
    let mut walk_warnings = Vec::new();
    let locations = discover(root, options, &mut walk_warnings)?;
    let mut report = ValidationReport::default();

    for warning in walk_warnings {
        if let WarningKind::Skipped(err) = warning.kind {
            report.issues.push(Issue {
                path: warning.path,
                severity: Severity::Warning,
                message: err.to_string(),
            });
        }
    }

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    for location in locations {
        let file = location.file;
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) => {
                report.issues.push(Issue {
                    path: file.clone(),
                    severity: Severity::Error,
                    message: RecordError::io(&file, err).to_string(),
                });
                continue;
            }
        };
        report.checked += 1;

        let name = match SourceKind::for_file(&file) {
            SourceKind::LongForm => {
                let dir_name = file
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                report.issues.extend(check_document(&file, &text, &dir_name));
                frontmatter::extract(&text)
                    .ok()
                    .and_then(|(fm, _)| text_field(&fm, "name").map(str::to_string))
            }
            SourceKind::Encoded => toon_codec::decode(&text).ok().and_then(|doc| {
                doc.get("name")
                    .and_then(ToonValue::as_scalar)
                    .map(|s| s.to_string())
            }),
        };

        if let Some(name) = name {
            if let Some(previous) = seen.insert(name.clone(), file.clone()) {
                report.issues.push(Issue {
                    path: file,
                    severity: Severity::Warning,
                    message: format!(
                        "duplicate record `{name}` (also in {})",
                        previous.display()
                    ),
                });
            }
        }
    }

    tracing::debug!(
        checked = report.checked,
        issues = report.issues.len(),
        "validated tree"
    );
    Ok(report)
}
