//! Record registry: one scan of a root directory, indexed by record name.
//!
//! Every directory under the root is a candidate record location. The first
//! file from [`RegistryOptions::record_files`] present in a directory is
//! parsed; directories named in [`RegistryOptions::exclude`] are not entered.
//! Files that fail to parse are skipped and reported as warnings, so a partial
//! corpus still yields a usable registry. When two files declare the same name
//! the later one in walk order (sorted by path) wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{RecordError, Result};
use crate::record::{Record, UNCATEGORIZED};

/// Which files make a record and where not to look for them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RegistryOptions {
    /// Recognised record file names, in priority order.
    pub record_files: Vec<String>,
    /// Directory names that are never entered.
    pub exclude: Vec<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            record_files: vec!["SKILL.md".to_string(), "SKILL.toon".to_string()],
            exclude: vec![
                "templates".to_string(),
                "backup".to_string(),
                "backups".to_string(),
            ],
        }
    }
}

/// A problem found while building the registry. None of these stop a build.
#[derive(Debug)]
pub struct RegistryWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
}

#[derive(Debug)]
pub enum WarningKind {
    /// The file was not registered.
    Skipped(RecordError),
    /// The file replaced an earlier record with the same name.
    DuplicateIdentifier { name: String, replaced: PathBuf },
}

impl fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Skipped(err) => write!(f, "{}: skipped: {err}", self.path.display()),
            WarningKind::DuplicateIdentifier { name, replaced } => write!(
                f,
                "{}: duplicate record `{name}` replaces {}",
                self.path.display(),
                replaced.display()
            ),
        }
    }
}

/// A record file found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    pub file: PathBuf,
    pub category: String,
}

/// Read-only index of records built from one directory scan.
#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    records: BTreeMap<String, Record>,
    warnings: Vec<RegistryWarning>,
}

impl Registry {
    /// Scan `root` and load every record found.
    ///
    /// # Errors
    ///
    /// Only when `root` itself cannot be read. Failures below the root are
    /// reported through [`Registry::warnings`].
    pub fn build(root: &Path, options: &RegistryOptions) -> Result<Self> {
        let mut warnings = Vec::new();
        let locations = discover(root, options, &mut warnings)?;
        tracing::debug!(root = %root.display(), found = locations.len(), "discovered record files");

        let mut records = Vec::with_capacity(locations.len());
        for location in locations {
            match Record::load(&location.file, &location.category) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(path = %location.file.display(), error = %err, "skipping record");
                    warnings.push(RegistryWarning {
                        path: location.file,
                        kind: WarningKind::Skipped(err),
                    });
                }
            }
        }

        let mut registry = Self::from_records(root, records);
        warnings.append(&mut registry.warnings);
        registry.warnings = warnings;
        Ok(registry)
    }

    /// Index already-loaded records. Later records replace earlier ones with
    /// the same name.
    pub fn from_records(root: impl Into<PathBuf>, records: impl IntoIterator<Item = Record>) -> Self {
        let mut index: BTreeMap<String, Record> = BTreeMap::new();
        let mut warnings = Vec::new();
        for record in records {
            let path = record.file.clone();
            if let Some(previous) = index.insert(record.name.clone(), record) {
                tracing::warn!(
                    name = %previous.name,
                    path = %path.display(),
                    replaced = %previous.file.display(),
                    "duplicate record identifier, keeping the later file"
                );
                warnings.push(RegistryWarning {
                    path,
                    kind: WarningKind::DuplicateIdentifier {
                        name: previous.name,
                        replaced: previous.file,
                    },
                });
            }
        }
        Self {
            root: root.into(),
            records: index,
            warnings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Registered records, sorted by name.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose name or description contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> Vec<&Record> {
        let needle = text.to_lowercase();
        self.records
            .values()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn warnings(&self) -> &[RegistryWarning] {
        &self.warnings
    }
}

/// Walk `root` in sorted order and return one record file per directory.
///
/// Unreadable subdirectories are recorded in `warnings` and skipped.
pub(crate) fn discover(
    root: &Path,
    options: &RegistryOptions,
    warnings: &mut Vec<RegistryWarning>,
) -> Result<Vec<Location>> {
    let mut found = Vec::new();
    let subdirs = list_subdirs(root, options).map_err(|e| RecordError::io(root, e))?;
    probe(root, &[], options, &mut found);
    for (name, path) in subdirs {
        walk(&path, vec![name], options, &mut found, warnings);
    }
    Ok(found)
}

fn walk(
    dir: &Path,
    components: Vec<String>,
    options: &RegistryOptions,
    found: &mut Vec<Location>,
    warnings: &mut Vec<RegistryWarning>,
) {
    probe(dir, &components, options, found);
    let subdirs = match list_subdirs(dir, options) {
        Ok(subdirs) => subdirs,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "cannot read directory");
            warnings.push(RegistryWarning {
                path: dir.to_path_buf(),
                kind: WarningKind::Skipped(RecordError::io(dir, err)),
            });
            return;
        }
    };
    for (name, path) in subdirs {
        let mut next = components.clone();
        next.push(name);
        walk(&path, next, options, found, warnings);
    }
}

/// Record the first recognised file in `dir`, if any.
fn probe(dir: &Path, components: &[String], options: &RegistryOptions, found: &mut Vec<Location>) {
    let Some(file) = options
        .record_files
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    else {
        return;
    };
    let category = match components {
        [first, _, ..] => first.clone(),
        _ => UNCATEGORIZED.to_string(),
    };
    found.push(Location { file, category });
}

/// Non-excluded subdirectories of `dir`, sorted by name. Symlinks are not
/// followed.
fn list_subdirs(dir: &Path, options: &RegistryOptions) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if options.exclude.iter().any(|ex| ex == &name) {
            continue;
        }
        subdirs.push((name, entry.path()));
    }
    subdirs.sort();
    Ok(subdirs)
}
