//! Tiered resolver: record identifier + fidelity tier → the file to serve.
//!
//! Each tier has one canonical file name and a fallback chain: the tier's own
//! file first, then higher-fidelity files, always ending at the full file. A
//! record with only its full file is therefore resolvable at every tier; the
//! cost is serving more text than was asked for.
//!
//! A registered record whose chain is exhausted is served from the file it was
//! registered from, so an encoded-only record still resolves at the full tier.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::record::SourceKind;
use crate::registry::Registry;

/// Fidelity level at which a record's content is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Full,
    Compact,
    UltraCompact,
}

impl Tier {
    /// From most to least detailed.
    pub const ALL: [Tier; 3] = [Tier::Full, Tier::Compact, Tier::UltraCompact];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Full => "full",
            Tier::Compact => "compact",
            Tier::UltraCompact => "ultra-compact",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised tier name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTierError(String);

impl fmt::Display for ParseTierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tier `{}` (expected full, compact or ultra-compact)",
            self.0
        )
    }
}

impl std::error::Error for ParseTierError {}

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Tier::Full),
            "compact" => Ok(Tier::Compact),
            "ultra-compact" | "ultra_compact" | "ultra" | "toon" => Ok(Tier::UltraCompact),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

/// Per-tier values, one slot per [`Tier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PerTier<T> {
    pub full: T,
    pub compact: T,
    pub ultra_compact: T,
}

impl<T> PerTier<T> {
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Full => &self.full,
            Tier::Compact => &self.compact,
            Tier::UltraCompact => &self.ultra_compact,
        }
    }
}

/// Tier file names and fallback chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierConfig {
    pub files: PerTier<String>,
    pub fallback: PerTier<Vec<String>>,
}

impl TierConfig {
    /// Chains derived from the file names: each tier falls back through every
    /// more detailed tier.
    pub fn from_files(files: PerTier<String>) -> Self {
        let chain = |tier: Tier| -> Vec<String> {
            Tier::ALL[..=tier as usize]
                .iter()
                .rev()
                .map(|t| files.get(*t).clone())
                .collect()
        };
        let fallback = PerTier {
            full: chain(Tier::Full),
            compact: chain(Tier::Compact),
            ultra_compact: chain(Tier::UltraCompact),
        };
        Self { files, fallback }
    }

    /// The tier whose canonical file is `file_name`.
    pub fn tier_of(&self, file_name: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| self.files.get(*t) == file_name)
    }

    /// Check that every chain starts with its own tier's file, ends with the
    /// full file and names only configured tier files.
    pub fn check(&self) -> Result<(), String> {
        for tier in Tier::ALL {
            let chain = self.fallback.get(tier);
            let own = self.files.get(tier);
            if chain.first() != Some(own) {
                return Err(format!("{tier} fallback chain must start with `{own}`"));
            }
            if chain.last() != Some(&self.files.full) {
                return Err(format!(
                    "{tier} fallback chain must end with `{}`",
                    self.files.full
                ));
            }
            if let Some(stray) = chain.iter().find(|f| self.tier_of(f).is_none()) {
                return Err(format!(
                    "{tier} fallback chain names `{stray}`, which is not a tier file"
                ));
            }
        }
        Ok(())
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self::from_files(PerTier {
            full: "SKILL.md".to_string(),
            compact: "SKILL.compact.md".to_string(),
            ultra_compact: "SKILL.toon".to_string(),
        })
    }
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: PathBuf,
    pub requested: Tier,
    pub served: Tier,
    /// `served` differs from `requested`.
    pub degraded: bool,
}

/// Locates tier files using a [`TierConfig`].
#[derive(Debug, Clone, Default)]
pub struct TieredResolver {
    config: TierConfig,
}

impl TieredResolver {
    pub fn new(config: TierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// File names probed for `tier`, in order.
    pub fn chain(&self, tier: Tier) -> &[String] {
        self.config.fallback.get(tier)
    }

    /// Resolve a registered record.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownRecord`] if `id` is not registered,
    /// [`ResolveError::RecordNotFound`] if no file in the chain exists and the
    /// file the record was registered from is gone.
    pub fn resolve(
        &self,
        registry: &Registry,
        id: &str,
        tier: Tier,
    ) -> Result<Resolution, ResolveError> {
        let record = registry
            .get(id)
            .ok_or_else(|| ResolveError::UnknownRecord(id.to_string()))?;
        match self.probe(&record.dir, id, tier) {
            Err(ResolveError::RecordNotFound { .. }) if record.file.is_file() => {
                let served = record
                    .file
                    .file_name()
                    .and_then(|n| self.config.tier_of(&n.to_string_lossy()))
                    .unwrap_or(match record.kind {
                        SourceKind::Encoded => Tier::UltraCompact,
                        SourceKind::LongForm => Tier::Full,
                    });
                tracing::debug!(
                    record = id,
                    requested = %tier,
                    served = %served,
                    "chain exhausted, serving source file"
                );
                Ok(Resolution {
                    path: record.file.clone(),
                    requested: tier,
                    served,
                    degraded: served != tier,
                })
            }
            other => other,
        }
    }

    /// Resolve directly against a record directory.
    pub fn resolve_in(&self, dir: &Path, tier: Tier) -> Result<Resolution, ResolveError> {
        let label = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        self.probe(dir, &label, tier)
    }

    fn probe(&self, dir: &Path, id: &str, tier: Tier) -> Result<Resolution, ResolveError> {
        for name in self.chain(tier) {
            let path = dir.join(name);
            if path.is_file() {
                let served = self.config.tier_of(name).unwrap_or(tier);
                if served != tier {
                    tracing::debug!(record = id, requested = %tier, served = %served, "tier fell back");
                }
                return Ok(Resolution {
                    path,
                    requested: tier,
                    served,
                    degraded: served != tier,
                });
            }
        }
        Err(ResolveError::RecordNotFound {
            record: id.to_string(),
            tier,
            probed: self.chain(tier).to_vec(),
        })
    }
}
