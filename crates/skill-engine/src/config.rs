//! Engine configuration: keyword table, tier files, fallback chains and
//! registry options, with TOML loading.
//!
//! Every section is optional; omitted sections keep their defaults. When
//! `[tiers]` renames a file but `[fallback]` is absent, the chains are derived
//! from the new names.
//!
//! ```toml
//! [tiers]
//! full = "SKILL.md"
//! compact = "SKILL.compact.md"
//! ultra-compact = "SKILL.toon"
//!
//! [fallback]
//! compact = ["SKILL.compact.md", "SKILL.md"]
//!
//! [registry]
//! record-files = ["SKILL.md", "SKILL.toon"]
//! exclude = ["templates", "backup", "backups"]
//!
//! [[keywords]]
//! id = "api-design"
//! phrases = ["api", "rest", "api design"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::keywords::{self, KeywordTable};
use crate::registry::RegistryOptions;
use crate::resolver::{PerTier, TierConfig};

/// Everything the engine needs besides the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub keywords: KeywordTable,
    pub tiers: TierConfig,
    pub registry: RegistryOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keywords: keywords::builtin(),
            tiers: TierConfig::default(),
            registry: RegistryOptions::default(),
        }
    }
}

/// On-disk shape: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    tiers: Option<RawTiers>,
    fallback: Option<RawFallback>,
    registry: Option<RegistryOptions>,
    keywords: Option<KeywordTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawTiers {
    full: Option<String>,
    compact: Option<String>,
    ultra_compact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawFallback {
    full: Option<Vec<String>>,
    compact: Option<Vec<String>>,
    ultra_compact: Option<Vec<String>>,
}

impl EngineConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), keywords = config.keywords.len(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let defaults = Self::default();

        let tiers = match raw.tiers {
            Some(t) => {
                let base = &defaults.tiers.files;
                TierConfig::from_files(PerTier {
                    full: t.full.unwrap_or_else(|| base.full.clone()),
                    compact: t.compact.unwrap_or_else(|| base.compact.clone()),
                    ultra_compact: t.ultra_compact.unwrap_or_else(|| base.ultra_compact.clone()),
                })
            }
            None => defaults.tiers,
        };
        let tiers = match raw.fallback {
            Some(f) => TierConfig {
                fallback: PerTier {
                    full: f.full.unwrap_or_else(|| tiers.fallback.full.clone()),
                    compact: f.compact.unwrap_or_else(|| tiers.fallback.compact.clone()),
                    ultra_compact: f
                        .ultra_compact
                        .unwrap_or_else(|| tiers.fallback.ultra_compact.clone()),
                },
                files: tiers.files,
            },
            None => tiers,
        };

        let config = Self {
            keywords: raw.keywords.unwrap_or(defaults.keywords),
            tiers,
            registry: raw.registry.unwrap_or(defaults.registry),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tiers.check().map_err(ConfigError::Invalid)?;
        if self.registry.record_files.is_empty() {
            return Err(ConfigError::Invalid(
                "registry.record-files must name at least one file".to_string(),
            ));
        }
        if let Some(entry) = self.keywords.iter().find(|e| e.id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "keyword entry with empty id (phrases: {:?})",
                entry.phrases
            )));
        }
        Ok(())
    }
}
