//! # skill-engine
//!
//! Finds the right skill record for a free-text request and serves it at the
//! smallest fidelity tier available.
//!
//! A skill lives in its own directory as a long-form `SKILL.md` (frontmatter +
//! Markdown), optionally alongside a `SKILL.compact.md` and a TOON-encoded
//! `SKILL.toon`. The [`Registry`] scans a root once, the [`KeywordMatcher`]
//! ranks records for a query, and the [`TieredResolver`] picks the file to
//! serve, falling back to more detailed tiers when a file is missing.
//!
//! ```no_run
//! use std::path::Path;
//! use skill_engine::{EngineConfig, KeywordMatcher, Registry, Tier, TieredResolver};
//!
//! let config = EngineConfig::default();
//! let registry = Registry::build(Path::new(".agent-skills"), &config.registry)?;
//! let matcher = KeywordMatcher::for_registry(&config.keywords, &registry);
//! let resolver = TieredResolver::new(config.tiers.clone());
//!
//! if let Some(best) = matcher.best("design a REST API") {
//!     let resolution = resolver.resolve(&registry, &best.id, Tier::UltraCompact)?;
//!     println!("{}", resolution.path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`frontmatter`] — `---` delimited key/value preamble
//! - [`record`] — the record model, parsed from either file kind
//! - [`registry`] — directory scan and name index
//! - [`keywords`] — keyword table type and the built-in table
//! - [`matcher`] — weighted keyword scoring
//! - [`resolver`] — tiers, fallback chains, file lookup
//! - [`config`] — TOML configuration
//! - [`validate`] — authoring checks
//! - [`tokens`] — token estimates and per-tier totals
//! - [`convert`] — record metadata → TOON
//! - [`prompt`] — prompt assembly for agent CLIs
//! - [`error`] — error types

pub mod config;
pub mod convert;
pub mod error;
pub mod frontmatter;
pub mod keywords;
pub mod matcher;
pub mod prompt;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod tokens;
pub mod validate;

pub use config::EngineConfig;
pub use error::{ConfigError, FrontmatterError, PromptError, RecordError, ResolveError};
pub use frontmatter::{extract, Frontmatter, FrontmatterValue};
pub use keywords::{KeywordEntry, KeywordTable};
pub use matcher::{KeywordMatcher, Match};
pub use prompt::{Prompt, PromptRequest, PromptStyle};
pub use record::{Record, SourceKind};
pub use registry::{Registry, RegistryOptions, RegistryWarning, WarningKind};
pub use resolver::{Resolution, Tier, TierConfig, TieredResolver};
pub use validate::{Issue, Severity, ValidationReport};
