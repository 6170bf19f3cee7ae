//! Rough token accounting per tier.

use serde::Serialize;

use crate::registry::Registry;
use crate::resolver::{Tier, TieredResolver};

/// Approximate token count: one token per four characters, at least one.
pub fn estimate(text: &str) -> usize {
    (text.chars().count() / 4).max(1)
}

/// Totals for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub tier: Tier,
    /// Records that have the tier's own file.
    pub files: usize,
    pub tokens: usize,
}

impl TierStats {
    pub fn average(&self) -> usize {
        self.tokens.checked_div(self.files).unwrap_or(0)
    }

    /// Percentage saved relative to `baseline`, if both have content.
    pub fn reduction_from(&self, baseline: &TierStats) -> Option<f64> {
        (self.tokens > 0 && baseline.tokens > 0)
            .then(|| (1.0 - self.tokens as f64 / baseline.tokens as f64) * 100.0)
    }
}

/// Token totals for every tier across the registry. Only files that are the
/// tier's own file count; fallbacks are not double-counted. Unreadable files
/// are skipped.
pub fn tier_stats(registry: &Registry, resolver: &TieredResolver) -> Vec<TierStats> {
    Tier::ALL
        .into_iter()
        .map(|tier| {
            let mut stats = TierStats {
                tier,
                files: 0,
                tokens: 0,
            };
            for record in registry.records() {
                let Ok(resolution) = resolver.resolve(registry, &record.name, tier) else {
                    continue;
                };
                if resolution.served != tier {
                    continue;
                }
                match std::fs::read_to_string(&resolution.path) {
                    Ok(text) => {
                        stats.files += 1;
                        stats.tokens += estimate(&text);
                    }
                    Err(err) => {
                        tracing::warn!(path = %resolution.path.display(), error = %err, "cannot read tier file");
                    }
                }
            }
            stats
        })
        .collect()
}
