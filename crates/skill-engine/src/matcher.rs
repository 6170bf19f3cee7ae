//! Keyword matcher: free-text query → ranked record identifiers.
//!
//! For each table entry the score is the sum of:
//!
//! - 100 when the identifier itself appears in the query as a standalone token;
//! - for each single-token phrase (no space, no `/`), 1 when it appears as a
//!   standalone token;
//! - for each multi-word phrase, its word count when it appears anywhere in the
//!   query, with no boundary check.
//!
//! "Standalone" means the characters on either side are not ASCII letters,
//! digits, `_` or `-`, so `api` does not match inside `api-designer`. Matching
//! is case-insensitive. Multi-word phrases are deliberately unanchored:
//! `"rest api"` also matches `"interest apis"`.
//!
//! Results are sorted by descending score; ties keep table order. Entries
//! scoring 0 are dropped.
//!
//! Empty and whitespace-only phrases are ignored; they would otherwise match
//! every query.

use serde::Serialize;

use crate::keywords::{KeywordEntry, KeywordTable};
use crate::registry::Registry;

/// Score added when the query names the identifier itself.
pub const EXPLICIT_MENTION_SCORE: u32 = 100;

/// A scored identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: String,
    pub score: u32,
}

/// Scores queries against a keyword table.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    entries: Vec<Entry>,
}

/// A table entry with its identifier and phrases lowercased once up front.
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    id_lower: String,
    phrases: Vec<Phrase>,
}

#[derive(Debug, Clone)]
enum Phrase {
    /// Matched on token boundaries, worth 1.
    Token(String),
    /// Matched as a plain substring, worth its word count.
    Words { text: String, weight: u32 },
}

impl KeywordMatcher {
    /// Build a matcher over every entry of `table`.
    pub fn new(table: &[KeywordEntry]) -> Self {
        Self {
            entries: table.iter().map(Entry::compile).collect(),
        }
    }

    /// Build a matcher restricted to registered records.
    ///
    /// Table entries whose identifier is registered come first, in table
    /// order. Registered names missing from the table follow in sorted order;
    /// they can only be matched by explicit mention.
    pub fn for_registry(table: &[KeywordEntry], registry: &Registry) -> Self {
        let mut entries: Vec<Entry> = table
            .iter()
            .filter(|e| registry.contains(&e.id))
            .map(Entry::compile)
            .collect();
        for name in registry.names() {
            if !table.iter().any(|e| e.id == name) {
                entries.push(Entry::compile(&KeywordEntry::new(name, Vec::<String>::new())));
            }
        }
        Self { entries }
    }

    /// Identifiers this matcher can return, in tie-break order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Every identifier with a non-zero score, best first.
    pub fn matches(&self, query: &str) -> Vec<Match> {
        let query = query.to_lowercase();
        let mut matches: Vec<Match> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = entry.score(&query);
                (score > 0).then(|| Match {
                    id: entry.id.clone(),
                    score,
                })
            })
            .collect();
        // Stable: equal scores keep table order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        tracing::debug!(query = %query, matched = matches.len(), "scored query");
        matches
    }

    /// The top match, if any.
    pub fn best(&self, query: &str) -> Option<Match> {
        self.matches(query).into_iter().next()
    }
}

impl From<&KeywordTable> for KeywordMatcher {
    fn from(table: &KeywordTable) -> Self {
        Self::new(table)
    }
}

impl Entry {
    fn compile(entry: &KeywordEntry) -> Self {
        let phrases = entry
            .phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                let lower = p.to_lowercase();
                if lower.contains(' ') || lower.contains('/') {
                    let weight = p.split_whitespace().count() as u32;
                    Phrase::Words {
                        text: lower,
                        weight,
                    }
                } else {
                    Phrase::Token(lower)
                }
            })
            .collect();
        Self {
            id: entry.id.clone(),
            id_lower: entry.id.to_lowercase(),
            phrases,
        }
    }

    /// Score against an already-lowercased query.
    fn score(&self, query: &str) -> u32 {
        let mut score = 0;
        if !self.id_lower.is_empty() && contains_token(query, &self.id_lower) {
            score += EXPLICIT_MENTION_SCORE;
        }
        for phrase in &self.phrases {
            score += match phrase {
                Phrase::Token(token) if contains_token(query, token) => 1,
                Phrase::Words { text, weight } if query.contains(text.as_str()) => *weight,
                _ => 0,
            };
        }
        score
    }
}

/// Characters that extend a token. Anything else is a boundary.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Whether `needle` occurs in `haystack` with a boundary on both sides.
/// Overlapping occurrences are all considered.
pub(crate) fn contains_token(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let before_ok = haystack[..start].chars().next_back().is_none_or(|c| !is_token_char(c));
        let after_ok = haystack[end..].chars().next().is_none_or(|c| !is_token_char(c));
        if before_ok && after_ok {
            return true;
        }
        // Advance one character past the start of this occurrence.
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
