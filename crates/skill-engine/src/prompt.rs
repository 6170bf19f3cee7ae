//! Prompt assembly: pick a record for a query, resolve a tier, and wrap the
//! query for the target agent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PromptError;
use crate::matcher::KeywordMatcher;
use crate::registry::Registry;
use crate::resolver::{Resolution, Tier, TieredResolver};
use crate::tokens;

/// How the record reaches the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// `@<path>` file reference, then the query.
    #[default]
    Gemini,
    /// The file content inlined, a `---` rule, then the query.
    Codex,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(PromptStyle::Gemini),
            "codex" => Ok(PromptStyle::Codex),
            other => Err(format!("unknown prompt style `{other}` (expected gemini or codex)")),
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromptStyle::Gemini => "gemini",
            PromptStyle::Codex => "codex",
        })
    }
}

/// An assembled prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub record: String,
    pub resolution: Resolution,
    pub text: String,
    /// Estimated tokens of the served file plus the query.
    pub tokens: usize,
}

/// What to build a prompt from.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub query: &'a str,
    /// Use this record instead of the best keyword match.
    pub record: Option<&'a str>,
    pub tier: Tier,
    pub style: PromptStyle,
}

/// Build a prompt for `request`.
///
/// # Errors
///
/// [`PromptError::NoMatch`] when no record is named and nothing matches,
/// resolution errors, and I/O errors reading the served file.
pub fn assemble(
    registry: &Registry,
    matcher: &KeywordMatcher,
    resolver: &TieredResolver,
    request: PromptRequest<'_>,
) -> Result<Prompt, PromptError> {
    let record = match request.record {
        Some(id) => id.to_string(),
        None => {
            matcher
                .best(request.query)
                .ok_or_else(|| PromptError::NoMatch(request.query.to_string()))?
                .id
        }
    };

    let resolution = resolver.resolve(registry, &record, request.tier)?;
    let content =
        std::fs::read_to_string(&resolution.path).map_err(|source| PromptError::Io {
            path: resolution.path.clone(),
            source,
        })?;

    let text = render(request.style, &resolution, &content, request.query);
    let tokens = tokens::estimate(&format!("{content}{}", request.query));
    Ok(Prompt {
        record,
        resolution,
        text,
        tokens,
    })
}

/// Render the prompt text for an already-resolved file.
pub fn render(style: PromptStyle, resolution: &Resolution, content: &str, query: &str) -> String {
    match style {
        PromptStyle::Gemini => format!("@{}\n\n{query}", resolution.path.display()),
        PromptStyle::Codex => format!("{content}\n\n---\n\n{query}"),
    }
}
