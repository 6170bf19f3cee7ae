//! End-to-end: registry → matcher → resolver → prompt over a two-record tree.
//!
//! `alpha` ships only its full file; `beta` ships all three tiers.

use std::path::{Path, PathBuf};

use skill_engine::prompt::{assemble, render};
use skill_engine::{
    EngineConfig, KeywordEntry, KeywordMatcher, PromptError, PromptRequest, PromptStyle,
    Registry, Tier, TieredResolver,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")).join(name)
}

struct Engine {
    registry: Registry,
    matcher: KeywordMatcher,
    resolver: TieredResolver,
}

fn engine() -> Engine {
    let config = EngineConfig {
        keywords: vec![KeywordEntry::new("beta", ["tiers", "every tier"])],
        ..EngineConfig::default()
    };
    let registry = Registry::build(&fixture("scenario"), &config.registry).unwrap();
    let matcher = KeywordMatcher::for_registry(&config.keywords, &registry);
    let resolver = TieredResolver::new(config.tiers);
    Engine {
        registry,
        matcher,
        resolver,
    }
}

#[test]
fn both_records_register_cleanly() {
    let e = engine();
    assert_eq!(e.registry.names().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    assert!(e.registry.warnings().is_empty());
}

#[test]
fn naming_a_record_matches_only_that_record() {
    let e = engine();
    let matches = e.matcher.matches("alpha");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "alpha");
    assert!(matches[0].score >= 100);
}

#[test]
fn beta_serves_its_own_ultra_compact_file() {
    let e = engine();
    let resolution = e.resolver.resolve(&e.registry, "beta", Tier::UltraCompact).unwrap();
    assert_eq!(resolution.path, fixture("scenario/beta/SKILL.toon"));
    assert!(!resolution.degraded);
}

#[test]
fn alpha_compact_falls_back_to_full() {
    let e = engine();
    let resolution = e.resolver.resolve(&e.registry, "alpha", Tier::Compact).unwrap();
    assert_eq!(resolution.path, fixture("scenario/alpha/SKILL.md"));
    assert_eq!(resolution.served, Tier::Full);
}

// ============================================================================
// Prompt assembly
// ============================================================================

#[test]
fn gemini_prompt_references_the_file() {
    let e = engine();
    let prompt = assemble(
        &e.registry,
        &e.matcher,
        &e.resolver,
        PromptRequest {
            query: "explain every tier",
            record: None,
            tier: Tier::UltraCompact,
            style: PromptStyle::Gemini,
        },
    )
    .unwrap();
    assert_eq!(prompt.record, "beta");
    let path = fixture("scenario/beta/SKILL.toon");
    assert_eq!(prompt.text, format!("@{}\n\nexplain every tier", path.display()));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        prompt.tokens,
        skill_engine::tokens::estimate(&format!("{content}explain every tier"))
    );
}

#[test]
fn codex_prompt_inlines_content() {
    let e = engine();
    let prompt = assemble(
        &e.registry,
        &e.matcher,
        &e.resolver,
        PromptRequest {
            query: "go",
            record: Some("alpha"),
            tier: Tier::UltraCompact,
            style: PromptStyle::Codex,
        },
    )
    .unwrap();
    let content = std::fs::read_to_string(fixture("scenario/alpha/SKILL.md")).unwrap();
    assert_eq!(prompt.text, format!("{content}\n\n---\n\ngo"));
    assert!(prompt.resolution.degraded);
}

#[test]
fn no_match_is_reported() {
    let e = engine();
    let err = assemble(
        &e.registry,
        &e.matcher,
        &e.resolver,
        PromptRequest {
            query: "nothing relevant",
            record: None,
            tier: Tier::Full,
            style: PromptStyle::Gemini,
        },
    )
    .unwrap_err();
    assert!(matches!(err, PromptError::NoMatch(ref q) if q == "nothing relevant"));
}

#[test]
fn explicit_unknown_record_is_a_resolve_error() {
    let e = engine();
    let err = assemble(
        &e.registry,
        &e.matcher,
        &e.resolver,
        PromptRequest {
            query: "x",
            record: Some("gamma"),
            tier: Tier::Full,
            style: PromptStyle::Gemini,
        },
    )
    .unwrap_err();
    assert!(matches!(err, PromptError::Resolve(_)));
}

#[test]
fn prompt_style_parses() {
    assert_eq!("Codex".parse::<PromptStyle>().unwrap(), PromptStyle::Codex);
    assert_eq!(PromptStyle::default(), PromptStyle::Gemini);
    assert!("claude".parse::<PromptStyle>().is_err());
    let resolution = engine()
        .resolver
        .resolve_in(&fixture("scenario/beta"), Tier::Full)
        .unwrap();
    assert!(render(PromptStyle::Gemini, &resolution, "", "q").starts_with('@'));
}

// ============================================================================
// Token accounting
// ============================================================================

#[test]
fn tier_stats_count_only_own_files() {
    let e = engine();
    let stats = skill_engine::tokens::tier_stats(&e.registry, &e.resolver);
    let files: Vec<(Tier, usize)> = stats.iter().map(|s| (s.tier, s.files)).collect();
    assert_eq!(
        files,
        vec![(Tier::Full, 2), (Tier::Compact, 1), (Tier::UltraCompact, 1)]
    );

    let toon = std::fs::read_to_string(fixture("scenario/beta/SKILL.toon")).unwrap();
    assert_eq!(stats[2].tokens, skill_engine::tokens::estimate(&toon));
    assert!(stats[2].reduction_from(&stats[0]).unwrap() > 0.0);
}
