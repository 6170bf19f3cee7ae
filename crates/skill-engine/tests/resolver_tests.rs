use std::path::{Path, PathBuf};

use skill_engine::resolver::PerTier;
use skill_engine::{
    Record, Registry, RegistryOptions, ResolveError, Tier, TierConfig, TieredResolver,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")).join(name)
}

fn scenario() -> Registry {
    Registry::build(&fixture("scenario"), &RegistryOptions::default()).unwrap()
}

// ============================================================================
// Tier names
// ============================================================================

#[test]
fn tier_parses_names_and_aliases() {
    assert_eq!("full".parse::<Tier>().unwrap(), Tier::Full);
    assert_eq!("Compact".parse::<Tier>().unwrap(), Tier::Compact);
    for alias in ["ultra-compact", "ultra_compact", "ultra", "toon", " TOON "] {
        assert_eq!(alias.parse::<Tier>().unwrap(), Tier::UltraCompact, "{alias}");
    }
    let err = "tiny".parse::<Tier>().unwrap_err();
    assert!(err.to_string().contains("tiny"));
}

#[test]
fn tier_display_round_trips() {
    for tier in Tier::ALL {
        assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
    }
}

// ============================================================================
// Chains
// ============================================================================

#[test]
fn default_chains_end_at_full() {
    let resolver = TieredResolver::default();
    assert_eq!(resolver.chain(Tier::Full), ["SKILL.md"]);
    assert_eq!(resolver.chain(Tier::Compact), ["SKILL.compact.md", "SKILL.md"]);
    assert_eq!(
        resolver.chain(Tier::UltraCompact),
        ["SKILL.toon", "SKILL.compact.md", "SKILL.md"]
    );
    assert!(resolver.config().check().is_ok());
}

#[test]
fn chains_follow_renamed_files() {
    let config = TierConfig::from_files(PerTier {
        full: "README.md".to_string(),
        compact: "SHORT.md".to_string(),
        ultra_compact: "TINY.toon".to_string(),
    });
    assert_eq!(config.fallback.ultra_compact, ["TINY.toon", "SHORT.md", "README.md"]);
    assert_eq!(config.tier_of("SHORT.md"), Some(Tier::Compact));
    assert_eq!(config.tier_of("SKILL.md"), None);
}

#[test]
fn check_rejects_chains_that_skip_own_file_or_full() {
    let mut config = TierConfig::default();
    config.fallback.compact = vec!["SKILL.md".to_string()];
    assert!(config.check().unwrap_err().contains("start with `SKILL.compact.md`"));

    let mut config = TierConfig::default();
    config.fallback.ultra_compact = vec!["SKILL.toon".to_string(), "SKILL.compact.md".to_string()];
    assert!(config.check().unwrap_err().contains("end with `SKILL.md`"));

    let mut config = TierConfig::default();
    config.fallback.compact = vec![
        "SKILL.compact.md".to_string(),
        "NOTES.md".to_string(),
        "SKILL.md".to_string(),
    ];
    assert!(config.check().unwrap_err().contains("NOTES.md"));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn own_file_is_served_when_present() {
    let registry = scenario();
    let resolver = TieredResolver::default();
    for (tier, file) in [
        (Tier::Full, "SKILL.md"),
        (Tier::Compact, "SKILL.compact.md"),
        (Tier::UltraCompact, "SKILL.toon"),
    ] {
        let resolution = resolver.resolve(&registry, "beta", tier).unwrap();
        assert_eq!(resolution.path, fixture("scenario/beta").join(file));
        assert_eq!(resolution.requested, tier);
        assert_eq!(resolution.served, tier);
        assert!(!resolution.degraded);
    }
}

#[test]
fn missing_tiers_fall_back_to_full() {
    let registry = scenario();
    let resolver = TieredResolver::default();
    for tier in [Tier::Compact, Tier::UltraCompact] {
        let resolution = resolver.resolve(&registry, "alpha", tier).unwrap();
        assert_eq!(resolution.path, fixture("scenario/alpha/SKILL.md"));
        assert_eq!(resolution.served, Tier::Full);
        assert!(resolution.degraded);
    }
}

#[test]
fn fallback_stops_at_first_existing_file() {
    // api-design has full and compact files but no TOON file.
    let registry = Registry::build(&fixture("corpus"), &RegistryOptions::default()).unwrap();
    let resolution = TieredResolver::default()
        .resolve(&registry, "api-design", Tier::UltraCompact)
        .unwrap();
    assert_eq!(resolution.served, Tier::Compact);
    assert_eq!(
        resolution.path,
        fixture("corpus/backend/api-design/SKILL.compact.md")
    );
}

#[test]
fn encoded_only_record_resolves_at_every_tier() {
    let registry = Registry::build(&fixture("corpus"), &RegistryOptions::default()).unwrap();
    let resolver = TieredResolver::default();
    let toon = fixture("corpus/backend/database-schema-design/SKILL.toon");
    for tier in Tier::ALL {
        let resolution = resolver
            .resolve(&registry, "database-schema-design", tier)
            .unwrap();
        assert_eq!(resolution.path, toon, "{tier}");
        assert_eq!(resolution.served, Tier::UltraCompact);
        assert_eq!(resolution.degraded, tier != Tier::UltraCompact);
    }
}

#[test]
fn every_registered_record_resolves_at_every_tier() {
    let registry = Registry::build(&fixture("corpus"), &RegistryOptions::default()).unwrap();
    let resolver = TieredResolver::default();
    for name in registry.names() {
        for tier in Tier::ALL {
            assert!(resolver.resolve(&registry, name, tier).is_ok(), "{name} @ {tier}");
        }
    }
}

#[test]
fn record_whose_files_are_gone_is_not_found() {
    let text = "N:vanished\nD:Registered then deleted from disk.\n";
    let record = Record::parse(Path::new("/nowhere/vanished/SKILL.toon"), text, "test").unwrap();
    let registry = Registry::from_records("/nowhere", [record]);

    let err = TieredResolver::default()
        .resolve(&registry, "vanished", Tier::Compact)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::RecordNotFound {
            record: "vanished".to_string(),
            tier: Tier::Compact,
            probed: vec!["SKILL.compact.md".to_string(), "SKILL.md".to_string()],
        }
    );
    assert!(err.to_string().contains("tried SKILL.compact.md, SKILL.md"));
}

#[test]
fn unknown_record() {
    let err = TieredResolver::default()
        .resolve(&scenario(), "gamma", Tier::Full)
        .unwrap_err();
    assert_eq!(err, ResolveError::UnknownRecord("gamma".to_string()));
}

#[test]
fn resolve_in_probes_a_directory_directly() {
    let resolver = TieredResolver::default();
    let resolution = resolver
        .resolve_in(&fixture("scenario/beta"), Tier::Compact)
        .unwrap();
    assert_eq!(resolution.path, fixture("scenario/beta/SKILL.compact.md"));

    let err = resolver
        .resolve_in(&fixture("corpus/broken"), Tier::Full)
        .unwrap_err();
    assert!(matches!(err, ResolveError::RecordNotFound { ref record, .. } if record == "broken"));
}
