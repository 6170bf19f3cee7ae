//! `skills` CLI — browse, match and resolve skill records, and convert
//! between JSON and TOON.
//!
//! ## Usage
//!
//! ```sh
//! # List records under a skills tree
//! skills --root .agent-skills list
//!
//! # Rank records for a request
//! skills --root .agent-skills match "design a REST API"
//!
//! # Path of the most compact file available for a record
//! skills --root .agent-skills resolve api-design --tier ultra-compact
//!
//! # Build a prompt for an agent
//! skills --root .agent-skills query "review this PR" --style codex
//!
//! # Check every record and exit non-zero on errors
//! skills --root .agent-skills validate
//!
//! # JSON <-> TOON
//! echo '{"name":"api-design","tags":["api","rest"]}' | skills encode --abbreviate
//! skills decode -i SKILL.toon
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skill_engine::prompt::{self, PromptRequest, PromptStyle};
use skill_engine::tokens::{self, TierStats};
use skill_engine::{
    convert, validate, EngineConfig, KeywordMatcher, Record, Registry, Tier, TieredResolver,
    WarningKind,
};
use toon_codec::EncodeOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "skills",
    version,
    about = "Skill registry with keyword matching and tiered TOON resolution"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory of the skills tree
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// TOML config file (built-in keyword table and tier files if omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log discovery, fallback and matching decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Exit non-zero when any record file was skipped
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered records
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find records whose name or description contains TEXT
    Search { text: String },
    /// Rank records against a request
    Match {
        query: String,
        /// Maximum number of matches to print
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Print the file that serves a record at a tier
    Resolve {
        record: String,
        #[arg(long, default_value_t = Tier::Compact)]
        tier: Tier,
        /// Print the file content instead of its path
        #[arg(long)]
        print: bool,
    },
    /// Build an agent prompt for a request
    Query {
        query: String,
        /// Use this record instead of the best match
        #[arg(long)]
        skill: Option<String>,
        #[arg(long, default_value_t = Tier::Compact)]
        tier: Tier,
        /// Prompt style: gemini (file reference) or codex (inlined)
        #[arg(long, default_value_t = PromptStyle::Gemini)]
        style: PromptStyle,
        /// Report the estimated token count on stderr
        #[arg(long)]
        show_tokens: bool,
    },
    /// Check every record file and report problems
    Validate,
    /// Show token totals per tier
    Stats,
    /// Print a record's metadata as abbreviated TOON
    Convert { record: String },
    /// Encode JSON to TOON
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write well-known keys as single letters
        #[arg(long)]
        abbreviate: bool,
    },
    /// Decode TOON to pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let Cli {
        command,
        root,
        config,
        verbose,
        strict,
    } = Cli::parse();
    init_logging(verbose);
    let open = || Session::open(&root, config.as_deref(), strict);

    match command {
        Commands::List { json } => {
            let session = open()?;
            let records: Vec<&Record> = session.registry.records().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }
        Commands::Search { text } => {
            let session = open()?;
            let records = session.registry.search(&text);
            if records.is_empty() {
                eprintln!("no records match `{text}`");
            }
            print_records(&records);
        }
        Commands::Match { query, limit } => {
            let session = open()?;
            let matches = session.matcher.matches(&query);
            if matches.is_empty() {
                eprintln!("no records match `{query}`");
            }
            for m in matches.iter().take(limit) {
                println!("[{}] {}", m.score, m.id);
            }
        }
        Commands::Resolve {
            record,
            tier,
            print,
        } => {
            let session = open()?;
            let resolution = match session.resolver.resolve(&session.registry, &record, tier) {
                Ok(resolution) => resolution,
                Err(err) => {
                    eprintln!("error: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            if print {
                let content = std::fs::read_to_string(&resolution.path).with_context(|| {
                    format!("Failed to read file: {}", resolution.path.display())
                })?;
                print!("{content}");
            } else {
                println!("{}", resolution.path.display());
            }
        }
        Commands::Query {
            query,
            skill,
            tier,
            style,
            show_tokens,
        } => {
            let session = open()?;
            let request = PromptRequest {
                query: &query,
                record: skill.as_deref(),
                tier,
                style,
            };
            let prompt = match prompt::assemble(
                &session.registry,
                &session.matcher,
                &session.resolver,
                request,
            ) {
                Ok(prompt) => prompt,
                Err(err) => {
                    eprintln!("error: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            println!("{}", prompt.text);
            if show_tokens {
                eprintln!(
                    "record: {} ({} tier, ~{} tokens)",
                    prompt.record, prompt.resolution.served, prompt.tokens
                );
            }
        }
        Commands::Validate => {
            let config = load_config(config.as_deref())?;
            return run_validate(&root, &config);
        }
        Commands::Stats => {
            let session = open()?;
            print_stats(&tokens::tier_stats(&session.registry, &session.resolver));
        }
        Commands::Convert { record } => {
            let session = open()?;
            let Some(found) = session.registry.get(&record) else {
                eprintln!("error: unknown record `{record}`");
                return Ok(ExitCode::FAILURE);
            };
            let toon = convert::to_toon(found, session.registry.root())
                .with_context(|| format!("Failed to convert `{record}` to TOON"))?;
            print!("{toon}");
        }
        Commands::Encode {
            input,
            output,
            abbreviate,
        } => {
            let json = read_input(input.as_deref())?;
            let options = if abbreviate {
                EncodeOptions::abbreviated()
            } else {
                EncodeOptions::default()
            };
            let toon =
                toon_codec::encode_json(&json, &options).context("Failed to encode JSON to TOON")?;
            write_output(output.as_deref(), &toon)?;
        }
        Commands::Decode { input, output } => {
            let toon = read_input(input.as_deref())?;
            let (doc, diagnostics) = toon_codec::decode_with_diagnostics(&toon)
                .context("Failed to decode TOON to JSON")?;
            for d in &diagnostics {
                tracing::warn!(line = d.line, kind = ?d.kind, "skipped line");
            }
            let pretty = serde_json::to_string_pretty(&toon_codec::to_json(&doc))?;
            write_output(output.as_deref(), &format!("{pretty}\n"))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// overrides the default `warn` level unless `-v` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// A scanned tree plus the matcher and resolver configured for it.
struct Session {
    registry: Registry,
    matcher: KeywordMatcher,
    resolver: TieredResolver,
}

impl Session {
    fn open(root: &Path, config: Option<&Path>, strict: bool) -> Result<Self> {
        let config = load_config(config)?;
        let registry = Registry::build(root, &config.registry)
            .with_context(|| format!("Failed to scan skills root: {}", root.display()))?;

        let skipped = registry
            .warnings()
            .iter()
            .filter(|w| matches!(w.kind, WarningKind::Skipped(_)))
            .count();
        if strict && skipped > 0 {
            anyhow::bail!("{skipped} record file(s) skipped (--strict)");
        }

        Ok(Self {
            matcher: KeywordMatcher::for_registry(&config.keywords, &registry),
            resolver: TieredResolver::new(config.tiers),
            registry,
        })
    }
}

fn print_stats(stats: &[TierStats]) {
    println!(
        "{:<14} {:>6} {:>9} {:>8} {:>7}",
        "tier", "files", "tokens", "average", "saved"
    );
    let full = stats.iter().find(|s| s.tier == Tier::Full);
    for s in stats {
        let saved = match full {
            Some(full) if s.tier != Tier::Full => s
                .reduction_from(full)
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_else(|| "-".to_string()),
            _ => "-".to_string(),
        };
        println!(
            "{:<14} {:>6} {:>9} {:>8} {:>7}",
            s.tier.as_str(),
            s.files,
            s.tokens,
            s.average(),
            saved
        );
    }
}

fn run_validate(root: &Path, config: &EngineConfig) -> Result<ExitCode> {
    let report = validate::check_tree(root, &config.registry)
        .with_context(|| format!("Failed to scan skills root: {}", root.display()))?;
    for issue in &report.issues {
        println!("{issue}");
    }
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    println!(
        "checked {} file(s): {errors} error(s), {warnings} warning(s)",
        report.checked
    );
    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_records(records: &[&Record]) {
    for record in records {
        println!(
            "{:<32} {:<16} {}",
            record.name, record.category, record.description
        );
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
