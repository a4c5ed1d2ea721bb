//! insight-classify — batch classification of a mentions table.
//!
//! Reads a JSON records table, runs the official-account pass and then the
//! priority rule engine, and writes the classified table plus an optional
//! execution summary. `--check` validates the rules against the table header
//! without classifying anything.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use insight_core::config::{load_dotenv, Config};
use insight_core::Table;
use insight_rules::loader::{RuleLoader, SheetRowError};
use insight_rules::official::OfficialAccountMatch;
use insight_rules::prep::{derive_followers, standardize_verified_column, strip_noise_tag_decimal};
use insight_rules::schema::{ClassificationRule, OfficialAccountRule};
use insight_rules::summary::ExecutionSummary;
use insight_rules::validation::{self, ValidationError, ValidationResult};
use insight_rules::{EngineOptions, OfficialAccountClassifier, RuleEngine};

// ── CLI ─────────────────────────────────────────────────────────────

/// Classify mentions with priority-ordered rules.
#[derive(Parser, Debug)]
#[command(name = "insight-classify", version, about)]
struct Cli {
    /// Input table: JSON array of records.
    #[arg(long)]
    input: PathBuf,

    /// Output path for the classified table. Defaults to overwriting the input.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rule YAML file or directory, or a `.json` rule sheet. Overrides RULES_PATH.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Official account setup: YAML document or `.json` sheet.
    #[arg(long)]
    official_accounts: Option<PathBuf>,

    /// Project whose rules run on top of the default scope. Overrides PROJECT_NAME.
    #[arg(long)]
    project: Option<String>,

    /// Write the execution summary JSON here.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Drop rows repeating an earlier value of this column before classifying.
    #[arg(long)]
    dedupe_column: Option<String>,

    /// Validate rules against the input header and exit.
    #[arg(long)]
    check: bool,
}

/// Summary file contents.
#[derive(Serialize)]
struct RunReport<'a> {
    project: &'a str,
    rows: usize,
    official_accounts: &'a [OfficialAccountMatch],
    #[serde(flatten)]
    summary: &'a ExecutionSummary,
}

// ── Rule sources ────────────────────────────────────────────────────

#[derive(Default)]
struct RuleSources {
    rules: Vec<ClassificationRule>,
    official: Vec<OfficialAccountRule>,
    rejected: Vec<SheetRowError>,
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn load_yaml(path: &Path) -> anyhow::Result<RuleLoader> {
    let mut loader = RuleLoader::new(path.to_path_buf());
    loader
        .load_all()
        .with_context(|| format!("failed to load rules from {}", path.display()))?;
    Ok(loader)
}

fn load_sources(rules_path: &Path, official_path: Option<&Path>) -> anyhow::Result<RuleSources> {
    let mut sources = RuleSources::default();

    if is_json(rules_path) {
        let (rules, rejected) = RuleLoader::load_rule_sheet(rules_path)
            .with_context(|| format!("failed to read rule sheet {}", rules_path.display()))?;
        sources.rules = rules;
        sources.rejected.extend(rejected);
    } else {
        let loader = load_yaml(rules_path)?;
        sources.rules = loader.classification_rules();
        sources.official = loader.official_accounts();
    }

    if let Some(path) = official_path {
        if is_json(path) {
            let (accounts, rejected) = RuleLoader::load_official_sheet(path)
                .with_context(|| format!("failed to read official account sheet {}", path.display()))?;
            sources.official.extend(accounts);
            sources.rejected.extend(rejected);
        } else {
            sources.official.extend(load_yaml(path)?.official_accounts());
        }
    }

    Ok(sources)
}

fn check(sources: &RuleSources, table: &Table) -> anyhow::Result<()> {
    let header: Vec<&str> = table.column_names().collect();
    let mut result = validation::validate_rules(&sources.rules, Some(header.as_slice()));
    for entry in &sources.official {
        result.merge(validation::validate_official_account(entry, Some(header.as_slice())));
    }
    for rejected in &sources.rejected {
        result.merge(ValidationResult {
            valid: false,
            errors: vec![ValidationError {
                path: format!("sheet row {}", rejected.row),
                message: rejected.message.clone(),
                suggestion: None,
            }],
            warnings: Vec::new(),
        });
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.valid {
        bail!("{} rule error(s) found", result.errors.len());
    }
    Ok(())
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    let rules_path = cli.rules.unwrap_or_else(|| config.rules.rules_path.clone());
    let official_path = cli
        .official_accounts
        .or_else(|| config.rules.official_accounts_path.clone());
    let project = cli
        .project
        .or_else(|| config.rules.project.clone())
        .unwrap_or_else(|| config.engine.default_scope.clone());

    let mut table = Table::read_json(&cli.input)
        .with_context(|| format!("failed to read input table {}", cli.input.display()))?;
    info!(path = %cli.input.display(), rows = table.len(), "loaded input table");

    let sources = load_sources(&rules_path, official_path.as_deref())?;
    if !sources.rejected.is_empty() {
        warn!(rejected = sources.rejected.len(), "some rule sheet rows were rejected");
    }

    if cli.check {
        return check(&sources, &table);
    }

    if let Some(column) = &cli.dedupe_column {
        table
            .require_column(column)
            .with_context(|| format!("cannot deduplicate by '{column}'"))?;
        let removed = table.dedupe_by(column);
        info!(column = %column, removed, rows = table.len(), "deduplicated input");
    }

    if standardize_verified_column(&mut table) {
        info!("standardized verified account flags");
    }

    let options = EngineOptions::from(&config.engine);
    let official = OfficialAccountClassifier::new(options.channel_column.clone())
        .apply(&mut table, &sources.official, &project);

    let cleaned = strip_noise_tag_decimal(&mut table);
    if cleaned > 0 {
        info!(cells = cleaned, "stripped trailing .0 from noise tags");
    }

    let run = RuleEngine::new(options).run(&mut table, &sources.rules, &project);
    info!(
        project = %project,
        matched_rules = run.summary.entries.len(),
        skipped_rules = run.summary.skipped.len(),
        writes = run.summary.total_writes(),
        "classification complete"
    );

    if derive_followers(&mut table) {
        info!("derived followers from original and potential reach");
    }

    let output = cli.output.as_deref().unwrap_or(cli.input.as_path());
    table
        .write_json(output)
        .with_context(|| format!("failed to write output table {}", output.display()))?;
    info!(path = %output.display(), "wrote classified table");

    if let Some(path) = &cli.summary {
        let report = RunReport {
            project: &project,
            rows: table.len(),
            official_accounts: &official.matches,
            summary: &run.summary,
        };
        let file = File::create(path)
            .with_context(|| format!("failed to create summary file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        info!(path = %path.display(), "wrote execution summary");
    }

    Ok(())
}
