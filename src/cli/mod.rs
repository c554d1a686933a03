//! Command-line interface for buildsheet.
//!
//! Provides commands for resolving exported sheets into records, probing
//! single weapon or artifact lines against the catalog, and showing the
//! resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{BlockSource, JsonBlockSource, JsonFileSink, RecordSink, SheetRangeSource};
use crate::config::{self, StrategyKind};
use crate::core::{ArtifactSetExtractor, MatchStrategy, ResolutionPipeline, WeaponResolver};
use crate::domain::{ArtifactSetChoice, ArtifactSetSelection, DiagnosticKind, WeaponType};
use crate::library::{Catalog, Roster};

/// buildsheet - Resolve character build spreadsheets into catalog identifiers
#[derive(Parser, Debug)]
#[command(name = "buildsheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an exported sheet into character records
    Resolve {
        /// Input file (value ranges or pre-segmented blocks)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(short, long, value_enum, default_value = "ranges")]
        format: InputFormat,

        /// Output file (defaults to the configured output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Abort on a malformed block instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Weapon matching strategy (defaults to the configured one)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Show how a single weapon line is matched
    Weapon {
        /// Weapon type of the owning character
        #[arg(value_enum)]
        weapon_type: WeaponTypeArg,

        /// Weapon line as written in the sheet
        text: String,
    },

    /// Show the artifact sets found in a single line
    Artifacts {
        /// Artifact line as written in the sheet
        text: String,
    },

    /// Show resolved configuration (debug)
    ShowConfig,
}

/// Input formats accepted by `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Exported spreadsheet value ranges, one per character
    Ranges,

    /// JSON array of character blocks
    Blocks,
}

/// Strategy for CLI (maps to StrategyKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Normalized similarity search
    Ranked,

    /// Fuzzy containment with an error budget
    Distance,
}

impl From<StrategyArg> for StrategyKind {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Ranked => StrategyKind::Ranked,
            StrategyArg::Distance => StrategyKind::Distance,
        }
    }
}

/// Weapon type for CLI (maps to WeaponType)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WeaponTypeArg {
    Sword,
    Claymore,
    Polearm,
    Bow,
    Catalyst,
}

impl From<WeaponTypeArg> for WeaponType {
    fn from(t: WeaponTypeArg) -> Self {
        match t {
            WeaponTypeArg::Sword => WeaponType::Sword,
            WeaponTypeArg::Claymore => WeaponType::Claymore,
            WeaponTypeArg::Polearm => WeaponType::Polearm,
            WeaponTypeArg::Bow => WeaponType::Bow,
            WeaponTypeArg::Catalyst => WeaponType::Catalyst,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Resolve {
                input,
                format,
                output,
                report,
                strict,
                strategy,
            } => resolve(&input, format, output, report, strict, strategy).await,
            Commands::Weapon { weapon_type, text } => show_weapon(weapon_type.into(), &text).await,
            Commands::Artifacts { text } => show_artifacts(&text).await,
            Commands::ShowConfig => show_config().await,
        }
    }
}

/// Resolve an input file and persist the records
async fn resolve(
    input: &Path,
    format: InputFormat,
    output: Option<PathBuf>,
    report_path: Option<PathBuf>,
    strict: bool,
    strategy: Option<StrategyArg>,
) -> Result<()> {
    let cfg = config::config()?;
    let catalog = Catalog::load(&cfg.catalog).await?;
    let roster = Roster::load(&cfg.roster).await?;

    let source: Box<dyn BlockSource> = match format {
        InputFormat::Ranges => Box::new(SheetRangeSource::new(input)),
        InputFormat::Blocks => Box::new(JsonBlockSource::new(input)),
    };
    let blocks = source
        .fetch_blocks()
        .await
        .with_context(|| format!("Source '{}' failed", source.name()))?;

    let kind = strategy.map(StrategyKind::from).unwrap_or(cfg.resolver.strategy);
    let pipeline = ResolutionPipeline::new(&catalog, &roster)
        .with_strategy(cfg.resolver.match_strategy(kind))
        .with_strict(strict || cfg.strict);

    let result = pipeline.run(&blocks)?;

    let sink = JsonFileSink::new(output.unwrap_or_else(|| cfg.output.clone()));
    sink.persist(&result.records)
        .await
        .with_context(|| format!("Sink '{}' failed", sink.name()))?;

    if let Some(path) = report_path {
        let content = serde_json::to_string_pretty(&result.report)
            .context("Failed to serialize report")?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    let report = &result.report;
    eprintln!();
    eprintln!("[Run {}]", report.run_id);
    eprintln!("  Input:            {}", report.input_digest);
    eprintln!("  Blocks:           {}", report.blocks_seen);
    eprintln!("  Records:          {}", report.records_resolved);
    eprintln!("  Skipped blocks:   {}", report.blocks_skipped());
    eprintln!(
        "  Unknown names:    {}",
        report.count(DiagnosticKind::UnknownCharacter)
    );
    eprintln!(
        "  Dropped weapons:  {}",
        report.count(DiagnosticKind::UnresolvedWeapon)
    );
    eprintln!(
        "  Dropped sets:     {}",
        report.count(DiagnosticKind::UnresolvedArtifactSet)
    );
    eprintln!("  Output:           {}", sink.path().display());

    Ok(())
}

/// Print the candidates the configured strategy considers for one weapon line
async fn show_weapon(weapon_type: WeaponType, text: &str) -> Result<()> {
    let cfg = config::config()?;
    let catalog = Catalog::load(&cfg.catalog).await?;

    let strategy = cfg.resolver.match_strategy(cfg.resolver.strategy);
    let resolver = WeaponResolver::new(&catalog, weapon_type, strategy);

    println!("Line: {:?} ({})", text, weapon_type);
    println!();
    let rows: Vec<String> = match strategy {
        MatchStrategy::Ranked { threshold } => {
            println!("Ranked candidates (threshold {}):", threshold);
            resolver
                .rank(text, threshold)
                .iter()
                .map(|hit| {
                    format!("  {:.3}  {:<32} {}", hit.score, hit.candidate.name, hit.candidate.id)
                })
                .collect()
        }
        MatchStrategy::Distance { error_budget } => {
            println!("Contained candidates (error budget {}):", error_budget);
            resolver
                .contained(text, error_budget)
                .iter()
                .map(|(candidate, distance)| {
                    format!("  {:>5}  {:<32} {}", distance, candidate.name, candidate.id)
                })
                .collect()
        }
    };
    if rows.is_empty() {
        println!("  (none)");
    }
    for row in &rows {
        println!("{}", row);
    }
    println!();
    match resolver.resolve(text) {
        Some(id) => println!("Resolved ({:?}): {}", strategy, id),
        None => println!("Resolved ({:?}): nothing", strategy),
    }

    Ok(())
}

/// Print the extraction result for one artifact line
async fn show_artifacts(text: &str) -> Result<()> {
    let cfg = config::config()?;
    let catalog = Catalog::load(&cfg.catalog).await?;

    let extractor = ArtifactSetExtractor::new(&catalog);

    println!("Line: {:?}", text);
    println!();
    let found = extractor.extract(text);
    if found.is_empty() {
        println!("No artifact sets found");
        return Ok(());
    }
    for choice in &found {
        println!("  {}", describe_choice(&catalog, choice));
    }
    println!();
    let shape = match crate::core::classify(found) {
        Some(ArtifactSetSelection::Single { .. }) => "single (4pc)",
        Some(ArtifactSetSelection::Double { .. }) => "double (2pc + 2pc)",
        Some(ArtifactSetSelection::Choose { .. }) => "choose two",
        None => "none",
    };
    println!("Selection: {}", shape);

    Ok(())
}

fn describe_choice(catalog: &Catalog, choice: &ArtifactSetChoice) -> String {
    match choice {
        ArtifactSetChoice::Set(id) => {
            let name = catalog.artifact(id).map(|a| a.name.as_str()).unwrap_or("?");
            format!("set    {} ({})", name, id)
        }
        ArtifactSetChoice::Group(id) => {
            let name = catalog.group(id).map(|g| g.name.as_str()).unwrap_or("?");
            format!("group  {} ({})", name, id)
        }
    }
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Buildsheet Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Catalog: {}", cfg.catalog.display());
    println!("  Roster:  {}", cfg.roster.display());
    println!("  Output:  {}", cfg.output.display());
    println!();
    println!("Resolver:");
    println!("  Strategy:     {:?}", cfg.resolver.strategy);
    println!("  Threshold:    {}", cfg.resolver.threshold);
    println!("  Error budget: {}", cfg.resolver.error_budget);
    println!();
    println!("Pipeline:");
    println!("  Strict: {}", cfg.strict);

    Ok(())
}
