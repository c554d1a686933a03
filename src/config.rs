//! Configuration for buildsheet.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (BUILDSHEET_HOME, BUILDSHEET_CATALOG, BUILDSHEET_ROSTER)
//! 2. Config file (.buildsheet/config.yaml)
//! 3. Defaults (~/.buildsheet)
//!
//! Config file discovery:
//! - Searches current directory and parents for .buildsheet/config.yaml
//! - Paths in config file are relative to the project root (parent of .buildsheet/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{MatchStrategy, DEFAULT_ERROR_BUDGET, DEFAULT_RANKED_THRESHOLD};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".buildsheet";
const DEFAULT_OUTPUT: &str = "data.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Candidate catalog file (relative to project root)
    pub catalog: Option<String>,
    /// Character roster file (relative to project root)
    pub roster: Option<String>,
    /// Default output file (relative to project root)
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    pub strategy: Option<StrategyKind>,
    pub threshold: Option<f64>,
    pub error_budget: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub strict: Option<bool>,
}

/// Weapon matching strategy names as written in config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Ranked,
    Distance,
}

/// Resolver settings after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    pub strategy: StrategyKind,
    pub threshold: f64,
    pub error_budget: i64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Ranked,
            threshold: DEFAULT_RANKED_THRESHOLD,
            error_budget: DEFAULT_ERROR_BUDGET,
        }
    }
}

impl ResolverSettings {
    /// Matching strategy for `kind`, using the configured parameters
    pub fn match_strategy(&self, kind: StrategyKind) -> MatchStrategy {
        match kind {
            StrategyKind::Ranked => MatchStrategy::Ranked {
                threshold: self.threshold,
            },
            StrategyKind::Distance => MatchStrategy::Distance {
                error_budget: self.error_budget,
            },
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Buildsheet home directory
    pub home: PathBuf,
    /// Candidate catalog file
    pub catalog: PathBuf,
    /// Character roster file
    pub roster: PathBuf,
    /// Default output file
    pub output: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Resolver settings
    pub resolver: ResolverSettings,
    /// Abort on malformed blocks
    pub strict: bool,
}

/// Environment overrides, read once per load
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<PathBuf>,
    catalog: Option<PathBuf>,
    roster: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().map(PathBuf::from);
        Self {
            home: var("BUILDSHEET_HOME"),
            catalog: var("BUILDSHEET_CATALOG"),
            roster: var("BUILDSHEET_ROSTER"),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge file settings, environment and defaults
fn resolve_config(
    config_file: Option<PathBuf>,
    file: Option<ConfigFile>,
    env: EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let home = env.home.unwrap_or(default_home);

    let (catalog, roster, output, resolver, strict) = match file {
        Some(config) => {
            // Base directory is the parent of .buildsheet/ (i.e., grandparent of config.yaml)
            let base_dir = config_file
                .as_deref()
                .and_then(Path::parent) // .buildsheet/
                .and_then(Path::parent) // project root
                .unwrap_or(Path::new("."));

            let catalog = env.catalog.unwrap_or_else(|| match config.paths.catalog {
                Some(ref path) => resolve_path(base_dir, path),
                None => home.join("catalog.json"),
            });
            let roster = env.roster.unwrap_or_else(|| match config.paths.roster {
                Some(ref path) => resolve_path(base_dir, path),
                None => home.join("roster.json"),
            });
            let output = match config.paths.output {
                Some(ref path) => resolve_path(base_dir, path),
                None => PathBuf::from(DEFAULT_OUTPUT),
            };

            let defaults = ResolverSettings::default();
            let resolver = match config.resolver {
                Some(r) => ResolverSettings {
                    strategy: r.strategy.unwrap_or(defaults.strategy),
                    threshold: r.threshold.unwrap_or(defaults.threshold),
                    error_budget: r.error_budget.unwrap_or(defaults.error_budget),
                },
                None => defaults,
            };

            let strict = config
                .pipeline
                .as_ref()
                .and_then(|p| p.strict)
                .unwrap_or(false);

            (catalog, roster, output, resolver, strict)
        }
        None => {
            // No config file - use env vars or defaults
            let catalog = env.catalog.unwrap_or_else(|| home.join("catalog.json"));
            let roster = env.roster.unwrap_or_else(|| home.join("roster.json"));
            (
                catalog,
                roster,
                PathBuf::from(DEFAULT_OUTPUT),
                ResolverSettings::default(),
                false,
            )
        }
    };

    if !(0.0..=1.0).contains(&resolver.threshold) {
        anyhow::bail!(
            "resolver.threshold must be between 0 and 1, got {}",
            resolver.threshold
        );
    }
    if resolver.error_budget < 0 {
        anyhow::bail!(
            "resolver.error_budget must not be negative, got {}",
            resolver.error_budget
        );
    }

    Ok(ResolvedConfig {
        home,
        catalog,
        roster,
        output,
        config_file,
        resolver,
        strict,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config_file = find_config_file();
    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    resolve_config(config_file, file, EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
