use crate::inventory::StockPolicy;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];
const DEFAULT_DELIMITED_EXTENSIONS: &[&str] = &["csv"];

/// Resolved application configuration: CLI/env arguments layered over an
/// optional YAML or JSON config file, with defaults underneath.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stock_policy: StockPolicy,
    pub spreadsheet_extensions: Vec<String>,
    pub delimited_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stock_policy: StockPolicy::default(),
            spreadsheet_extensions: normalize_extensions(
                DEFAULT_SPREADSHEET_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect(),
            ),
            delimited_extensions: normalize_extensions(
                DEFAULT_DELIMITED_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect(),
            ),
        }
    }
}

impl AppConfig {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let file_config = if let Some(path) = args.config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let stock_policy = args
            .stock_policy
            .or(file_config.stock_policy)
            .unwrap_or_default();

        let spreadsheet_extensions = normalize_extensions(
            args.spreadsheet_extensions
                .clone()
                .or(file_config.spreadsheet_extensions)
                .unwrap_or_else(|| {
                    DEFAULT_SPREADSHEET_EXTENSIONS
                        .iter()
                        .map(|ext| (*ext).to_string())
                        .collect()
                }),
        );
        let delimited_extensions = normalize_extensions(
            args.delimited_extensions
                .clone()
                .or(file_config.delimited_extensions)
                .unwrap_or_else(|| {
                    DEFAULT_DELIMITED_EXTENSIONS
                        .iter()
                        .map(|ext| (*ext).to_string())
                        .collect()
                }),
        );

        anyhow::ensure!(
            !spreadsheet_extensions.is_empty(),
            "at least one spreadsheet extension must be provided"
        );
        anyhow::ensure!(
            !delimited_extensions.is_empty(),
            "at least one delimited-text extension must be provided"
        );

        Ok(Self {
            stock_policy,
            spreadsheet_extensions,
            delimited_extensions,
        })
    }
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    let mut extensions = extensions
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect::<Vec<_>>();
    extensions.sort();
    extensions.dedup();
    extensions
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "order-analytics", about = "Order ingestion and sales analytics", version)]
pub struct CliArgs {
    /// Files to ingest, routed by extension.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "ORDER_ANALYTICS_STOCK_POLICY",
        value_enum,
        value_name = "POLICY",
        help = "Which order statuses carry a standing stock deduction"
    )]
    pub stock_policy: Option<StockPolicy>,

    #[arg(
        long,
        env = "ORDER_ANALYTICS_SPREADSHEET_EXTENSIONS",
        value_name = "EXT",
        value_delimiter = ',',
        help = "Comma-separated extensions treated as spreadsheet uploads"
    )]
    pub spreadsheet_extensions: Option<Vec<String>>,

    #[arg(
        long,
        env = "ORDER_ANALYTICS_DELIMITED_EXTENSIONS",
        value_name = "EXT",
        value_delimiter = ',',
        help = "Comma-separated extensions treated as delimited-text uploads"
    )]
    pub delimited_extensions: Option<Vec<String>>,

    #[arg(long, help = "Print the statistics report after ingesting")]
    pub stats: bool,

    #[arg(long, help = "Print the dashboard (statistics plus recent orders)")]
    pub dashboard: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    stock_policy: Option<StockPolicy>,
    spreadsheet_extensions: Option<Vec<String>>,
    delimited_extensions: Option<Vec<String>>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
