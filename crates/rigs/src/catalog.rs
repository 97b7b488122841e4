//! Options shared by every subcommand: where the catalog and config live and
//! how results are printed.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rigs_recommend::RigsToml;
use rigs_spec::Component;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Component catalog (JSON array of components)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = "catalog.json",
        value_hint = clap::ValueHint::FilePath
    )]
    pub catalog: PathBuf,

    /// Engine configuration; defaults to ./rigs.toml when present
    #[arg(long, global = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl CatalogArgs {
    pub fn load_catalog(&self) -> Result<Vec<Component>> {
        let path = &self.catalog;
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = rigs_spec::parse_catalog(&json)
            .with_context(|| format!("Invalid catalog {}", path.display()))?;
        log::debug!("Loaded {} components from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn load_config(&self) -> Result<RigsToml> {
        let cwd = std::env::current_dir()?;
        RigsToml::discover(self.config.as_deref(), &cwd).context("Failed to load configuration")
    }
}

/// Resolve ids against the catalog, keeping the order they were given in.
pub fn find_components<'c>(catalog: &'c [Component], ids: &[String]) -> Result<Vec<&'c Component>> {
    ids.iter()
        .map(|id| {
            catalog
                .iter()
                .find(|c| &c.id == id)
                .with_context(|| format!("Unknown component '{id}'"))
        })
        .collect()
}

/// Category order first, then natural id order ("gpu-2" before "gpu-10").
pub fn sort_components(components: &mut [&Component]) {
    components.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| natord::compare(&a.id, &b.id))
    });
}

pub fn format_price(price: Decimal) -> String {
    format!("₱{}", price.round_dp(2))
}

pub fn format_optional_price(price: Option<Decimal>) -> String {
    price.map(format_price).unwrap_or_else(|| "-".to_string())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
