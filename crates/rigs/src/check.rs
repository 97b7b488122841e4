use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rigs_spec::CompatibilityVerdict;
use rigs_spec::compat::total_power_draw;
use serde::Serialize;

use crate::catalog::{CatalogArgs, OutputFormat, find_components, print_json};

#[derive(Args, Debug)]
#[command(about = "Check whether a set of components works together")]
pub struct CheckArgs {
    /// Component ids to check as one build
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    components: Vec<&'a str>,
    total_power_draw: f64,
    #[serde(flatten)]
    verdict: &'a CompatibilityVerdict,
}

pub fn execute(args: CheckArgs, catalog_args: &CatalogArgs) -> Result<()> {
    let catalog = catalog_args.load_catalog()?;
    let config = catalog_args.load_config()?;
    let components = find_components(&catalog, &args.ids)?;

    let verdict = config.engine.rules().check(&components);
    let draw = total_power_draw(&components);

    match catalog_args.format {
        OutputFormat::Json => print_json(&CheckReport {
            components: components.iter().map(|c| c.id.as_str()).collect(),
            total_power_draw: draw,
            verdict: &verdict,
        })?,
        OutputFormat::Table => {
            for component in &components {
                println!(
                    "  {:<12} {} {}",
                    component.category.to_string().cyan(),
                    component.id.bold(),
                    component.name.dimmed()
                );
            }
            if draw > 0.0 {
                println!("  {:<12} {draw:.0}W", "Draw".cyan());
            }
            println!();

            let mut lines = verdict.reason.lines();
            let headline = lines.next().unwrap_or_default();
            if verdict.compatible {
                println!("{} {headline}", "✓".green());
            } else {
                println!("{} {headline}", "✗".red());
            }
            for line in lines {
                println!("  {line}");
            }
        }
    }

    if !verdict.compatible {
        anyhow::bail!("Components are not compatible");
    }
    Ok(())
}
