use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use rigs_spec::{Category, Component, score_component};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{CatalogArgs, OutputFormat, format_optional_price, print_json, sort_components};

#[derive(Args, Debug)]
#[command(about = "Score components and show their stock and best price")]
pub struct ScoreArgs {
    /// Only show this category
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Include components that cannot be sold right now
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRow<'a> {
    id: &'a str,
    name: &'a str,
    category: Category,
    score: f64,
    quantity: u32,
    best_price: Option<Decimal>,
}

pub fn execute(args: ScoreArgs, catalog_args: &CatalogArgs) -> Result<()> {
    let catalog = catalog_args.load_catalog()?;

    let mut components: Vec<&Component> = catalog
        .iter()
        .filter(|c| args.category.is_none_or(|category| c.category == category))
        .filter(|c| args.all || c.is_eligible())
        .collect();
    sort_components(&mut components);

    let rows: Vec<ScoreRow> = components
        .iter()
        .map(|c| {
            let availability = c.availability();
            ScoreRow {
                id: &c.id,
                name: &c.name,
                category: c.category,
                score: score_component(c),
                quantity: availability.quantity,
                best_price: availability.best_price,
            }
        })
        .collect();

    match catalog_args.format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No components to score");
                return Ok(());
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
            table.set_header(vec!["ID", "Name", "Category", "Score", "Stock", "Best price"]);
            for row in &rows {
                table.add_row(vec![
                    Cell::new(row.id),
                    Cell::new(row.name),
                    Cell::new(row.category),
                    Cell::new(format!("{:.1}", row.score)).set_alignment(CellAlignment::Right),
                    Cell::new(row.quantity).set_alignment(CellAlignment::Right),
                    Cell::new(format_optional_price(row.best_price)).set_alignment(CellAlignment::Right),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
