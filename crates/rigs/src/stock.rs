use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, Table};
use rigs_spec::{Availability, Category, Component, StockLevel};
use serde::Serialize;

use crate::catalog::{CatalogArgs, OutputFormat, format_optional_price, print_json, sort_components};

#[derive(Args, Debug)]
#[command(about = "Show stock levels and best prices")]
pub struct StockArgs {
    /// Only show components that are low or out of stock
    #[arg(long)]
    pub reorder: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StockRow<'a> {
    id: &'a str,
    name: &'a str,
    category: Category,
    level: StockLevel,
    #[serde(flatten)]
    availability: Availability,
}

fn level_color(level: StockLevel) -> Color {
    match level {
        StockLevel::OutOfStock => Color::Red,
        StockLevel::Low => Color::Yellow,
        StockLevel::InStock => Color::Green,
    }
}

pub fn execute(args: StockArgs, catalog_args: &CatalogArgs) -> Result<()> {
    let catalog = catalog_args.load_catalog()?;
    let threshold = catalog_args.load_config()?.engine.low_stock_threshold;

    let mut components: Vec<&Component> = catalog.iter().collect();
    sort_components(&mut components);

    let rows: Vec<StockRow> = components
        .into_iter()
        .map(|c| {
            let availability = c.availability();
            StockRow {
                id: &c.id,
                name: &c.name,
                category: c.category,
                level: availability.level(threshold),
                availability,
            }
        })
        .filter(|row| !args.reorder || row.level != StockLevel::InStock)
        .collect();

    match catalog_args.format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("Nothing to show");
                return Ok(());
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
            table.set_header(vec!["ID", "Name", "Category", "Available", "Level", "Best price", "Batch"]);
            for row in &rows {
                table.add_row(vec![
                    Cell::new(row.id),
                    Cell::new(row.name),
                    Cell::new(row.category),
                    Cell::new(row.availability.quantity).set_alignment(CellAlignment::Right),
                    Cell::new(row.level.label()).fg(level_color(row.level)),
                    Cell::new(format_optional_price(row.availability.best_price))
                        .set_alignment(CellAlignment::Right),
                    Cell::new(row.availability.price_batch.as_deref().unwrap_or("-")),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
