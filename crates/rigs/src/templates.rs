use anyhow::Result;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use itertools::Itertools;
use rigs_recommend::BuildTemplate;
use rust_decimal::Decimal;

use crate::catalog::{CatalogArgs, OutputFormat, format_price, print_json};

fn describe_categories(template: &BuildTemplate) -> String {
    template
        .categories
        .iter()
        .map(|t| {
            let percent = (t.budget_share * Decimal::ONE_HUNDRED).normalize();
            if t.min_score > 0.0 {
                format!("{} {percent}% (min {})", t.category, t.min_score)
            } else {
                format!("{} {percent}%", t.category)
            }
        })
        .join(", ")
}

pub fn execute(catalog_args: &CatalogArgs) -> Result<()> {
    let templates = catalog_args.load_config()?.templates();

    match catalog_args.format {
        OutputFormat::Json => print_json(&templates)?,
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
            table.set_header(vec!["Template", "Target price", "Budget split"]);
            for template in &templates {
                table.add_row(vec![
                    Cell::new(&template.name),
                    Cell::new(format_price(template.target_price)).set_alignment(CellAlignment::Right),
                    Cell::new(describe_categories(template)),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
