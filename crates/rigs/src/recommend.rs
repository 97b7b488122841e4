use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use rigs_recommend::{CandidateBuild, ExpansionStrategy, Preferences, Recommender, RecommenderState};
use rigs_spec::Category;
use rust_decimal::Decimal;

use crate::catalog::{CatalogArgs, OutputFormat, format_price, print_json};

#[derive(Args, Debug)]
#[command(about = "Recommend compatible builds for a budget")]
pub struct RecommendArgs {
    /// Template to fill (see `rigs templates`)
    #[arg(short, long)]
    pub template: String,

    /// Budget; defaults to the template's target price
    #[arg(short, long)]
    pub budget: Option<Decimal>,

    /// Number of builds to show
    #[arg(short = 'n', long, default_value_t = 1)]
    pub top: usize,

    /// Ranking weight for a category, e.g. GPU=2 (repeatable)
    #[arg(short, long, value_name = "CATEGORY=WEIGHT", value_parser = parse_preference)]
    pub prefer: Vec<(Category, f64)>,

    /// How partial combinations are kept once the combination limit is hit
    #[arg(short, long, value_name = "first-n|top-k")]
    pub strategy: Option<ExpansionStrategy>,
}

fn parse_preference(s: &str) -> Result<(Category, f64), String> {
    let (category, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=WEIGHT, got '{s}'"))?;
    let category: Category = category.trim().parse().map_err(|e| format!("{e}"))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight must be a non-negative number, got {weight}"));
    }
    Ok((category, weight))
}

pub fn execute(args: RecommendArgs, catalog_args: &CatalogArgs) -> Result<()> {
    let catalog = catalog_args.load_catalog()?;
    let mut config = catalog_args.load_config()?;
    if let Some(strategy) = args.strategy {
        config.engine.expansion = strategy;
    }

    let template = config.template(&args.template)?;
    let budget = args.budget.unwrap_or(template.target_price);
    let preferences: Preferences = args.prefer.into_iter().collect();
    let state = RecommenderState::with_history_capacity(config.engine.history_capacity);

    let recommender = Recommender::new(&catalog, config.engine.clone());
    let builds = recommender.recommend_builds(&state, &template, budget, &preferences, args.top.max(1))?;
    if builds.is_empty() {
        anyhow::bail!(
            "No compatible build fits template '{}' at budget {}",
            template.name,
            format_price(budget)
        );
    }

    match catalog_args.format {
        OutputFormat::Json => print_json(&builds)?,
        OutputFormat::Table => {
            for (rank, build) in builds.iter().enumerate() {
                if rank > 0 {
                    println!();
                }
                print_build(rank + 1, build, budget);
            }
        }
    }
    Ok(())
}

fn print_build(rank: usize, build: &CandidateBuild<'_>, budget: Decimal) {
    println!(
        "{} {} {} of {}",
        format!("#{rank}").bold(),
        build.template.cyan(),
        format_price(build.total_price).bold(),
        format_price(budget)
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table.set_header(vec!["Category", "ID", "Component", "Price", "Score"]);
    for (category, part) in &build.parts {
        table.add_row(vec![
            Cell::new(category),
            Cell::new(part.id),
            Cell::new(part.name),
            Cell::new(format_price(part.price)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", part.score)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");

    println!(
        "Objective {:.1}  Performance {:.1}  Balance {:.1}",
        build.objective, build.performance_score, build.balance
    );
    println!(
        "Gaming {:.1}  Workstation {:.1}  Efficiency {:.1}",
        build.profile.gaming, build.profile.workstation, build.profile.efficiency
    );
    println!("{} {}", "✓".green(), build.compatibility.reason.dimmed());
}
