use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod catalog;
mod check;
mod recommend;
mod score;
mod stock;
mod templates;

#[derive(Parser)]
#[command(name = "rigs")]
#[command(about = "PC build compatibility checks and budget build recommendations", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(flatten)]
    catalog: catalog::CatalogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether components work together
    #[command(alias = "c")]
    Check(check::CheckArgs),

    /// Score components with their stock and best price
    Score(score::ScoreArgs),

    /// Show stock levels per component
    Stock(stock::StockArgs),

    /// Recommend compatible builds for a budget
    #[command(alias = "r")]
    Recommend(recommend::RecommendArgs),

    /// List build templates
    Templates,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --debug
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Check(args) => check::execute(args, &cli.catalog),
        Commands::Score(args) => score::execute(args, &cli.catalog),
        Commands::Stock(args) => stock::execute(args, &cli.catalog),
        Commands::Recommend(args) => recommend::execute(args, &cli.catalog),
        Commands::Templates => templates::execute(&cli.catalog),
    }
}
