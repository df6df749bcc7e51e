mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::geo::GeoArgs;
use commands::investment::AnalyzeArgs;
use commands::market::MarketArgs;
use commands::report::ReportArgs;
use commands::scenarios::ScenariosArgs;
use commands::valuation::{RentArgs, ValueArgs};

/// Residential property valuation and investment analysis
#[derive(Parser)]
#[command(
    name = "propval",
    version,
    about = "Residential property valuation and investment analysis",
    long_about = "Estimate the market value and rent of a residential property, project \
                  a leveraged purchase year by year, stress it under conservative and \
                  optimistic scenarios, and score the result. All arithmetic is decimal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter for stderr diagnostics (e.g. "debug"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate market value with a low/high band and five-year forecast
    Value(ValueArgs),
    /// Rule-based monthly rent estimate
    Rent(RentArgs),
    /// Base-case cash flow, returns and year-by-year projection
    Analyze(AnalyzeArgs),
    /// Conservative / moderate / optimistic scenario comparison
    Scenarios(ScenariosArgs),
    /// Full report: valuation, scenarios, scores and commentary
    Report(ReportArgs),
    /// Area outlook from market statistics and listings
    Market(MarketArgs),
    /// Show the location profile a location code resolves to
    Geo(GeoArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.log_level.as_deref()) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Value(args) => commands::valuation::run_value(args),
        Commands::Rent(args) => commands::valuation::run_rent(args),
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Market(args) => commands::market::run_market(args),
        Commands::Geo(args) => commands::geo::run_geo(args),
        Commands::Version => {
            println!("propval {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
