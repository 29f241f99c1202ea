mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{AmortizeArgs, StrategiesArgs};
use commands::closing_costs::ClosingCostsArgs;
use commands::mortgage::{DtiArgs, MonthlyCostArgs, MortgageArgs, PrequalifyArgs};
use commands::refinance::RefinanceArgs;

/// Mortgage readiness calculations
#[derive(Parser)]
#[command(
    name = "firstkey",
    version,
    about = "Mortgage readiness calculations",
    long_about = "A CLI for home-buyer mortgage calculations with decimal precision. \
                  Supports monthly payment breakdowns, amortization schedules, \
                  biweekly comparisons, DTI, pre-qualification, refinance \
                  break-even and cash-to-close estimates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML or JSON file overriding the built-in calculator defaults
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full calculator view: monthly cost, schedule, DTI and pre-qualification
    Mortgage(MortgageArgs),
    /// Monthly payment breakdown (P&I, taxes, insurance, PMI, HOA)
    MonthlyCost(MonthlyCostArgs),
    /// Amortization schedule with optional extra principal
    Amortize(AmortizeArgs),
    /// Compare monthly and biweekly payment strategies
    Strategies(StrategiesArgs),
    /// Front-end and back-end debt-to-income ratios
    Dti(DtiArgs),
    /// Estimate the maximum home price an income supports
    Prequalify(PrequalifyArgs),
    /// Compare the current loan with a refinance
    Refinance(RefinanceArgs),
    /// Estimate closing costs and total cash to close
    ClosingCosts(ClosingCostsArgs),
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

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("firstkey=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("firstkey=warn"))
    };

    // stdout carries the JSON/CSV result
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let defaults = match config::load_defaults(cli.config.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &defaults),
        Commands::MonthlyCost(args) => commands::mortgage::run_monthly_cost(args, &defaults),
        Commands::Amortize(args) => commands::amortization::run_amortize(args, &defaults),
        Commands::Strategies(args) => commands::amortization::run_strategies(args, &defaults),
        Commands::Dti(args) => commands::mortgage::run_dti(args, &defaults),
        Commands::Prequalify(args) => commands::mortgage::run_prequalify(args, &defaults),
        Commands::Refinance(args) => commands::refinance::run_refinance(args, &defaults),
        Commands::ClosingCosts(args) => {
            commands::closing_costs::run_closing_costs(args, &defaults)
        }
        Commands::Version => {
            println!("firstkey {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
