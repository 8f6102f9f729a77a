mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::property_tax::PropertyTaxArgs;
use commands::schedule::ScheduleArgs;

/// Fixed-rate mortgage amortization
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Fixed-rate mortgage amortization schedules",
    long_about = "A CLI for building fixed-rate mortgage amortization schedules with \
                  decimal precision. Supports purchase and refinance loans, monthly and \
                  bi-weekly payments, extra principal, PMI, escrow and loan programs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an amortization schedule and loan summary
    Schedule(ScheduleArgs),
    /// Compare two loans, or the 30- and 15-year terms of one loan
    Compare(CompareArgs),
    /// Annual property tax from a price and tax rate
    PropertyTax(PropertyTaxArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::PropertyTax(args) => commands::property_tax::run_property_tax(args),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
