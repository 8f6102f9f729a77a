use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::amortization::LoanConfiguration;
use mortgage_core::comparison;
use mortgage_core::lookup::RateQuote;

use crate::input;

/// Arguments for a scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Loan configuration for scenario A (JSON or YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Loan configuration for scenario B; when given, A and B are compared as-is
    #[arg(long)]
    pub scenario_b: Option<String>,

    /// Quoted 30-year fixed rate in percent (30 vs 15 year comparison)
    #[arg(long = "rate-30")]
    pub rate_30_year: Option<Decimal>,

    /// Quoted 15-year fixed rate in percent
    #[arg(long = "rate-15")]
    pub rate_15_year: Option<Decimal>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_a: LoanConfiguration = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for comparison")?;

    let output = if let Some(ref path) = args.scenario_b {
        let scenario_b: LoanConfiguration = input::file::read_document(path)?;
        comparison::compare_scenarios(&scenario_a, &scenario_b)?
    } else {
        let quote = RateQuote {
            rate_30_year: args
                .rate_30_year
                .ok_or("--rate-30 is required (or provide --scenario-b)")?,
            rate_15_year: args
                .rate_15_year
                .ok_or("--rate-15 is required (or provide --scenario-b)")?,
        };
        comparison::compare_terms(&scenario_a, &quote)?
    };
    Ok(serde_json::to_value(output)?)
}
