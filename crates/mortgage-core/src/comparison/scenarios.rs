use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{amortize, LoanSummary};
use crate::amortization::LoanConfiguration;
use crate::error::MortgageError;
use crate::lookup::RateQuote;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

const LONG_TERM_YEARS: u32 = 30;
const SHORT_TERM_YEARS: u32 = 15;

/// Which scenario costs less over the life of the loan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheaperScenario {
    A,
    B,
    Equal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_a: LoanSummary,
    pub scenario_b: LoanSummary,
    /// |A - B| of the all-in monthly payment
    pub monthly_payment_difference: Money,
    pub total_interest_difference: Money,
    pub total_cost_difference: Money,
    pub cheaper_scenario: CheaperScenario,
}

#[derive(Serialize)]
struct ScenarioPair<'a> {
    scenario_a: &'a LoanConfiguration,
    scenario_b: &'a LoanConfiguration,
}

/// Compare two arbitrary configurations.
pub fn compare_scenarios(
    a: &LoanConfiguration,
    b: &LoanConfiguration,
) -> MortgageResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let scenario_a = summarise_side("scenario_a", a, &mut warnings)?;
    let scenario_b = summarise_side("scenario_b", b, &mut warnings)?;

    let cheaper_scenario = match scenario_a.total_cost.cmp(&scenario_b.total_cost) {
        std::cmp::Ordering::Less => CheaperScenario::A,
        std::cmp::Ordering::Greater => CheaperScenario::B,
        std::cmp::Ordering::Equal => CheaperScenario::Equal,
    };

    let result = ScenarioComparison {
        monthly_payment_difference: (scenario_a.monthly_payment - scenario_b.monthly_payment).abs(),
        total_interest_difference: (scenario_a.total_interest - scenario_b.total_interest).abs(),
        total_cost_difference: (scenario_a.total_cost - scenario_b.total_cost).abs(),
        cheaper_scenario,
        scenario_a,
        scenario_b,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario Comparison (independent amortizations)",
        &ScenarioPair {
            scenario_a: a,
            scenario_b: b,
        },
        warnings,
        elapsed,
        result,
    ))
}

/// Scenario A: `config` as a 30-year loan at the quoted 30-year rate.
/// Scenario B: the same loan as a 15-year at the quoted 15-year rate.
pub fn compare_terms(
    config: &LoanConfiguration,
    quote: &RateQuote,
) -> MortgageResult<ComputationOutput<ScenarioComparison>> {
    quote.validate()?;

    let mut long = config.clone();
    long.loan_term_years = LONG_TERM_YEARS;
    long.annual_interest_rate_pct = quote.rate_30_year;

    let mut short = config.clone();
    short.loan_term_years = SHORT_TERM_YEARS;
    short.annual_interest_rate_pct = quote.rate_15_year;

    compare_scenarios(&long, &short)
}

fn summarise_side(
    label: &str,
    config: &LoanConfiguration,
    warnings: &mut Vec<String>,
) -> MortgageResult<LoanSummary> {
    let mut side_warnings = Vec::new();
    let output = amortize(config, &mut side_warnings)?;
    warnings.extend(side_warnings.into_iter().map(|w| format!("{label}: {w}")));
    output.summary.ok_or_else(|| MortgageError::InvalidInput {
        field: label.into(),
        reason: "Scenario does not describe a loan (check principal, rate and term)".into(),
    })
}
