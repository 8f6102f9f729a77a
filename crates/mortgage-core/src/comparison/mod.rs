//! Side-by-side scenario comparison (e.g. 30-year vs 15-year).

pub mod scenarios;

pub use scenarios::{compare_scenarios, compare_terms, CheaperScenario, ScenarioComparison};
