//! Fixed-rate amortization engine.
//!
//! The monthly principal-and-interest payment is the anchor figure. A
//! bi-weekly schedule pays exactly half of it every 14 days with interest
//! accrued at `annual / 26`, so the acceleration of a bi-weekly plan comes
//! from making 26 half payments a year rather than from refitting the loan.
//! Escrow items (tax, insurance, HOA) are reported in the summary but never
//! touch the balance. All math in `rust_decimal::Decimal`.

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::config::{ExtraPaymentType, LoanConfiguration, PaymentFrequency};
use super::escrow::{self, EscrowCosts, PmiTerms};
use super::fees::{self, ResolvedFee};
use super::timing;
use crate::time_value::level_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// A residual below half a cent is closed out by the current payment.
const BALANCE_EPSILON: Decimal = dec!(0.005);

/// Schedules longer than this multiple of the contractual term are cut off.
const SAFETY_TERM_MULTIPLE: u32 = 2;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One payment event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmortizationPeriod {
    /// 1-based, contiguous
    pub period: u32,
    pub date: NaiveDate,
    pub interest: Money,
    /// Scheduled principal portion (excluding extra)
    pub principal: Money,
    pub extra_payment: Money,
    pub pmi: Money,
    /// P&I plus extra plus PMI actually paid this period
    pub total_payment: Money,
    pub remaining_balance: Money,
}

/// Aggregates over a full schedule plus the no-extra-payment baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanSummary {
    /// All-in monthly figure: P&I + PMI + tax + insurance + HOA
    pub monthly_payment: Money,
    /// P&I / 2 + periodic PMI + half of the monthly escrow items
    pub bi_weekly_payment: Money,
    /// Monthly principal and interest
    pub principal_and_interest: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_extra_payments: Money,
    pub total_pmi: Money,
    pub monthly_pmi: Money,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa_fees: Money,
    pub total_taxes: Money,
    pub total_insurance: Money,
    pub total_hoa: Money,
    pub origination_fees: Vec<ResolvedFee>,
    pub total_origination_fees: Money,
    /// Principal + interest + origination fees + PMI
    pub total_cost: Money,
    /// Every cash outflow over the life of the loan, escrow included
    pub total_payments: Money,
    pub number_of_payments: u32,
    pub payoff_date: NaiveDate,
    pub original_payoff_date: NaiveDate,
    pub years_saved: u32,
    /// Months saved beyond `years_saved`
    pub months_saved: u32,
    /// Interest on the level schedule with no extra payments
    pub standard_total_interest: Money,
    pub interest_saved: Money,
    pub first_payment_principal: Money,
    pub first_payment_interest: Money,
    pub loan_to_value: Percent,
}

/// Schedule and summary; both empty when the input cannot describe a loan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmortizationOutput {
    pub schedule: Vec<AmortizationPeriod>,
    pub summary: Option<LoanSummary>,
}

impl AmortizationOutput {
    pub fn empty() -> Self {
        AmortizationOutput {
            schedule: Vec::new(),
            summary: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortize a fixed-rate mortgage and summarise its cost.
///
/// Structurally invalid input (negative amounts, a one-time payment with no
/// date) is an error. Input that simply does not describe a loan yet (zero
/// principal, negative rate, zero term) yields an empty output and a warning.
pub fn compute_schedule(
    config: &LoanConfiguration,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = amortize(config, &mut warnings)?;

    let methodology = match config.payment_frequency {
        PaymentFrequency::Monthly => "Fixed-Rate Amortization (Monthly)",
        PaymentFrequency::BiWeekly => "Fixed-Rate Amortization (Bi-Weekly, half monthly P&I)",
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, config, warnings, elapsed, output))
}

/// Engine without the metadata envelope.
pub fn amortize(
    config: &LoanConfiguration,
    warnings: &mut Vec<String>,
) -> MortgageResult<AmortizationOutput> {
    config.validate()?;

    if config.is_insufficient() {
        warnings.push(
            "Insufficient input: principal and term must be positive and the rate non-negative"
                .into(),
        );
        return Ok(AmortizationOutput::empty());
    }

    let principal = config.principal();
    let (origination_fees, total_origination_fees) =
        fees::resolve_fees(&config.origination_fees, principal);

    let number_of_months = config.loan_term_years * MONTHS_PER_YEAR;
    let monthly_rate = config.annual_interest_rate_pct / PERCENT / Decimal::from(MONTHS_PER_YEAR);
    let principal_and_interest = level_payment(principal, monthly_rate, number_of_months)?;

    let escrow = escrow::escrow_costs(config);
    let pmi = escrow::pmi_terms(principal, config.appraised_value(), config.annual_pmi_pct);

    debug!(
        "amortizing principal {principal} over {number_of_months} months: P&I {principal_and_interest}, LTV {}%",
        pmi.loan_to_value
    );

    let run = run_periods(config, principal, principal_and_interest, &pmi, warnings)?;
    let summary = summarise(
        config,
        principal,
        principal_and_interest,
        &escrow,
        &pmi,
        &run,
        origination_fees,
        total_origination_fees,
    )?;

    Ok(AmortizationOutput {
        schedule: run.schedule,
        summary: Some(summary),
    })
}

// ---------------------------------------------------------------------------
// Period iteration
// ---------------------------------------------------------------------------

struct PeriodRun {
    schedule: Vec<AmortizationPeriod>,
    total_interest: Money,
    total_pmi: Money,
    total_extra: Money,
    periodic_pmi: Money,
}

fn run_periods(
    config: &LoanConfiguration,
    principal: Money,
    principal_and_interest: Money,
    pmi: &PmiTerms,
    warnings: &mut Vec<String>,
) -> MortgageResult<PeriodRun> {
    let frequency = config.payment_frequency;
    let periods_per_year = frequency.periods_per_year();
    let periodic_rate =
        config.annual_interest_rate_pct / PERCENT / Decimal::from(periods_per_year);
    let (base_payment, periodic_pmi) = match frequency {
        PaymentFrequency::Monthly => (principal_and_interest, pmi.monthly_pmi),
        PaymentFrequency::BiWeekly => (principal_and_interest / dec!(2), pmi.monthly_pmi / dec!(2)),
    };
    let max_periods = config.loan_term_years * periods_per_year * SAFETY_TERM_MULTIPLE;

    let mut schedule = Vec::with_capacity((config.loan_term_years * periods_per_year) as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_pmi = Decimal::ZERO;
    let mut total_extra = Decimal::ZERO;
    let mut previous_date = config.start_date;
    let mut one_time_applied = false;
    let mut period: u32 = 0;

    while balance > Decimal::ZERO {
        period += 1;
        let date = timing::payment_date(config.start_date, frequency, period)?;

        let interest = balance * periodic_rate;
        let scheduled_principal = (base_payment - interest).max(Decimal::ZERO);
        let pmi_charge = pmi.charge_for(balance, periodic_pmi);

        let requested_extra = match config.extra_payment_type {
            ExtraPaymentType::Recurring => config.extra_payment,
            ExtraPaymentType::Annual => {
                if timing::is_anniversary_period(config.start_date, previous_date, date) {
                    config.extra_payment
                } else {
                    Decimal::ZERO
                }
            }
            ExtraPaymentType::OneTime => match config.one_time_payment_date {
                Some(target)
                    if !one_time_applied
                        && timing::period_contains(target, previous_date, date, period == 1) =>
                {
                    one_time_applied = true;
                    config.extra_payment
                }
                _ => Decimal::ZERO,
            },
        };
        let mut extra = requested_extra
            .min(balance - scheduled_principal)
            .max(Decimal::ZERO);

        let mut recorded_principal = scheduled_principal;
        let mut total_payment = base_payment + extra + pmi_charge;

        if balance - (scheduled_principal + extra) < BALANCE_EPSILON {
            // Final payment: retire whatever is left, no more.
            recorded_principal = scheduled_principal.min(balance);
            extra = (balance - scheduled_principal).max(Decimal::ZERO);
            total_payment = balance + interest + pmi_charge;
            balance = Decimal::ZERO;
        } else {
            balance -= scheduled_principal + extra;
        }

        total_interest += interest;
        total_pmi += pmi_charge;
        total_extra += extra;

        schedule.push(AmortizationPeriod {
            period,
            date,
            interest,
            principal: recorded_principal,
            extra_payment: extra,
            pmi: pmi_charge,
            total_payment,
            remaining_balance: balance,
        });
        previous_date = date;

        if period > max_periods {
            warn!("amortization stopped after {period} periods with {balance} outstanding");
            warnings.push(format!(
                "Schedule did not converge within {max_periods} periods; {balance} remains outstanding"
            ));
            break;
        }
    }

    if config.extra_payment_type == ExtraPaymentType::OneTime
        && config.extra_payment > Decimal::ZERO
        && !one_time_applied
    {
        warnings.push(
            "One-time extra payment date falls outside the life of the loan; it was not applied"
                .into(),
        );
    }

    Ok(PeriodRun {
        schedule,
        total_interest,
        total_pmi,
        total_extra,
        periodic_pmi,
    })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn summarise(
    config: &LoanConfiguration,
    principal: Money,
    principal_and_interest: Money,
    escrow: &EscrowCosts,
    pmi: &PmiTerms,
    run: &PeriodRun,
    origination_fees: Vec<ResolvedFee>,
    total_origination_fees: Money,
) -> MortgageResult<LoanSummary> {
    let periods_per_year = config.payment_frequency.periods_per_year();
    let number_of_payments = run.schedule.len() as u32;

    let payoff_date = run
        .schedule
        .last()
        .map(|p| p.date)
        .unwrap_or(config.start_date);
    let original_payoff_date = timing::add_years(config.start_date, config.loan_term_years)?;
    let total_months_saved = timing::whole_months_between(payoff_date, original_payoff_date);

    let number_of_months = Decimal::from(config.loan_term_years * MONTHS_PER_YEAR);
    let standard_total_interest = principal_and_interest * number_of_months - principal;

    let months_in_loan = Decimal::from(number_of_payments) * Decimal::from(MONTHS_PER_YEAR)
        / Decimal::from(periods_per_year);
    let total_taxes = escrow.monthly_taxes * months_in_loan;
    let total_insurance = escrow.monthly_insurance * months_in_loan;
    let total_hoa = escrow.monthly_hoa * months_in_loan;

    let (first_payment_principal, first_payment_interest) = run
        .schedule
        .first()
        .map(|p| (p.principal, p.interest))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    let half = dec!(2);

    Ok(LoanSummary {
        monthly_payment: principal_and_interest
            + pmi.monthly_pmi
            + escrow.monthly_taxes
            + escrow.monthly_insurance
            + escrow.monthly_hoa,
        bi_weekly_payment: principal_and_interest / half
            + run.periodic_pmi
            + escrow.monthly_taxes / half
            + escrow.monthly_insurance / half
            + escrow.monthly_hoa / half,
        principal_and_interest,
        total_principal: principal,
        total_interest: run.total_interest,
        total_extra_payments: run.total_extra,
        total_pmi: run.total_pmi,
        monthly_pmi: pmi.monthly_pmi,
        monthly_taxes: escrow.monthly_taxes,
        monthly_insurance: escrow.monthly_insurance,
        monthly_hoa_fees: escrow.monthly_hoa,
        total_taxes,
        total_insurance,
        total_hoa,
        origination_fees,
        total_origination_fees,
        total_cost: principal + run.total_interest + total_origination_fees + run.total_pmi,
        total_payments: principal
            + run.total_interest
            + run.total_pmi
            + total_taxes
            + total_insurance
            + total_hoa,
        number_of_payments,
        payoff_date,
        original_payoff_date,
        years_saved: total_months_saved / 12,
        months_saved: total_months_saved % 12,
        standard_total_interest,
        interest_saved: standard_total_interest - run.total_interest,
        first_payment_principal,
        first_payment_interest,
        loan_to_value: pmi.loan_to_value,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::config::{
        FeeKind, LoanMode, LoanType, OriginationFee, PurchaseTerms, RefinanceTerms,
    };
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// $500k home, $100k down, 30 years at 6.5%, nothing else.
    fn reference_loan() -> LoanConfiguration {
        LoanConfiguration {
            mode: LoanMode::Purchase(PurchaseTerms {
                home_price: dec!(500_000),
                down_payment: dec!(100_000),
            }),
            loan_term_years: 30,
            annual_interest_rate_pct: dec!(6.5),
            payment_frequency: PaymentFrequency::Monthly,
            extra_payment: Decimal::ZERO,
            extra_payment_type: ExtraPaymentType::Recurring,
            one_time_payment_date: None,
            origination_fees: vec![],
            annual_pmi_pct: Decimal::ZERO,
            annual_property_tax: Decimal::ZERO,
            annual_homeowners_insurance: Decimal::ZERO,
            monthly_hoa_fee: Decimal::ZERO,
            homestead_exemption: Decimal::ZERO,
            start_date: d(2025, 1, 1),
            loan_type: LoanType::Conventional,
        }
    }

    fn run(config: &LoanConfiguration) -> AmortizationOutput {
        compute_schedule(config).unwrap().result
    }

    fn summary(out: &AmortizationOutput) -> &LoanSummary {
        out.summary.as_ref().expect("expected a summary")
    }

    #[test]
    fn test_reference_loan_scenario() {
        let out = run(&reference_loan());
        let s = summary(&out);

        assert_eq!(s.total_principal, dec!(400_000));
        assert_close(s.principal_and_interest, dec!(2528.27), TOL, "P&I");
        assert_eq!(out.schedule.len(), 360);
        assert_eq!(out.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
        assert_eq!(s.payoff_date, d(2055, 1, 1));
        assert_eq!(s.original_payoff_date, d(2055, 1, 1));
        assert_eq!(s.years_saved, 0);
        assert_eq!(s.months_saved, 0);
    }

    #[test]
    fn test_first_period_split() {
        let out = run(&reference_loan());
        let first = &out.schedule[0];
        // 400,000 * 6.5% / 12
        assert_close(first.interest, dec!(2166.67), TOL, "first interest");
        assert_close(first.principal, dec!(361.61), TOL, "first principal");
        assert_eq!(first.date, d(2025, 2, 1));
        assert_eq!(first.period, 1);
        assert_eq!(summary(&out).first_payment_interest, first.interest);
    }

    #[test]
    fn test_zero_extra_total_interest_matches_closed_form() {
        let out = run(&reference_loan());
        let s = summary(&out);
        assert_close(s.total_interest, s.standard_total_interest, TOL, "total interest");
        assert_close(s.interest_saved, Decimal::ZERO, TOL, "interest saved");
    }

    #[test]
    fn test_balance_is_non_increasing_and_conserves_principal() {
        let mut cfg = reference_loan();
        cfg.extra_payment = dec!(250);
        let out = run(&cfg);

        let mut previous = dec!(400_000);
        let mut repaid = Decimal::ZERO;
        for p in &out.schedule {
            assert!(p.remaining_balance <= previous, "balance rose at period {}", p.period);
            assert!(p.interest >= Decimal::ZERO);
            assert_close(
                previous - p.principal - p.extra_payment,
                p.remaining_balance,
                dec!(0.000001),
                "balance roll-forward",
            );
            repaid += p.principal + p.extra_payment;
            previous = p.remaining_balance;
        }
        assert_eq!(previous, Decimal::ZERO);
        assert_close(repaid, dec!(400_000), dec!(0.000001), "principal repaid");
    }

    #[test]
    fn test_recurring_extra_shortens_loan() {
        let mut cfg = reference_loan();
        cfg.extra_payment = dec!(500);
        let out = run(&cfg);
        let s = summary(&out);

        assert!(out.schedule.len() < 360);
        assert!(s.interest_saved > Decimal::ZERO);
        assert!(s.years_saved > 0);
        assert!(s.total_extra_payments > Decimal::ZERO);
        assert_eq!(out.schedule[0].extra_payment, dec!(500));
        assert_close(
            out.schedule[0].total_payment,
            s.principal_and_interest + dec!(500),
            dec!(0.000001),
            "payment with extra",
        );
    }

    #[test]
    fn test_bi_weekly_accelerates_payoff() {
        let monthly = run(&reference_loan());
        let mut cfg = reference_loan();
        cfg.payment_frequency = PaymentFrequency::BiWeekly;
        let bi_weekly = run(&cfg);

        let monthly_years = Decimal::from(monthly.schedule.len() as u32) / dec!(12);
        let bi_weekly_years = Decimal::from(bi_weekly.schedule.len() as u32) / dec!(26);
        assert!(bi_weekly_years < monthly_years);

        let s = summary(&bi_weekly);
        assert!(s.interest_saved > Decimal::ZERO);
        assert!(s.total_interest < summary(&monthly).total_interest);
        assert!(s.years_saved >= 4, "expected several years saved, got {}", s.years_saved);
        assert_eq!(bi_weekly.schedule[0].date, d(2025, 1, 15));
        assert_close(
            bi_weekly.schedule[0].total_payment,
            s.principal_and_interest / dec!(2),
            dec!(0.000001),
            "half P&I",
        );
    }

    #[test]
    fn test_one_time_extra_applied_once() {
        let mut cfg = reference_loan();
        cfg.extra_payment_type = ExtraPaymentType::OneTime;
        cfg.extra_payment = dec!(20_000);
        cfg.one_time_payment_date = Some(d(2026, 6, 15));
        let compute = compute_schedule(&cfg).unwrap();
        let out = compute.result;

        let hits: Vec<&AmortizationPeriod> = out
            .schedule
            .iter()
            .filter(|p| p.extra_payment > Decimal::ZERO && p.remaining_balance > Decimal::ZERO)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date, d(2026, 7, 1));
        assert_eq!(hits[0].extra_payment, dec!(20_000));
        assert!(compute.warnings.is_empty());
    }

    #[test]
    fn test_one_time_extra_outside_loan_warns() {
        let mut cfg = reference_loan();
        cfg.extra_payment_type = ExtraPaymentType::OneTime;
        cfg.extra_payment = dec!(20_000);
        cfg.one_time_payment_date = Some(d(2070, 1, 1));
        let compute = compute_schedule(&cfg).unwrap();
        assert_eq!(compute.result.schedule.len(), 360);
        assert_eq!(compute.warnings.len(), 1);
    }

    #[test]
    fn test_annual_extra_on_each_anniversary() {
        let mut cfg = reference_loan();
        cfg.extra_payment_type = ExtraPaymentType::Annual;
        cfg.extra_payment = dec!(5_000);
        let out = run(&cfg);

        let periods: Vec<u32> = out
            .schedule
            .iter()
            .filter(|p| p.extra_payment == dec!(5_000))
            .map(|p| p.period)
            .take(3)
            .collect();
        assert_eq!(periods, vec![12, 24, 36]);
        assert!(out.schedule.len() < 360);
    }

    #[test]
    fn test_extra_never_exceeds_balance() {
        let mut cfg = reference_loan();
        cfg.extra_payment = dec!(1_000_000);
        let out = run(&cfg);
        assert_eq!(out.schedule.len(), 1);
        let only = &out.schedule[0];
        assert_eq!(only.remaining_balance, Decimal::ZERO);
        assert_close(only.principal + only.extra_payment, dec!(400_000), dec!(0.000001), "payoff");
        assert_close(
            only.total_payment,
            dec!(400_000) + only.interest,
            dec!(0.000001),
            "final payment",
        );
    }

    #[test]
    fn test_pmi_stops_at_80_percent_of_value() {
        let mut cfg = reference_loan();
        cfg.mode = LoanMode::Purchase(PurchaseTerms {
            home_price: dec!(300_000),
            down_payment: dec!(15_000),
        });
        cfg.annual_pmi_pct = dec!(0.5);
        let out = run(&cfg);
        let s = summary(&out);
        assert_eq!(s.monthly_pmi, dec!(118.75));

        let threshold = dec!(240_000);
        let mut opening = dec!(285_000);
        let mut stopped = false;
        for p in &out.schedule {
            if opening > threshold {
                assert!(!stopped);
                assert_eq!(p.pmi, dec!(118.75), "period {}", p.period);
            } else {
                stopped = true;
                assert_eq!(p.pmi, Decimal::ZERO, "period {}", p.period);
            }
            opening = p.remaining_balance;
        }
        assert!(stopped);
        assert!(s.total_pmi > Decimal::ZERO);
        assert_close(
            s.total_cost,
            s.total_principal + s.total_interest + s.total_pmi,
            dec!(0.000001),
            "total cost includes PMI",
        );
    }

    #[test]
    fn test_pmi_absent_at_or_below_80_ltv() {
        let mut cfg = reference_loan();
        cfg.annual_pmi_pct = dec!(0.5);
        let out = run(&cfg);
        assert!(out.schedule.iter().all(|p| p.pmi.is_zero()));
        assert_eq!(summary(&out).total_pmi, Decimal::ZERO);
    }

    #[test]
    fn test_empty_when_down_payment_covers_price() {
        let mut cfg = reference_loan();
        cfg.mode = LoanMode::Purchase(PurchaseTerms {
            home_price: dec!(500_000),
            down_payment: dec!(500_000),
        });
        let compute = compute_schedule(&cfg).unwrap();
        assert!(compute.result.schedule.is_empty());
        assert!(compute.result.summary.is_none());
        assert!(compute.result.is_empty());
        assert_eq!(compute.warnings.len(), 1);
    }

    #[test]
    fn test_empty_for_zero_term_and_negative_rate() {
        let mut cfg = reference_loan();
        cfg.loan_term_years = 0;
        assert!(run(&cfg).is_empty());

        let mut cfg = reference_loan();
        cfg.annual_interest_rate_pct = dec!(-1);
        assert!(run(&cfg).is_empty());
    }

    #[test]
    fn test_zero_rate_loan() {
        let mut cfg = reference_loan();
        cfg.annual_interest_rate_pct = Decimal::ZERO;
        cfg.loan_term_years = 10;
        let out = run(&cfg);
        let s = summary(&out);
        assert_eq!(out.schedule.len(), 120);
        assert_eq!(s.total_interest, Decimal::ZERO);
        assert_close(s.principal_and_interest, dec!(3333.33), TOL, "P&I");
    }

    #[test]
    fn test_escrow_totals_and_payment_figures() {
        let mut cfg = reference_loan();
        cfg.annual_property_tax = dec!(6_000);
        cfg.annual_homeowners_insurance = dec!(1_500);
        cfg.monthly_hoa_fee = dec!(50);
        let out = run(&cfg);
        let s = summary(&out);

        assert_eq!(s.monthly_taxes, dec!(500));
        assert_eq!(s.monthly_insurance, dec!(125));
        assert_close(s.monthly_payment, s.principal_and_interest + dec!(675), dec!(0.000001), "monthly");
        assert_close(
            s.bi_weekly_payment,
            s.principal_and_interest / dec!(2) + dec!(337.5),
            dec!(0.000001),
            "bi-weekly",
        );
        // 360 months of escrow
        assert_eq!(s.total_taxes, dec!(180_000));
        assert_eq!(s.total_insurance, dec!(45_000));
        assert_eq!(s.total_hoa, dec!(18_000));
        assert_close(
            s.total_payments,
            dec!(400_000) + s.total_interest + dec!(243_000),
            dec!(0.000001),
            "total payments",
        );
        // Escrow is excluded from total cost
        assert_close(
            s.total_cost,
            dec!(400_000) + s.total_interest,
            dec!(0.000001),
            "total cost",
        );
    }

    #[test]
    fn test_fees_flow_into_total_cost() {
        let mut cfg = reference_loan();
        cfg.origination_fees = vec![
            OriginationFee {
                name: "Origination".into(),
                value: dec!(1),
                kind: FeeKind::Percentage,
            },
            OriginationFee {
                name: "Appraisal".into(),
                value: dec!(650),
                kind: FeeKind::Fixed,
            },
        ];
        let out = run(&cfg);
        let s = summary(&out);
        assert_eq!(s.total_origination_fees, dec!(4650));
        assert_eq!(s.origination_fees[0].amount, dec!(4000));
        assert_close(
            s.total_cost,
            dec!(400_000) + s.total_interest + dec!(4650),
            dec!(0.000001),
            "total cost",
        );
    }

    #[test]
    fn test_refinance_with_cash_out() {
        let mut cfg = reference_loan();
        cfg.mode = LoanMode::Refinance(RefinanceTerms {
            current_loan_balance: dec!(250_000),
            cash_out_amount: dec!(50_000),
            estimated_home_value: dec!(400_000),
        });
        let out = run(&cfg);
        let s = summary(&out);
        assert_eq!(s.total_principal, dec!(300_000));
        assert_eq!(s.loan_to_value, dec!(75));
        assert_eq!(out.schedule.len(), 360);
    }

    #[test]
    fn test_negative_input_is_an_error() {
        let mut cfg = reference_loan();
        cfg.monthly_hoa_fee = dec!(-1);
        assert!(compute_schedule(&cfg).is_err());
    }

    #[test]
    fn test_metadata_envelope() {
        let compute = compute_schedule(&reference_loan()).unwrap();
        assert_eq!(compute.methodology, "Fixed-Rate Amortization (Monthly)");
        assert_eq!(compute.metadata.precision, "rust_decimal_128bit");
        assert!(compute.warnings.is_empty());
    }

    #[test]
    fn test_high_rate_loan_hits_safety_cap_without_panicking() {
        let mut cfg = reference_loan();
        cfg.annual_interest_rate_pct = dec!(200);
        let compute = compute_schedule(&cfg).unwrap();

        // Payment collapses to interest only, so nothing is ever repaid
        let s = summary(&compute.result);
        assert_eq!(s.principal_and_interest, dec!(400_000) * (dec!(200) / dec!(100) / dec!(12)));
        assert_eq!(compute.result.schedule.len(), 30 * 12 * 2 + 1);
        assert_eq!(compute.warnings.len(), 1);
    }

    #[test]
    fn test_safety_cap_stops_non_converging_schedule() {
        let mut cfg = reference_loan();
        cfg.annual_interest_rate_pct = dec!(1000);
        let compute = compute_schedule(&cfg).unwrap();
        let out = &compute.result;
        let s = summary(out);

        assert_eq!(out.schedule.len(), 30 * 12 * 2 + 1);
        let last = out.schedule.last().unwrap();
        assert!(last.remaining_balance > Decimal::ZERO);
        assert!(s.payoff_date > s.original_payoff_date);
        assert_eq!(s.years_saved, 0);
        assert_eq!(s.months_saved, 0);
        assert_eq!(compute.warnings.len(), 1);
        assert!(compute.warnings[0].contains("did not converge"));
    }
}
