//! Loan configuration accepted by the amortization engine.
//!
//! A configuration is a plain, immutable description of one loan. The
//! caller keeps purchase price and down payment consistent, fills in the
//! annual property tax (usually from a location lookup) and chooses the
//! program fees; the engine only reads it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How often a payment is made.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    BiWeekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly => 26,
        }
    }
}

/// When the configured extra payment is made.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtraPaymentType {
    /// Every period.
    #[default]
    Recurring,
    /// Once, in the period containing `one_time_payment_date`.
    OneTime,
    /// Once per loan year, on the first payment on/after each anniversary.
    Annual,
}

/// Loan program. Informational for the engine; program fees are composed
/// upstream (see [`super::loan_programs`]).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoanType {
    #[default]
    Conventional,
    Jumbo,
    Fha,
    Va,
}

/// How an origination fee's `value` is interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeeKind {
    /// Dollar amount.
    Fixed,
    /// Percent of the financed principal.
    Percentage,
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A single closing fee as entered by the borrower.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OriginationFee {
    pub name: String,
    pub value: Decimal,
    pub kind: FeeKind,
}

/// Purchase of a home.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseTerms {
    pub home_price: Money,
    pub down_payment: Money,
}

/// Refinance of an existing loan, optionally with cash out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefinanceTerms {
    pub current_loan_balance: Money,
    #[serde(default)]
    pub cash_out_amount: Money,
    pub estimated_home_value: Money,
}

/// Purchase or refinance, with the fields each mode needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LoanMode {
    Purchase(PurchaseTerms),
    Refinance(RefinanceTerms),
}

/// Everything the engine needs to amortize one fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanConfiguration {
    pub mode: LoanMode,
    /// Loan term in whole years
    pub loan_term_years: u32,
    /// Annual note rate (6.5 = 6.5%)
    pub annual_interest_rate_pct: Percent,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default)]
    pub extra_payment_type: ExtraPaymentType,
    /// Required when `extra_payment_type` is `OneTime`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub origination_fees: Vec<OriginationFee>,
    /// Annual PMI as percent of the original principal
    #[serde(default)]
    pub annual_pmi_pct: Percent,
    /// Annual property tax in dollars, before the homestead exemption
    #[serde(default)]
    pub annual_property_tax: Money,
    #[serde(default)]
    pub annual_homeowners_insurance: Money,
    #[serde(default)]
    pub monthly_hoa_fee: Money,
    #[serde(default)]
    pub homestead_exemption: Money,
    /// Anchor date; the first payment falls one period later
    pub start_date: NaiveDate,
    #[serde(default)]
    pub loan_type: LoanType,
}

impl LoanConfiguration {
    /// Financed amount: price less down payment, or balance plus cash out.
    pub fn principal(&self) -> Money {
        match &self.mode {
            LoanMode::Purchase(p) => p.home_price - p.down_payment,
            LoanMode::Refinance(r) => r.current_loan_balance + r.cash_out_amount,
        }
    }

    /// Value used for both the property-tax base and loan-to-value.
    pub fn appraised_value(&self) -> Money {
        match &self.mode {
            LoanMode::Purchase(p) => p.home_price,
            LoanMode::Refinance(r) => r.estimated_home_value,
        }
    }

    /// True when the configuration is too incomplete to describe a loan.
    /// This is not an error; the engine answers with an empty schedule.
    pub fn is_insufficient(&self) -> bool {
        self.principal() <= Decimal::ZERO
            || self.annual_interest_rate_pct < Decimal::ZERO
            || self.loan_term_years == 0
    }

    /// Reject values that violate the data model outright.
    pub fn validate(&self) -> MortgageResult<()> {
        match &self.mode {
            LoanMode::Purchase(p) => {
                require_non_negative("home_price", p.home_price)?;
                require_non_negative("down_payment", p.down_payment)?;
            }
            LoanMode::Refinance(r) => {
                require_non_negative("current_loan_balance", r.current_loan_balance)?;
                require_non_negative("cash_out_amount", r.cash_out_amount)?;
                require_non_negative("estimated_home_value", r.estimated_home_value)?;
            }
        }

        require_non_negative("extra_payment", self.extra_payment)?;
        require_non_negative("annual_pmi_pct", self.annual_pmi_pct)?;
        require_non_negative("annual_property_tax", self.annual_property_tax)?;
        require_non_negative("annual_homeowners_insurance", self.annual_homeowners_insurance)?;
        require_non_negative("monthly_hoa_fee", self.monthly_hoa_fee)?;
        require_non_negative("homestead_exemption", self.homestead_exemption)?;

        for fee in &self.origination_fees {
            if fee.value < Decimal::ZERO {
                return Err(MortgageError::InvalidInput {
                    field: format!("origination_fees[{}]", fee.name),
                    reason: "Fee value cannot be negative".into(),
                });
            }
        }

        if self.extra_payment_type == ExtraPaymentType::OneTime
            && self.extra_payment > Decimal::ZERO
            && self.one_time_payment_date.is_none()
        {
            return Err(MortgageError::InvalidInput {
                field: "one_time_payment_date".into(),
                reason: "A one-time extra payment needs a payment date".into(),
            });
        }

        Ok(())
    }
}

fn require_non_negative(field: &str, value: Decimal) -> MortgageResult<()> {
    if value < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: field.into(),
            reason: "Must be non-negative".into(),
        });
    }
    Ok(())
}
