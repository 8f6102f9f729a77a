use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::config::LoanConfiguration;
use crate::types::{Money, Percent, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// PMI is required above this loan-to-value (percent).
const PMI_LTV_THRESHOLD: Percent = dec!(80);

/// PMI drops off once the balance reaches this share of the appraised value.
const PMI_STOP_RATIO: Rate = dec!(0.80);

/// Monthly escrow costs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscrowCosts {
    /// Annual tax divided by the tax base
    pub effective_tax_rate: Rate,
    /// Tax base less the homestead exemption, floored at zero
    pub taxable_value: Money,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
}

/// Private mortgage insurance terms, fixed at origination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PmiTerms {
    /// Principal over appraised value, in percent (0 when value is 0)
    pub loan_to_value: Percent,
    pub applicable: bool,
    pub monthly_pmi: Money,
    /// Balance at or below which PMI is no longer charged
    pub stop_threshold: Money,
}

impl PmiTerms {
    /// PMI owed for a period that opens with `balance`.
    pub fn charge_for(&self, balance: Money, periodic_pmi: Money) -> Money {
        if self.applicable && balance > self.stop_threshold {
            periodic_pmi
        } else {
            Decimal::ZERO
        }
    }
}

pub fn escrow_costs(config: &LoanConfiguration) -> EscrowCosts {
    let tax_base = config.appraised_value();
    let effective_tax_rate = if tax_base > Decimal::ZERO {
        config.annual_property_tax / tax_base
    } else {
        Decimal::ZERO
    };
    let taxable_value = (tax_base - config.homestead_exemption).max(Decimal::ZERO);
    let annual_tax = taxable_value * effective_tax_rate;

    EscrowCosts {
        effective_tax_rate,
        taxable_value,
        monthly_taxes: annual_tax / MONTHS_PER_YEAR,
        monthly_insurance: config.annual_homeowners_insurance / MONTHS_PER_YEAR,
        monthly_hoa: config.monthly_hoa_fee,
    }
}

pub fn pmi_terms(principal: Money, appraised_value: Money, annual_pmi_pct: Percent) -> PmiTerms {
    let loan_to_value = if appraised_value > Decimal::ZERO {
        principal / appraised_value * PERCENT
    } else {
        Decimal::ZERO
    };
    let applicable = loan_to_value > PMI_LTV_THRESHOLD && annual_pmi_pct > Decimal::ZERO;
    let monthly_pmi = if applicable {
        principal * annual_pmi_pct / PERCENT / MONTHS_PER_YEAR
    } else {
        Decimal::ZERO
    };

    PmiTerms {
        loan_to_value,
        applicable,
        monthly_pmi,
        stop_threshold: appraised_value * PMI_STOP_RATIO,
    }
}
