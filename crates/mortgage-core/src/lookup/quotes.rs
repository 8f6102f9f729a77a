use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

/// Location data returned by a postal-code tax lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaxRateInfo {
    pub city: String,
    pub state: String,
    /// Average annual property tax rate as a decimal (0.015 = 1.5%)
    pub tax_rate: Rate,
}

impl TaxRateInfo {
    pub fn validate(&self) -> MortgageResult<()> {
        if self.city.trim().is_empty() || self.state.trim().is_empty() {
            return Err(MortgageError::InvalidInput {
                field: "city/state".into(),
                reason: "Tax lookup returned no location".into(),
            });
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate >= Decimal::ONE {
            return Err(MortgageError::InvalidInput {
                field: "tax_rate".into(),
                reason: "Tax rate must be a decimal fraction in [0, 1)".into(),
            });
        }
        Ok(())
    }

    /// Annual property tax for a home at `home_price` in this location.
    pub fn annual_tax_for(&self, home_price: Money) -> MortgageResult<Money> {
        annual_property_tax(self.tax_rate, home_price)
    }
}

/// Current market rates for the two standard fixed terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateQuote {
    /// 30-year fixed rate (6.5 = 6.5%)
    pub rate_30_year: Percent,
    /// 15-year fixed rate
    pub rate_15_year: Percent,
}

impl RateQuote {
    pub fn validate(&self) -> MortgageResult<()> {
        for (field, value) in [("rate_30_year", self.rate_30_year), ("rate_15_year", self.rate_15_year)] {
            if value < Decimal::ZERO {
                return Err(MortgageError::InvalidInput {
                    field: field.into(),
                    reason: "Quoted rate cannot be negative".into(),
                });
            }
        }
        Ok(())
    }
}

/// Annual property tax in whole dollars: `tax_rate × home_price`, rounded
/// half away from zero.
pub fn annual_property_tax(tax_rate: Rate, home_price: Money) -> MortgageResult<Money> {
    if tax_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate cannot be negative".into(),
        });
    }
    if home_price < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price cannot be negative".into(),
        });
    }
    Ok((tax_rate * home_price).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
