use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::config::{FeeKind, LoanConfiguration, LoanMode, LoanType, OriginationFee};
use super::fees::round_cents;
use crate::types::{Money, Percent};

pub const FHA_UPFRONT_MIP: &str = "FHA Upfront MIP";
pub const VA_FUNDING_FEE: &str = "VA Funding Fee";

/// FHA upfront mortgage insurance premium, percent of principal.
const FHA_UPFRONT_MIP_PCT: Percent = dec!(1.75);

/// VA funding fee, percent of principal.
const VA_FUNDING_FEE_PCT: Percent = dec!(2.3);

/// Minimum FHA down payment, percent of price.
const FHA_MIN_DOWN_PCT: Percent = dec!(3.5);

/// Return a copy of `config` with the program fees and down-payment rules
/// of its `loan_type` applied. Program fees from a previous application are
/// replaced, so applying twice is the same as applying once.
pub fn apply_loan_program(config: &LoanConfiguration) -> LoanConfiguration {
    let mut out = config.clone();
    out.origination_fees
        .retain(|fee| fee.name != FHA_UPFRONT_MIP && fee.name != VA_FUNDING_FEE);

    match out.loan_type {
        LoanType::Fha => {
            out.origination_fees.push(OriginationFee {
                name: FHA_UPFRONT_MIP.into(),
                value: FHA_UPFRONT_MIP_PCT,
                kind: FeeKind::Percentage,
            });
            if let LoanMode::Purchase(terms) = &mut out.mode {
                if down_payment_percent(terms.home_price, terms.down_payment) < FHA_MIN_DOWN_PCT {
                    terms.down_payment = down_payment_from_percent(terms.home_price, FHA_MIN_DOWN_PCT);
                }
            }
        }
        LoanType::Va => {
            out.origination_fees.push(OriginationFee {
                name: VA_FUNDING_FEE.into(),
                value: VA_FUNDING_FEE_PCT,
                kind: FeeKind::Percentage,
            });
            if let LoanMode::Purchase(terms) = &mut out.mode {
                terms.down_payment = Decimal::ZERO;
            }
        }
        LoanType::Conventional | LoanType::Jumbo => {}
    }

    out
}

/// Down payment for `pct` percent of `home_price`, to the cent.
pub fn down_payment_from_percent(home_price: Money, pct: Percent) -> Money {
    round_cents(home_price * pct / Decimal::ONE_HUNDRED)
}

/// Down payment as a percent of `home_price`, two decimals; 0 for a zero price.
pub fn down_payment_percent(home_price: Money, down_payment: Money) -> Percent {
    if home_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_cents(down_payment / home_price * Decimal::ONE_HUNDRED)
}
