use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// yields a negative payment.
///
/// When `(1 + rate)^nper`, or the present value compounded by it, exceeds
/// the decimal range the annuity factor is indistinguishable from a
/// perpetuity, so the payment collapses to the interest on the present value.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let perpetuity = -(present_value * rate);
    let one_plus_r = Decimal::ONE + rate;
    let Some(factor) = one_plus_r.checked_powu(u64::from(nper)) else {
        return Ok(perpetuity);
    };
    let Some(compounded) = present_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(future_value))
    else {
        return Ok(perpetuity);
    };
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    Ok(-compounded / annuity_factor)
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> MortgageResult<Money> {
    Ok(-pmt(rate, nper, principal, Decimal::ZERO)?)
}
