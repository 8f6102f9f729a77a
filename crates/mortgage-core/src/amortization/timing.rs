//! Payment calendar and extra-payment timing predicates.
//!
//! Every payment date is derived from the start date, never from the
//! previous payment, so month-end clamping does not drift: a loan started on
//! Jan 31 pays on Feb 28, Mar 31, Apr 30, ...
//!
//! Period `n` covers the window `(date(n-1), date(n)]`, where `date(0)` is
//! the start date and the first window is also closed on the left. The
//! timing predicates are expressed over those windows.

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::config::PaymentFrequency;
use crate::error::MortgageError;
use crate::MortgageResult;

const DAYS_PER_BIWEEKLY_PERIOD: i64 = 14;

/// Average days per month used when converting a date gap to months.
const AVG_DAYS_PER_MONTH: Decimal = dec!(30.44);

/// Date of payment `period` (1-based).
pub fn payment_date(
    start: NaiveDate,
    frequency: PaymentFrequency,
    period: u32,
) -> MortgageResult<NaiveDate> {
    let date = match frequency {
        PaymentFrequency::Monthly => start.checked_add_months(Months::new(period)),
        PaymentFrequency::BiWeekly => {
            start.checked_add_signed(Duration::days(DAYS_PER_BIWEEKLY_PERIOD * i64::from(period)))
        }
    };
    date.ok_or_else(|| {
        MortgageError::DateError(format!("payment {period} from {start} is out of range"))
    })
}

/// `start` moved forward by whole years; Feb 29 clamps to Feb 28.
pub fn add_years(start: NaiveDate, years: u32) -> MortgageResult<NaiveDate> {
    years
        .checked_mul(12)
        .and_then(|months| start.checked_add_months(Months::new(months)))
        .ok_or_else(|| MortgageError::DateError(format!("{start} + {years} years is out of range")))
}

/// True when an anniversary of `start` (one year or more after it) falls in
/// the window `(previous, current]`.
pub fn is_anniversary_period(start: NaiveDate, previous: NaiveDate, current: NaiveDate) -> bool {
    let years_elapsed = current.year() - start.year();
    // A window is at most one month long, so only the anniversaries in the
    // current and the preceding calendar year can land inside it.
    [years_elapsed - 1, years_elapsed]
        .into_iter()
        .filter(|k| *k >= 1)
        .filter_map(|k| u32::try_from(k).ok())
        .filter_map(|k| add_years(start, k).ok())
        .any(|anniversary| previous < anniversary && anniversary <= current)
}

/// True when `target` falls in the window of a period ending on `current`.
pub fn period_contains(
    target: NaiveDate,
    previous: NaiveDate,
    current: NaiveDate,
    is_first: bool,
) -> bool {
    let after_open = if is_first {
        previous <= target
    } else {
        previous < target
    };
    after_open && target <= current
}

/// Whole months (30.44-day months, floored) from `earlier` to `later`;
/// zero when `later` is not after `earlier`.
pub fn whole_months_between(earlier: NaiveDate, later: NaiveDate) -> u32 {
    let days = (later - earlier).num_days();
    if days <= 0 {
        return 0;
    }
    (Decimal::from(days) / AVG_DAYS_PER_MONTH)
        .floor()
        .to_u32()
        .unwrap_or(0)
}
