use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::config::{FeeKind, OriginationFee};
use crate::types::Money;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// A fee resolved to a dollar amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedFee {
    pub name: String,
    pub amount: Money,
}

/// Dollar amount of a single fee on `principal`.
pub fn resolve_fee(fee: &OriginationFee, principal: Money) -> Money {
    match fee.kind {
        FeeKind::Fixed => fee.value,
        FeeKind::Percentage => round_cents(principal * fee.value / PERCENT),
    }
}

/// Resolve every fee in order and return them with their total.
pub fn resolve_fees(fees: &[OriginationFee], principal: Money) -> (Vec<ResolvedFee>, Money) {
    let resolved: Vec<ResolvedFee> = fees
        .iter()
        .map(|fee| ResolvedFee {
            name: fee.name.clone(),
            amount: resolve_fee(fee, principal),
        })
        .collect();
    let total = resolved.iter().map(|f| f.amount).sum();
    (resolved, total)
}

pub(crate) fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
