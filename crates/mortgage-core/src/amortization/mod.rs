//! Fixed-rate mortgage amortization.

pub mod config;
pub mod escrow;
pub mod fees;
pub mod loan_programs;
pub mod schedule;
pub mod timing;

pub use config::{
    ExtraPaymentType, FeeKind, LoanConfiguration, LoanMode, LoanType, OriginationFee,
    PaymentFrequency, PurchaseTerms, RefinanceTerms,
};
pub use schedule::{compute_schedule, AmortizationOutput, AmortizationPeriod, LoanSummary};
