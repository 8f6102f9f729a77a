use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use mortgage_core::amortization::loan_programs::{apply_loan_program, down_payment_from_percent};
use mortgage_core::amortization::{
    self, ExtraPaymentType, LoanConfiguration, LoanMode, LoanType, PaymentFrequency, PurchaseTerms,
};

use crate::input;

/// Down payment used when neither an amount nor a percent is given.
const DEFAULT_DOWN_PAYMENT_PCT: Decimal = dec!(20);

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExtraTypeArg {
    Recurring,
    OneTime,
    Annual,
}

impl From<ExtraTypeArg> for ExtraPaymentType {
    fn from(arg: ExtraTypeArg) -> Self {
        match arg {
            ExtraTypeArg::Recurring => ExtraPaymentType::Recurring,
            ExtraTypeArg::OneTime => ExtraPaymentType::OneTime,
            ExtraTypeArg::Annual => ExtraPaymentType::Annual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Conventional,
    Jumbo,
    Fha,
    Va,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Conventional => LoanType::Conventional,
            LoanTypeArg::Jumbo => LoanType::Jumbo,
            LoanTypeArg::Fha => LoanType::Fha,
            LoanTypeArg::Va => LoanType::Va,
        }
    }
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON or YAML loan configuration (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment amount
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percent of price (used when --down-payment is absent)
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term_years: u32,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Extra principal payment amount
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// When the extra payment is made
    #[arg(long, value_enum, default_value = "recurring")]
    pub extra_type: ExtraTypeArg,

    /// Date of a one-time extra payment (YYYY-MM-DD)
    #[arg(long)]
    pub one_time_date: Option<NaiveDate>,

    /// Annual PMI in percent of the loan amount
    #[arg(long)]
    pub pmi: Option<Decimal>,

    /// Annual property tax in dollars
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual homeowners insurance in dollars
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA fee
    #[arg(long)]
    pub hoa: Option<Decimal>,

    /// Homestead exemption deducted from the taxable value
    #[arg(long)]
    pub homestead_exemption: Option<Decimal>,

    /// Loan start date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Loan program
    #[arg(long, value_enum, default_value = "conventional")]
    pub loan_type: LoanTypeArg,

    /// Apply the loan program's fees and down-payment rules
    #[arg(long)]
    pub apply_program: bool,

    /// Omit the period-by-period schedule from the output
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = match input::load::<LoanConfiguration>(args.input.as_deref())? {
        Some(config) => config,
        None => config_from_flags(&args)?,
    };
    let config = if args.apply_program {
        apply_loan_program(&config)
    } else {
        config
    };

    let mut output = amortization::compute_schedule(&config)?;
    if args.summary_only {
        output.result.schedule.clear();
    }
    Ok(serde_json::to_value(output)?)
}

/// Build a purchase configuration from individual flags.
pub fn config_from_flags(args: &ScheduleArgs) -> Result<LoanConfiguration, Box<dyn std::error::Error>> {
    let home_price = args
        .home_price
        .ok_or("--home-price is required (or provide --input)")?;
    let down_payment = match args.down_payment {
        Some(amount) => amount,
        None => down_payment_from_percent(
            home_price,
            args.down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT),
        ),
    };

    Ok(LoanConfiguration {
        mode: LoanMode::Purchase(PurchaseTerms {
            home_price,
            down_payment,
        }),
        loan_term_years: args.term_years,
        annual_interest_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        payment_frequency: args.frequency.into(),
        extra_payment: args.extra_payment.unwrap_or(Decimal::ZERO),
        extra_payment_type: args.extra_type.into(),
        one_time_payment_date: args.one_time_date,
        origination_fees: vec![],
        annual_pmi_pct: args.pmi.unwrap_or(Decimal::ZERO),
        annual_property_tax: args.property_tax.unwrap_or(Decimal::ZERO),
        annual_homeowners_insurance: args.insurance.unwrap_or(Decimal::ZERO),
        monthly_hoa_fee: args.hoa.unwrap_or(Decimal::ZERO),
        homestead_exemption: args.homestead_exemption.unwrap_or(Decimal::ZERO),
        start_date: args
            .start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        loan_type: args.loan_type.into(),
    })
}
