use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Value};

use mortgage_core::lookup::annual_property_tax;

/// Arguments for the property-tax helper
#[derive(Args)]
pub struct PropertyTaxArgs {
    /// Purchase price or estimated value of the home
    #[arg(long)]
    pub home_price: Decimal,

    /// Annual tax rate as a decimal (e.g. 0.0181 for 1.81%)
    #[arg(long)]
    pub tax_rate: Decimal,
}

pub fn run_property_tax(args: PropertyTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let annual = annual_property_tax(args.tax_rate, args.home_price)?;
    Ok(json!({
        "result": {
            "annual_property_tax": annual,
            "monthly_property_tax": monthly_share(annual),
            "tax_rate": args.tax_rate,
            "home_price": args.home_price,
        }
    }))
}

/// One twelfth of an annual figure, to the cent.
fn monthly_share(annual: Decimal) -> Decimal {
    (annual / Decimal::from(12)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
