//! Caller-side plumbing for the external lookups that feed a configuration:
//! location-based property tax and current market rate quotes. No network
//! code lives here; callers fetch, then cache and convert with these types.

pub mod cache;
pub mod quotes;

pub use cache::LookupCache;
pub use quotes::{annual_property_tax, RateQuote, TaxRateInfo};
