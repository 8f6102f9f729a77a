pub mod compare;
pub mod property_tax;
pub mod schedule;
