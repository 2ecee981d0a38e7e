//! Derived indicators computed from the loaded datasets.
//!
//! All analyses are pure functions over borrowed records and return new
//! values; inputs are never modified.

pub mod emissions;
pub mod pricing;
pub mod punctuality;
pub mod ridership;
pub mod utility;
