//! Day-precision event lookup.
//!
//! # Responsibility
//! - Resolve which events cover a calendar day or a range of days.
//!
//! # Invariants
//! - Matching ignores time-of-day; only calendar dates are compared.
//! - Results keep the input collection's order.

pub mod day_index;
