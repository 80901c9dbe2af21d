//! Core data types shared by the wall and max pain engines
//!
//! Defines:
//! - OptionType: call/put, doubling as the wall side
//! - ChainRow: one strike row of an option-chain side
//! - Numeric: lenient coercion of raw values to f64
//! - GexError: configuration-boundary errors

pub mod chain;
pub mod error;
pub mod numeric;
pub mod option;

pub use chain::*;
pub use error::*;
pub use numeric::*;
pub use option::*;
