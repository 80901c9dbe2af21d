//! Pricing Models
//!
//! Implements:
//! - Black-Scholes gamma (used to weight open interest near the money)

pub mod black_scholes;

pub use black_scholes::*;
