//! Max Pain
//!
//! The strike minimizing aggregate payout to option holders at expiry,
//! computed over an IV-informed strike window with dealer-bias tilt and
//! optional gamma weighting.

mod config;
mod engine;

pub use config::*;
pub use engine::*;
