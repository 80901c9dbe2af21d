//! Error types for gamma level computation
//!
//! The computational paths never return these: they are raised only at the
//! configuration boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type GexResult<T> = Result<T, GexError>;

impl GexError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Check that a configuration value lies in (0, 1]
pub(crate) fn validate_fraction(name: &str, value: f64) -> GexResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(GexError::config(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

impl From<serde_json::Error> for GexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
