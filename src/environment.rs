//! Ambient conditions supplied to the house at the start of a run.

use serde::Serialize;
use thiserror::Error;

use crate::config::AmbientConfig;

/// Outdoor temperature and humidity, assumed to hold indoors as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmbientConditions {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

impl From<&AmbientConfig> for AmbientConditions {
    fn from(cfg: &AmbientConfig) -> Self {
        Self {
            temperature_celsius: cfg.temperature_celsius,
            humidity_percent: cfg.humidity_percent,
        }
    }
}

/// Failure to obtain ambient conditions.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("ambient provider unavailable: {0}")]
    Unavailable(String),
    #[error("ambient reading out of range: {0}")]
    OutOfRange(String),
}

/// Supplies ambient conditions once per run.
pub trait AmbientProvider {
    /// # Errors
    ///
    /// Returns an [`EnvironmentError`] when no reading is available; the
    /// driver then falls back to the configured `[ambient]` values.
    fn ambient_conditions(&self) -> Result<AmbientConditions, EnvironmentError>;
}

/// Provider returning a constant reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedAmbient(pub AmbientConditions);

impl AmbientProvider for FixedAmbient {
    fn ambient_conditions(&self) -> Result<AmbientConditions, EnvironmentError> {
        let c = self.0;
        if !(0.0..=100.0).contains(&c.humidity_percent) {
            return Err(EnvironmentError::OutOfRange(format!(
                "humidity {}%",
                c.humidity_percent
            )));
        }
        Ok(c)
    }
}

/// Provider that always fails, leaving the configured defaults in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbient;

impl AmbientProvider for NoAmbient {
    fn ambient_conditions(&self) -> Result<AmbientConditions, EnvironmentError> {
        Err(EnvironmentError::Unavailable("no provider configured".into()))
    }
}

/// Resolves conditions from `provider`, falling back to `fallback` on error.
pub fn resolve(provider: &dyn AmbientProvider, fallback: &AmbientConfig) -> AmbientConditions {
    match provider.ambient_conditions() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "using configured ambient defaults");
            AmbientConditions::from(fallback)
        }
    }
}
