//! Crate-level error types.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal errors surfaced before or after a simulation run.
///
/// Nothing inside the tick loop produces one of these: action refusals are
/// events and provider failures fall back to defaults.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration:\n{}", join_errors(.0))]
    Config(Vec<ConfigError>),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(vec![e])
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_variant_lists_every_field() {
        let err = SimError::Config(vec![
            ConfigError::new("simulation.tick_minutes", "must be > 0"),
            ConfigError::new("npcs[0].name", "must not be empty"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("simulation.tick_minutes"));
        assert!(msg.contains("npcs[0].name"));
    }
}
