//! Configuration errors and the shared config contract.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Invalid tuning values or an unreadable config document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
    },
    /// A value fell outside its allowed closed range.
    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// A count or frame interval was zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Field name
        field: &'static str,
    },
    /// The config document could not be decoded.
    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A level pack has no playable first level.
    #[error("level: {0}")]
    Level(#[from] strata::LevelError),
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn ensure_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn ensure_nonzero(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else {
        Ok(())
    }
}

/// Tuning values for one game.
///
/// `Default` carries the stock constants; `validate` rejects values the rules
/// cannot run with.
pub trait GameConfig: Default + Clone + Serialize + DeserializeOwned {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Decode and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, or the validation error.
    fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_is_inclusive() {
        assert!(ensure_range("bias", 0.0, 0.0, 1.0).is_ok());
        assert!(ensure_range("bias", 1.0, 0.0, 1.0).is_ok());
        assert!(matches!(
            ensure_range("bias", 1.5, 0.0, 1.0),
            Err(ConfigError::OutOfRange { field: "bias", .. })
        ));
    }

    #[test]
    fn positive_and_nonzero() {
        assert!(ensure_positive("max", 0.0).is_err());
        assert!(ensure_positive("max", 0.1).is_ok());
        assert!(ensure_nonzero("every", 0).is_err());
        assert!(ensure_nonzero("every", 6).is_ok());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::Zero { field: "gravity_every" };
        assert_eq!(err.to_string(), "gravity_every must be non-zero");
    }
}
