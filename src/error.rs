//! Configuration errors surfaced when settings are built or loaded.
//!
//! Runtime droplet operations never fail loudly; only construction-time
//! validation reports problems.
use thiserror::Error;

use crate::config::Easing;

/// Reasons an [`crate::config::OperatorSettings`] or
/// [`crate::config::EmissionConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A range whose bounds are inverted or not finite.
    #[error("range `{field}` is invalid: min {min} must be finite and not exceed max {max}")]
    InvalidRange {
        /// Name of the offending field.
        field: &'static str,
        /// Lower bound as configured.
        min: f32,
        /// Upper bound as configured.
        max: f32,
    },
    /// A value that must be strictly positive was zero, negative or not finite.
    #[error("`{field}` must be positive, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value as configured.
        value: f32,
    },
    /// A tween duration below zero.
    #[error("tween `{curve}` has negative duration {duration}")]
    NegativeDuration {
        /// Which named curve was invalid.
        curve: &'static str,
        /// Duration as configured.
        duration: f32,
    },
    /// The impact sound list contains an empty name.
    #[error("impact sound names must not be empty")]
    EmptySoundName,
    /// The object pool was configured with no slots.
    #[error("pool capacity must be at least one")]
    ZeroCapacity,
    /// Droplets could land larger than a merged pool is allowed to grow.
    #[error("size range max {size_max} exceeds merge cap {max_size}")]
    SizeExceedsMergeCap {
        /// Upper bound of the landing size range.
        size_max: f32,
        /// Maximum merged horizontal extent.
        max_size: f32,
    },
    /// The expand curve overshoots, so a merged pool could briefly grow
    /// past its cap.
    #[error("expand easing {easing:?} overshoots the merge cap")]
    OvershootingExpand {
        /// Configured expand curve.
        easing: Easing,
    },
    /// Settings text could not be parsed.
    #[error("failed to parse settings: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn range_error_names_the_field() {
        let err = ConfigError::InvalidRange {
            field: "velocity",
            min: 2.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("velocity"));
    }

    #[rstest]
    fn json_errors_convert_to_parse() {
        let Err(json_err) = serde_json::from_str::<u32>("not json") else {
            panic!("expected a parse failure");
        };
        assert!(matches!(ConfigError::from(json_err), ConfigError::Parse(_)));
    }
}
