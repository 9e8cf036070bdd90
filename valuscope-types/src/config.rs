//! Configuration types shared by the engine and the orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ValuscopeError;

/// Parameters of the valuation percentile path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileConfig {
    /// Trailing window length in observations. 1260 is roughly five trading years.
    pub window: usize,
    /// Minimum number of valid observations in a window before a percentile is emitted.
    pub min_samples: usize,
    /// Half-width of the outlier band in standard deviations.
    pub sigma: f64,
}

impl Default for PercentileConfig {
    fn default() -> Self {
        Self {
            window: 1260,
            min_samples: 60,
            sigma: 3.0,
        }
    }
}

impl PercentileConfig {
    /// Check that the parameters describe a computable window.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `window` or `min_samples` is below 2, if
    /// `min_samples` exceeds `window`, or if `sigma` is not a positive finite number.
    pub fn validate(&self) -> Result<(), ValuscopeError> {
        if self.window < 2 {
            return Err(ValuscopeError::InvalidArg(format!(
                "percentile window must be at least 2, got {}",
                self.window
            )));
        }
        if self.min_samples < 2 || self.min_samples > self.window {
            return Err(ValuscopeError::InvalidArg(format!(
                "min_samples must be within [2, {}], got {}",
                self.window, self.min_samples
            )));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ValuscopeError::InvalidArg(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Bounded retry with a fixed delay between attempts, applied to source calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts (>= 1).
    pub attempts: u32,
    /// Delay slept between two consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Global configuration for the `Valuscope` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuscopeConfig {
    /// Percentile path parameters.
    pub percentile: PercentileConfig,
    /// Retry policy around every source call.
    pub retry: RetryConfig,
    /// Timeout for a single source attempt.
    pub source_timeout: Duration,
    /// Index universe used for valuation series when the caller does not name one.
    pub default_universe: String,
}

impl Default for ValuscopeConfig {
    fn default() -> Self {
        Self {
            percentile: PercentileConfig::default(),
            retry: RetryConfig::default(),
            source_timeout: Duration::from_secs(10),
            default_universe: "沪深300".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PercentileConfig::default().validate().is_ok());
        let cfg = ValuscopeConfig::default();
        assert_eq!(cfg.percentile.window, 1260);
        assert_eq!(cfg.percentile.min_samples, 60);
        assert_eq!(cfg.retry.attempts, 3);
    }

    #[test]
    fn rejects_degenerate_windows() {
        let tiny = PercentileConfig {
            window: 1,
            ..PercentileConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(ValuscopeError::InvalidArg(_))));

        let too_many = PercentileConfig {
            window: 10,
            min_samples: 11,
            sigma: 3.0,
        };
        assert!(too_many.validate().is_err());

        let bad_sigma = PercentileConfig {
            sigma: f64::NAN,
            ..PercentileConfig::default()
        };
        assert!(bad_sigma.validate().is_err());
    }
}
