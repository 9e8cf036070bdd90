use std::sync::Arc;
use std::time::Duration;

use valuscope::{PercentileConfig, Valuscope, ValuscopeError};
use valuscope_mock::MockSource;

#[test]
fn build_requires_a_source() {
    let err = Valuscope::builder().build().err().unwrap();
    assert!(matches!(err, ValuscopeError::InvalidArg(_)));
}

#[test]
fn build_rejects_zero_attempts_and_zero_timeout() {
    let no_attempts = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .retry_attempts(0)
        .build();
    assert!(matches!(no_attempts, Err(ValuscopeError::InvalidArg(_))));

    let no_timeout = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .source_timeout(Duration::ZERO)
        .build();
    assert!(matches!(no_timeout, Err(ValuscopeError::InvalidArg(_))));
}

#[test]
fn build_validates_percentile_parameters() {
    let err = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .window(50)
        .min_samples(60)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ValuscopeError::InvalidArg(_)));

    let err = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .sigma(0.0)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ValuscopeError::InvalidArg(_)));
}

#[test]
fn builder_settings_reach_the_config() {
    let vs = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .percentile(PercentileConfig {
            window: 250,
            min_samples: 20,
            sigma: 2.5,
        })
        .retry_attempts(5)
        .default_universe("中证500")
        .build()
        .unwrap();
    let cfg = vs.config();
    assert_eq!(cfg.percentile.window, 250);
    assert_eq!(cfg.retry.attempts, 5);
    assert_eq!(cfg.default_universe, "中证500");
    assert_eq!(cfg.source_timeout, Duration::from_secs(10));
}
