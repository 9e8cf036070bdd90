use std::sync::Arc;
use std::time::Duration;

use valuscope::{ValuationMetric, ValuscopeError};
use valuscope_mock::{DynamicMockSource, MockBehavior, MockSource};

use crate::helpers::{HS300, fast_builder};

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let source = Arc::new(MockSource::failing_first(2));
    let vs = fast_builder(source.clone()).retry_attempts(3).build().unwrap();

    let pe = vs.raw_valuation(ValuationMetric::Pe, Some(HS300)).await.unwrap();
    assert!(!pe.is_empty());
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_report_the_last_failure() {
    let source = Arc::new(MockSource::failing_first(10));
    let vs = fast_builder(source.clone()).retry_attempts(3).build().unwrap();

    let err = vs.raw_valuation(ValuationMetric::Pb, Some(HS300)).await.unwrap_err();
    match err {
        ValuscopeError::RetriesExhausted { capability, attempts, last } => {
            assert_eq!(capability, "valuation");
            assert_eq!(attempts, 3);
            assert!(matches!(*last, ValuscopeError::Retrieval { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn slow_source_times_out_on_every_attempt() {
    let vs = fast_builder(Arc::new(MockSource::new()))
        .source_timeout(Duration::from_millis(20))
        .retry_attempts(2)
        .build()
        .unwrap();

    let err = vs.raw_valuation(ValuationMetric::Pe, Some("TIMEOUT")).await.unwrap_err();
    let ValuscopeError::RetriesExhausted { attempts, last, .. } = err else {
        panic!("expected exhausted retries");
    };
    assert_eq!(attempts, 2);
    assert_eq!(*last, ValuscopeError::source_timeout("valuscope-mock", "valuation"));
}

#[tokio::test]
async fn hanging_source_is_cut_by_the_timeout() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("hang");
    ctrl.set_valuation_behavior(ValuationMetric::Pe, HS300, MockBehavior::Hang).await;
    let vs = fast_builder(source)
        .source_timeout(Duration::from_millis(20))
        .retry_attempts(1)
        .build()
        .unwrap();

    let err = vs.raw_valuation(ValuationMetric::Pe, None).await.unwrap_err();
    assert!(matches!(err, ValuscopeError::RetriesExhausted { attempts: 1, .. }));
    assert_eq!(ctrl.calls("valuation").await, 1);
}

#[tokio::test]
async fn structural_errors_are_not_retried() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("broken");
    ctrl.set_roe_behavior("600519", MockBehavior::Fail(ValuscopeError::missing_column("roe")))
        .await;
    ctrl.set_valuation_behavior(
        ValuationMetric::Pe,
        HS300,
        MockBehavior::Fail(ValuscopeError::Data("bad payload".into())),
    )
    .await;
    let vs = fast_builder(source).retry_attempts(3).build().unwrap();

    let err = vs.raw_valuation(ValuationMetric::Pe, None).await.unwrap_err();
    assert_eq!(err, ValuscopeError::Data("bad payload".into()));
    assert_eq!(ctrl.calls("valuation").await, 1);
}

#[tokio::test]
async fn flaky_source_recovers_within_the_budget() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("flaky");
    let fixture = valuscope_mock::fixtures::valuation(ValuationMetric::Pb, HS300).unwrap();
    ctrl.set_valuation_behavior(
        ValuationMetric::Pb,
        HS300,
        MockBehavior::Flaky {
            remaining: 2,
            error: ValuscopeError::retrieval("flaky", "503"),
            value: fixture.clone(),
        },
    )
    .await;
    let vs = fast_builder(source).retry_attempts(3).build().unwrap();

    let pb = vs.raw_valuation(ValuationMetric::Pb, None).await.unwrap();
    assert_eq!(pb, fixture);
    assert_eq!(ctrl.calls("valuation").await, 3);
}

#[tokio::test]
async fn next_source_is_used_after_exhaustion() {
    let (failing, ctrl) = DynamicMockSource::new_with_controller("down");
    ctrl.set_valuation_behavior(
        ValuationMetric::Pe,
        HS300,
        MockBehavior::Fail(ValuscopeError::retrieval("down", "connection refused")),
    )
    .await;
    let vs = fast_builder(failing)
        .with_source(Arc::new(MockSource::new()))
        .retry_attempts(2)
        .build()
        .unwrap();

    let pe = vs.raw_valuation(ValuationMetric::Pe, None).await.unwrap();
    assert_eq!(pe.name(), "pe");
    assert_eq!(ctrl.calls("valuation").await, 2);
}

#[tokio::test]
async fn cleared_rules_leave_the_source_unconfigured() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("reset");
    let fixture = valuscope_mock::fixtures::valuation(ValuationMetric::Pe, HS300).unwrap();
    ctrl.set_valuation_behavior(ValuationMetric::Pe, HS300, MockBehavior::Return(fixture))
        .await;
    let vs = fast_builder(source).retry_attempts(1).build().unwrap();

    assert!(vs.raw_valuation(ValuationMetric::Pe, None).await.is_ok());
    assert_eq!(ctrl.calls("valuation").await, 1);

    ctrl.clear_all_behaviors().await;
    assert_eq!(ctrl.calls("valuation").await, 0);
    let err = vs.raw_valuation(ValuationMetric::Pe, None).await.unwrap_err();
    let ValuscopeError::RetriesExhausted { last, .. } = err else {
        panic!("expected exhausted retries");
    };
    assert!(matches!(*last, ValuscopeError::Retrieval { .. }));
    assert_eq!(ctrl.calls("valuation").await, 1);
}
