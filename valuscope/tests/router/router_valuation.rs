use std::sync::Arc;

use valuscope::{DATE_COLUMN, ValuationMetric, ValuscopeError};
use valuscope_mock::MockSource;
use valuscope_mock::fixtures::SPIKE_DATE;

use crate::helpers::{HS300, fast_builder, floats};

#[tokio::test]
async fn valuation_table_has_values_and_dense_percentiles() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let table = vs.valuation(ValuationMetric::Pe, Some(HS300)).await.unwrap();

    assert_eq!(table.column_names(), &[DATE_COLUMN, "pe", "pe_percentile"]);
    let pe = floats(&table, "pe");
    let pct = floats(&table, "pe_percentile");
    assert!(pe.iter().all(|v| v.is_some_and(f64::is_finite)));
    assert!(pct.iter().all(|v| v.is_some_and(|p| (0.0..=100.0).contains(&p))));
}

#[tokio::test]
async fn spike_is_removed_before_ranking() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let raw = vs.raw_valuation(ValuationMetric::Pb, None).await.unwrap();
    let frame = vs.valuation_frame(ValuationMetric::Pb, None).await.unwrap();

    assert!(!frame.values.dates().contains(&SPIKE_DATE));
    // gap and infinite rows keep their dates and are filled
    assert_eq!(frame.values.len(), raw.len() - 1);
    assert_eq!(frame.values.missing(), 0);
    assert_eq!(frame.values.dates(), frame.percentile.dates());
    assert_eq!(frame.percentile.name(), "pb_percentile");
}

#[tokio::test]
async fn warm_up_follows_min_samples() {
    let vs = fast_builder(Arc::new(MockSource::new()))
        .window(20)
        .min_samples(20)
        .build()
        .unwrap();
    let raw = vs.raw_valuation(ValuationMetric::Pe, None).await.unwrap();
    let frame = vs.valuation_frame(ValuationMetric::Pe, None).await.unwrap();
    // rows before the 20th valid observation are backward filled from the first rank
    let ranks = valuscope_core::rolling_percentile(frame.values.values(), 20, 20);
    assert!(ranks[..19].iter().all(Option::is_none));
    assert!(ranks[19].is_some());
    assert_eq!(frame.percentile.values()[0], ranks[19]);
    assert!(raw.len() > frame.values.len());
}

#[tokio::test]
async fn batch_reports_failures_per_universe() {
    let vs = fast_builder(Arc::new(MockSource::new()))
        .retry_attempts(1)
        .build()
        .unwrap();
    let (ok, failed) = vs.valuations(ValuationMetric::Pe, &[HS300, "纳斯达克"]).await;

    assert_eq!(ok.len(), 1);
    assert_eq!(ok[0].0, HS300);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "纳斯达克");
    assert!(matches!(failed[0].1, ValuscopeError::RetriesExhausted { .. }));
}
