use std::sync::Arc;

use valuscope::ValuscopeError;
use valuscope_mock::{DynamicMockSource, MockBehavior, MockSource};

use crate::helpers::{CSI300_INDEX, HS300, d, fast_builder, floats, price_table};
use valuscope::{TimeSeries, ValuationMetric};

#[tokio::test]
async fn index_prices_carry_both_percentiles() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let table = vs.index_indicator(CSI300_INDEX, None).await.unwrap();

    for col in ["close", "pe", "pe_percentile", "pb", "pb_percentile"] {
        assert!(table.has_column(col), "missing {col}");
    }
    for col in ["pe_percentile", "pb_percentile"] {
        assert!(
            floats(&table, col)
                .iter()
                .all(|v| v.is_some_and(|p| (0.0..=100.0).contains(&p))),
            "{col} not dense within bounds"
        );
    }
}

#[tokio::test]
async fn percentiles_are_back_filled_before_the_first_valuation() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("scripted");
    let dates: Vec<_> = (1..=6).map(|n| d(2024, 1, n)).collect();
    ctrl.set_index_behavior("idx", MockBehavior::Return(price_table(&dates))).await;
    for (metric, base) in [(ValuationMetric::Pe, 10.0), (ValuationMetric::Pb, 1.0)] {
        let series = TimeSeries::new(
            metric.column(),
            (3..=6).map(|n| (d(2024, 1, n), Some(base + f64::from(n)))),
        );
        ctrl.set_valuation_behavior(metric, HS300, MockBehavior::Return(series)).await;
    }
    let vs = fast_builder(source).window(3).min_samples(2).build().unwrap();

    let table = vs.index_indicator("idx", Some(HS300)).await.unwrap();
    let pe = floats(&table, "pe");
    assert_eq!(pe[..2], [None, None]);
    assert_eq!(pe[2..], [Some(13.0), Some(14.0), Some(15.0), Some(16.0)]);
    assert_eq!(floats(&table, "pb")[..2], [None, None]);
    for col in ["pe_percentile", "pb_percentile"] {
        let pct = floats(&table, col);
        assert!(pct.iter().all(Option::is_some), "{col} has gaps");
        assert_eq!(pct[0], pct[2]);
        assert_eq!(pct[1], pct[2]);
    }
}

#[tokio::test]
async fn any_failing_fetch_fails_the_call() {
    let vs = fast_builder(Arc::new(MockSource::new()))
        .retry_attempts(1)
        .build()
        .unwrap();
    let err = vs.index_indicator("FAIL", None).await.unwrap_err();
    assert!(matches!(err, ValuscopeError::RetriesExhausted { .. }));
}
