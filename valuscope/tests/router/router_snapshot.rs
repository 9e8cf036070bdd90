use std::sync::Arc;

use valuscope::{TimeSeries, ValuationMetric, ValuscopeError};
use valuscope_mock::{DynamicMockSource, MockBehavior, MockSource};

use crate::helpers::{HS300, d, fast_builder, floats, price_table};

#[tokio::test]
async fn snapshot_attaches_dense_pe_and_roe() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let table = vs
        .stock_snapshot("600519", d(2019, 1, 1), d(2019, 3, 31))
        .await
        .unwrap();

    assert!(table.height() > 0);
    assert!(floats(&table, "pe").iter().all(Option::is_some));
    // quarterly fixtures start in 2014, so every row has a prior report
    assert!(floats(&table, "roe").iter().all(Option::is_some));
}

#[tokio::test]
async fn pe_gaps_take_the_median_and_roe_is_forward_filled() {
    let (source, ctrl) = DynamicMockSource::new_with_controller("scripted");
    let dates: Vec<_> = (1..=4).map(|n| d(2024, 1, n)).collect();
    ctrl.set_price_behavior("600000", MockBehavior::Return(price_table(&dates))).await;
    ctrl.set_valuation_behavior(
        ValuationMetric::Pe,
        HS300,
        MockBehavior::Return(TimeSeries::new(
            "pe",
            [
                (d(2024, 1, 2), Some(10.0)),
                (d(2024, 1, 3), Some(f64::INFINITY)),
                (d(2024, 1, 4), Some(20.0)),
            ],
        )),
    )
    .await;
    ctrl.set_roe_behavior(
        "600000",
        MockBehavior::Return(TimeSeries::from_points("roe", &[(d(2024, 1, 3), 0.1)])),
    )
    .await;
    let vs = fast_builder(source).build().unwrap();

    let table = vs.stock_snapshot("600000", d(2024, 1, 1), d(2024, 1, 4)).await.unwrap();
    assert_eq!(floats(&table, "pe"), vec![Some(15.0), Some(10.0), Some(15.0), Some(20.0)]);
    assert_eq!(floats(&table, "roe"), vec![None, None, Some(0.1), Some(0.1)]);
    assert_eq!(floats(&table, "close"), vec![Some(10.0), Some(11.0), Some(12.0), Some(13.0)]);
}

#[tokio::test]
async fn inverted_range_is_rejected_before_fetching() {
    let source = Arc::new(MockSource::new());
    let vs = fast_builder(source.clone()).build().unwrap();
    let err = vs
        .stock_snapshot("600519", d(2020, 1, 2), d(2020, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ValuscopeError::InvalidArg(_)));
    assert_eq!(source.calls(), 0);
}
