use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing_subscriber::fmt::format::FmtSpan;
use valuscope::{Valuscope, ValuationMetric};
use valuscope_mock::MockSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,valuscope=trace,valuscope_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Two transient failures up front so the retry warnings show up.
    let vs = Valuscope::builder()
        .with_source(Arc::new(MockSource::failing_first(2)))
        .retry_delay(Duration::from_millis(200))
        .build()?;

    let _ = vs.valuation(ValuationMetric::Pe, None).await?;
    let _ = vs.index_indicator("sh000300", None).await?;

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).ok_or("invalid start")?;
    let end = NaiveDate::from_ymd_opt(2020, 6, 30).ok_or("invalid end")?;
    let _ = vs.stock_snapshot("600519", start, end).await?;

    Ok(())
}
