use std::sync::Arc;

use chrono::NaiveDate;
use valuscope::{FilterCondition, Valuscope, ValuationMetric, Value};
use valuscope_mock::MockSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build the orchestrator over the deterministic mock source.
    let vs = Valuscope::builder()
        .with_source(Arc::new(MockSource::new()))
        .build()?;

    // 2. Current PE and PB percentiles for a few universes.
    let universes = ["沪深300", "中证500", "上证50"];
    println!("{:<10} {:>8} {:>8} {:>8} {:>8}", "universe", "pe", "pe %", "pb", "pb %");
    for universe in universes {
        let pe = vs.valuation_frame(ValuationMetric::Pe, Some(universe)).await?;
        let pb = vs.valuation_frame(ValuationMetric::Pb, Some(universe)).await?;
        let last = |s: &valuscope::TimeSeries| s.values().last().copied().flatten().unwrap_or(f64::NAN);
        println!(
            "{universe:<10} {:>8.2} {:>7.1}% {:>8.2} {:>7.1}%",
            last(&pe.values),
            last(&pe.percentile),
            last(&pb.values),
            last(&pb.percentile),
        );
    }

    // 3. Index history with valuation percentiles, filtered to cheap days.
    let index = vs.index_indicator("sh000300", None).await?;
    let cheap = vs.filter_records(
        index.to_records(),
        vec![
            FilterCondition::new("pe_percentile", "lt", 20.0),
            FilterCondition::new("date", "ge", "2019-01-01").with_data_type("date"),
        ],
        "and",
    )?;
    println!("\n{} trading days since 2019 with PE below the 20th percentile", cheap.len());
    if let Some(first) = cheap.first() {
        println!("first: {}", first.get("date").unwrap_or(&Value::Null));
    }

    // 4. A single stock with PE and ROE attached.
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).ok_or("invalid start")?;
    let end = NaiveDate::from_ymd_opt(2020, 3, 31).ok_or("invalid end")?;
    let snapshot = vs.stock_snapshot("600519", start, end).await?;
    println!("\nsnapshot columns: {:?}", snapshot.column_names());
    for record in snapshot.to_records().iter().take(5) {
        let line: Vec<String> = record.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}
