use std::sync::Arc;

use valuscope_core::{
    DATE_COLUMN, PercentileFrame, SeriesSource, Table, TimeSeries, ValuationMetric, ValuscopeError,
    percentile_pipeline,
};

use crate::Valuscope;

impl Valuscope {
    /// Raw valuation history of a universe, fetched with timeout and retry.
    ///
    /// The series is renamed to the metric column (`pe` / `pb`) whatever name
    /// the source gave it.
    ///
    /// # Errors
    /// Returns the source error, `RetriesExhausted` when every attempt failed.
    pub async fn raw_valuation(
        &self,
        metric: ValuationMetric,
        universe: Option<&str>,
    ) -> Result<TimeSeries, ValuscopeError> {
        let universe = universe.unwrap_or(self.cfg.default_universe.as_str()).to_string();
        let series = self
            .fetch("valuation", |s: Arc<dyn SeriesSource>| {
                let universe = universe.clone();
                async move { s.valuation(metric, &universe).await }
            })
            .await?;
        Ok(series.renamed(metric.column()))
    }

    /// Cleaned valuation history and its rolling percentile rank.
    ///
    /// Runs outlier removal, gap filling, and the rolling percentile with the
    /// configured window, minimum sample count, and sigma.
    ///
    /// # Errors
    /// Returns the source error, `RetriesExhausted` when every attempt failed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valuscope::valuation_frame", skip(self))
    )]
    pub async fn valuation_frame(
        &self,
        metric: ValuationMetric,
        universe: Option<&str>,
    ) -> Result<PercentileFrame, ValuscopeError> {
        let raw = self.raw_valuation(metric, universe).await?;
        percentile_pipeline(&raw, &self.cfg.percentile)
    }

    /// Valuation table of a universe: `date`, `pe` (or `pb`), and its `_percentile` column.
    ///
    /// `None` selects the configured default universe.
    ///
    /// # Errors
    /// Returns the source error, `RetriesExhausted` when every attempt failed.
    pub async fn valuation(
        &self,
        metric: ValuationMetric,
        universe: Option<&str>,
    ) -> Result<Table, ValuscopeError> {
        self.valuation_frame(metric, universe)
            .await?
            .to_table(DATE_COLUMN)
    }

    /// Valuation tables for several universes.
    ///
    /// Runs the universes concurrently and returns `(tables, failures)`, so one
    /// failing universe does not fail the batch.
    pub async fn valuations(
        &self,
        metric: ValuationMetric,
        universes: &[&str],
    ) -> (Vec<(String, Table)>, Vec<(String, ValuscopeError)>) {
        let tasks = universes.iter().map(|u| async move {
            let res = self.valuation(metric, Some(*u)).await;
            ((*u).to_string(), res)
        });
        let results = futures::future::join_all(tasks).await;

        let mut ok = Vec::new();
        let mut failures = Vec::new();
        for (universe, res) in results {
            match res {
                Ok(t) => ok.push((universe, t)),
                Err(e) => failures.push((universe, e)),
            }
        }
        (ok, failures)
    }
}
