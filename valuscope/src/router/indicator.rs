use std::sync::Arc;

use valuscope_core::{
    AlignedTable, DATE_COLUMN, SeriesSource, Table, ValuationMetric, ValuscopeError, backward_fill,
};

use crate::Valuscope;

impl Valuscope {
    /// Index price history with `pe`, `pe_percentile`, `pb`, and `pb_percentile`.
    ///
    /// Prices and both valuation series are fetched concurrently. Each valuation
    /// series goes through the percentile path, then every derived column is
    /// attached to the price calendar by backward as-of match and forward
    /// filled. The `_percentile` columns are then backward filled, so they are
    /// dense; `pe` and `pb` stay missing before the first valuation date.
    ///
    /// # Errors
    /// Returns the first source failure, or `Schema` if the price table has no
    /// `date` column.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valuscope::index_indicator", skip(self))
    )]
    pub async fn index_indicator(&self, code: &str, universe: Option<&str>) -> Result<Table, ValuscopeError> {
        let code_owned = code.to_string();
        let prices = self.fetch("index_history", |s: Arc<dyn SeriesSource>| {
            let code = code_owned.clone();
            async move { s.index_history(&code).await }
        });
        let (prices, pe, pb) = futures::try_join!(
            prices,
            self.valuation_frame(ValuationMetric::Pe, universe),
            self.valuation_frame(ValuationMetric::Pb, universe),
        )?;

        let mut aligned = AlignedTable::new(prices, DATE_COLUMN)?;
        for series in [&pe.values, &pe.percentile, &pb.values, &pb.percentile] {
            aligned = aligned.join_asof(series)?.forward_fill(series.name())?;
        }
        for series in [&pe.percentile, &pb.percentile] {
            aligned = aligned.map_values(series.name(), backward_fill)?;
        }
        aligned.into_table()
    }
}
