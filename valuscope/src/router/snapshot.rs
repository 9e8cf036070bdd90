use std::sync::Arc;

use chrono::NaiveDate;
use valuscope_core::{
    AlignedTable, DATE_COLUMN, SeriesSource, Table, ValuationMetric, ValuscopeError,
    fill_with_median, replace_non_finite,
};

use crate::Valuscope;

impl Valuscope {
    /// Stock price history between `start` and `end` with `pe` and `roe` attached.
    ///
    /// `pe` is the valuation series of the default universe matched as-of each
    /// trading day; non-finite values become missing and every gap then takes
    /// the column median. `roe` is matched as-of its reporting date and forward
    /// filled, so rows before the first report stay missing.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start` is after `end`, the first source
    /// failure otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valuscope::stock_snapshot", skip(self))
    )]
    pub async fn stock_snapshot(&self, code: &str, start: NaiveDate, end: NaiveDate) -> Result<Table, ValuscopeError> {
        if start > end {
            return Err(ValuscopeError::InvalidArg(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let code_owned = code.to_string();
        let prices = self.fetch("price_history", |s: Arc<dyn SeriesSource>| {
            let code = code_owned.clone();
            async move { s.price_history(&code, start, end).await }
        });
        let roe = self.fetch("roe", |s: Arc<dyn SeriesSource>| {
            let code = code_owned.clone();
            async move { s.roe(&code).await }
        });
        let (prices, pe, roe) = futures::try_join!(
            prices,
            self.raw_valuation(ValuationMetric::Pe, None),
            roe,
        )?;

        AlignedTable::new(prices, DATE_COLUMN)?
            .join_asof(&pe)?
            .map_values("pe", |v| fill_with_median(&replace_non_finite(v)))?
            .join_asof(&roe.renamed("roe"))?
            .forward_fill("roe")?
            .into_table()
    }
}
