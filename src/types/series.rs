//! Contains the `ObservationSeries` returned by [`crate::Dwd::observations`].

use crate::error::DwdError;
use crate::types::station::Station;
use crate::types::time_span::TimeSpan;
use crate::types::vintage::Vintage;
use crate::weather_data::data_loader::TIMESTAMP_COLUMN;
use crate::weather_data::height::{extrapolate_log_profile, extrapolate_power_law};
use polars::prelude::{col, lit, DataFrame, DataType, Expr, IntoLazy};

/// Where one vintage of a merged series came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStation {
    pub vintage: Vintage,
    pub station: Station,
    /// The station id that was asked for but not listed in this vintage, if any.
    pub requested_id_missing: Option<String>,
    /// Archive names that were downloaded for this vintage.
    pub archives: Vec<String>,
    /// No historical archive advertised the requested span, so all were downloaded.
    pub archive_filter_fell_back: bool,
}

/// A merged, regularly spaced observation series.
///
/// `frame` is keyed by `MESS_DATUM` (`Datetime[ms]`, UTC), strictly increasing and
/// covering every grid step of the requested span; steps without a sample are null rows.
/// Measurement columns keep their DWD names (`FF_10`, `DD_10`, `GS_10`, ...).
#[derive(Debug, Clone)]
pub struct ObservationSeries {
    pub frame: DataFrame,
    pub sources: Vec<SourceStation>,
}

impl ObservationSeries {
    pub fn new(frame: DataFrame, sources: Vec<SourceStation>) -> Self {
        Self { frame, sources }
    }

    /// Source of the most recent vintage.
    pub fn latest_source(&self) -> Option<&SourceStation> {
        self.sources.iter().max_by_key(|s| s.vintage)
    }

    /// Applies a polars predicate, keeping the sources.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use dwd_opendata::ObservationSeries;
    /// use polars::prelude::{col, lit};
    /// # fn calm(series: &ObservationSeries) -> Result<(), dwd_opendata::DwdError> {
    /// let calm = series.filter(col("FF_10").lt(lit(1.0)))?;
    /// println!("{}", calm.frame);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> Result<ObservationSeries, DwdError> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(predicate)
            .collect()
            .map_err(crate::WeatherDataError::from)?;
        Ok(Self::new(frame, self.sources.clone()))
    }

    /// Rows with `span.start <= MESS_DATUM < span.end`.
    pub fn get_range(&self, span: &TimeSpan) -> Result<ObservationSeries, DwdError> {
        let ts = || col(TIMESTAMP_COLUMN).cast(DataType::Int64);
        self.filter(
            ts().gt_eq(lit(span.start().and_utc().timestamp_millis()))
                .and(ts().lt(lit(span.end().and_utc().timestamp_millis()))),
        )
    }

    /// Adds `{column}_{h2}m` using the power law, see [`crate::power_law`].
    pub fn with_power_law(
        &self,
        column: &str,
        h1: f64,
        h2: f64,
        alpha: f64,
    ) -> Result<ObservationSeries, DwdError> {
        let frame = extrapolate_power_law(&self.frame, column, h1, h2, alpha)?;
        Ok(Self::new(frame, self.sources.clone()))
    }

    /// Adds `{column}_{h2}m` using the logarithmic profile, see [`crate::log_profile`].
    pub fn with_log_profile(
        &self,
        column: &str,
        h1: f64,
        h2: f64,
        z0: f64,
    ) -> Result<ObservationSeries, DwdError> {
        let frame = extrapolate_log_profile(&self.frame, column, h1, h2, z0)?;
        Ok(Self::new(frame, self.sources.clone()))
    }
}
