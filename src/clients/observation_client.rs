//! Provides the `ObservationClient`, a per-quantity shortcut obtained via
//! [`Dwd::wind()`], [`Dwd::solar()`], [`Dwd::temperature()`] or [`Dwd::precipitation()`].

use crate::transport::http::HttpTransport;
use crate::transport::Transport;
use crate::types::period::Period;
use crate::{Dwd, DwdError, ObservationSeries, Quantity, Resolution, TimeSpan};
use bon::bon;
use chrono::NaiveDateTime;

/// A request builder bound to one [`Quantity`].
///
/// Calling `.span(..)` or `.period(..)` starts the request; finish it with `.call()`.
pub struct ObservationClient<'a, T: Transport = HttpTransport> {
    client: &'a Dwd<T>,
    quantity: Quantity,
}

#[bon]
impl<'a, T: Transport> ObservationClient<'a, T> {
    pub(crate) fn new(client: &'a Dwd<T>, quantity: Quantity) -> Self {
        Self { client, quantity }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Fetches the merged series for `span`.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.resolution(Resolution)`: defaults to [`Resolution::TenMinutes`].
    /// * `.station_id(&str)`: use this station where it is listed instead of the nearest.
    /// * `.now(NaiveDateTime)`: reference time for vintage classification.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use dwd_opendata::{Dwd, DwdError, LatLon, Resolution, TimeSpan};
    /// # fn main() -> Result<(), DwdError> {
    /// let dwd = Dwd::new(LatLon(53.55, 9.99))?;
    /// let span = TimeSpan::parse("2020-03-01", "2020-03-08", 'T')?;
    /// let hourly = dwd
    ///     .wind()
    ///     .span(span)
    ///     .resolution(Resolution::Hourly)
    ///     .call()?;
    /// println!("{}", hourly.frame);
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = span)]
    #[doc(hidden)]
    pub fn build_span(
        &self,
        #[builder(start_fn)] span: TimeSpan,
        resolution: Option<Resolution>,
        station_id: Option<&str>,
        now: Option<NaiveDateTime>,
    ) -> Result<ObservationSeries, DwdError> {
        self.client
            .observations()
            .span(span)
            .quantity(self.quantity)
            .maybe_resolution(resolution)
            .maybe_station_id(station_id)
            .maybe_now(now)
            .call()
    }

    /// Fetches the merged series for a calendar period such as `Month(2019, 3)`.
    ///
    /// Takes the same optional builder methods as `.span(..)`.
    #[builder(start_fn = period)]
    #[doc(hidden)]
    pub fn build_period<P: Period>(
        &self,
        #[builder(start_fn)] period: P,
        resolution: Option<Resolution>,
        station_id: Option<&str>,
        now: Option<NaiveDateTime>,
    ) -> Result<ObservationSeries, DwdError> {
        self.span(period.span()?)
            .maybe_resolution(resolution)
            .maybe_station_id(station_id)
            .maybe_now(now)
            .call()
    }
}
