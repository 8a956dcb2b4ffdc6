//! This module provides the main entry point for retrieving DWD station observations
//! around a location: station selection, archive download and the multi-vintage merge.

use crate::clients::observation_client::ObservationClient;
use crate::config::DwdConfig;
use crate::error::DwdError;
use crate::stations::error::StationError;
use crate::stations::station_list::{parse_station_list, select_station, StationChoice};
use crate::transport::http::HttpTransport;
use crate::transport::Transport;
use crate::tree::{FolderTree, TREE_FILE_NAME};
use crate::types::quantity::{product_path, Quantity, Resolution};
use crate::types::series::{ObservationSeries, SourceStation};
use crate::types::station::LatLon;
use crate::types::time_span::TimeSpan;
use crate::types::vintage::Vintage;
use crate::utils::{decode_latin1, ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::archive_filter::{archives_for_station, filter_by_window};
use crate::weather_data::coverage::classify;
use crate::weather_data::data_loader::{concat_frames, load_archive};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::merge::merge;
use bon::bon;
use chrono::{NaiveDateTime, Utc};
use log::info;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::path::PathBuf;

const STATION_LIST_SUFFIX: &str = "Beschreibung_Stationen.txt";
const ARCHIVE_SEPARATOR: char = '_';

/// The main client for DWD open-data observations.
///
/// A client is bound to one reference location; every request picks the station
/// nearest to it (or a requested station id) in each vintage folder it needs.
///
/// Create an instance with [`Dwd::new()`] to use the standard cache directory, or
/// [`Dwd::with_cache_folder()`] / [`Dwd::with_config()`] for more control. Any
/// [`Transport`] can be plugged in with [`Dwd::with_transport()`].
///
/// # Examples
///
/// ```no_run
/// # use dwd_opendata::{Dwd, DwdError, LatLon, Quantity, TimeSpan};
/// # fn run() -> Result<(), DwdError> {
/// let dwd = Dwd::new(LatLon(52.38, 13.06))?;
/// let span = TimeSpan::parse("2019-01-01", "2019-02-01", 'T')?;
/// let series = dwd
///     .observations()
///     .span(span)
///     .quantity(Quantity::Wind)
///     .call()?;
/// println!("{}", series.frame);
/// # Ok(())
/// # }
/// ```
pub struct Dwd<T: Transport = HttpTransport> {
    transport: T,
    config: DwdConfig,
    location: LatLon,
    cache_folder: PathBuf,
}

impl Dwd<HttpTransport> {
    /// Creates a client that caches the folder tree in the standard cache directory
    /// (e.g. `~/.cache/dwd_opendata_cache` on Linux).
    ///
    /// # Errors
    ///
    /// [`DwdError::CacheDirResolution`] if there is no cache directory on this system,
    /// [`DwdError::CacheDirCreation`] if it cannot be created.
    pub fn new(location: LatLon) -> Result<Self, DwdError> {
        let cache_folder = get_cache_dir().map_err(DwdError::CacheDirResolution)?;
        Self::with_cache_folder(location, cache_folder)
    }

    /// Creates a client with the default configuration and a custom cache directory.
    /// The directory is created if it doesn't exist.
    pub fn with_cache_folder(location: LatLon, cache_folder: PathBuf) -> Result<Self, DwdError> {
        Self::with_config(location, cache_folder, DwdConfig::default())
    }

    pub fn with_config(
        location: LatLon,
        cache_folder: PathBuf,
        config: DwdConfig,
    ) -> Result<Self, DwdError> {
        let transport = HttpTransport::new(&config.server_url, config.http_timeout)?;
        Dwd::with_transport(transport, location, cache_folder, config)
    }
}

#[bon]
impl<T: Transport> Dwd<T> {
    pub fn with_transport(
        transport: T,
        location: LatLon,
        cache_folder: PathBuf,
        config: DwdConfig,
    ) -> Result<Self, DwdError> {
        ensure_cache_dir_exists(&cache_folder)
            .map_err(|e| DwdError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            transport,
            config,
            location,
            cache_folder,
        })
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn config(&self) -> &DwdConfig {
        &self.config
    }

    /// Wind observations (`FF_10`, `DD_10` at 10 minute resolution).
    pub fn wind(&self) -> ObservationClient<'_, T> {
        ObservationClient::new(self, Quantity::Wind)
    }

    /// Radiation and sunshine observations.
    pub fn solar(&self) -> ObservationClient<'_, T> {
        ObservationClient::new(self, Quantity::Solar)
    }

    /// Air temperature, humidity and pressure observations.
    pub fn temperature(&self) -> ObservationClient<'_, T> {
        ObservationClient::new(self, Quantity::AirTemperature)
    }

    pub fn precipitation(&self) -> ObservationClient<'_, T> {
        ObservationClient::new(self, Quantity::Precipitation)
    }

    /// The folder tree, rebuilt from the server when the cache file is missing or stale.
    pub fn folder_tree(&self) -> Result<FolderTree, DwdError> {
        Ok(FolderTree::load_or_build(
            &self.transport,
            &self.cache_folder.join(TREE_FILE_NAME),
            &self.config.tree_page_path,
            &self.config.server_url,
            self.config.tree_max_age,
        )?)
    }

    /// Fetches and merges the observations of `quantity` for `span`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.span(TimeSpan)`: **Required.** The half-open window to retrieve.
    /// * `.quantity(Quantity)`: **Required.** The product to retrieve.
    /// * `.resolution(Resolution)`: Optional. Defaults to [`Resolution::TenMinutes`].
    /// * `.station_id(&str)`: Optional. Station to use instead of the nearest one. If a
    ///   vintage does not list it, the nearest station of that vintage is used and the
    ///   fallback is recorded on the returned [`SourceStation`].
    /// * `.now(NaiveDateTime)`: Optional. Reference time for vintage classification.
    ///   Defaults to the current UTC time.
    ///
    /// # Errors
    ///
    /// * [`DwdError::WeatherData`] with [`WeatherDataError::EmptySpan`] for an empty span,
    ///   before anything is downloaded.
    /// * [`DwdError::Tree`] if the product folder is not in the folder tree.
    /// * [`DwdError::NoVintageCoversSpan`] if no vintage window touches the span.
    /// * [`DwdError::Transport`] for any failed listing or download.
    /// * [`DwdError::Station`] if a vintage lists no stations.
    #[builder]
    pub fn observations(
        &self,
        span: TimeSpan,
        quantity: Quantity,
        #[builder(default)] resolution: Resolution,
        station_id: Option<&str>,
        now: Option<NaiveDateTime>,
    ) -> Result<ObservationSeries, DwdError> {
        if span.is_empty() {
            return Err(WeatherDataError::EmptySpan(span.to_string()).into());
        }
        let product = format!(
            "{}{}",
            self.config.climate_base_path,
            product_path(resolution, quantity)
        );
        let tree = self.folder_tree()?;
        let folder = tree.product_folder(&product)?.path.clone();

        let available = self.transport.list(&folder)?;
        let now = now.unwrap_or_else(|| Utc::now().naive_utc());
        let vintages = classify(&available, &span, now).selected();
        if vintages.is_empty() {
            return Err(DwdError::NoVintageCoversSpan {
                folder,
                span: span.to_string(),
            });
        }
        info!(
            "Retrieving {} {} for {} from vintages {:?}",
            resolution, quantity, span, vintages
        );

        let mut frames = BTreeMap::new();
        let mut sources = Vec::with_capacity(vintages.len());
        for vintage in vintages {
            let (frame, source) = self.load_vintage(&folder, vintage, &span, station_id)?;
            if let Some(frame) = frame {
                frames.insert(vintage, frame);
            }
            sources.push(source);
        }

        let frame = merge(frames, &span, resolution.step_minutes())?;
        Ok(ObservationSeries::new(frame, sources))
    }

    fn load_vintage(
        &self,
        product_folder: &str,
        vintage: Vintage,
        span: &TimeSpan,
        station_id: Option<&str>,
    ) -> Result<(Option<DataFrame>, SourceStation), DwdError> {
        let folder = format!("{}{}/", product_folder, vintage.folder_name());
        let listing = self.transport.list(&folder)?;

        let station_list = listing
            .iter()
            .find(|name| name.ends_with(STATION_LIST_SUFFIX))
            .ok_or_else(|| StationError::MissingStationList(folder.clone()))?;
        let raw = self.transport.fetch(&format!("{folder}{station_list}"))?;
        let stations = parse_station_list(&decode_latin1(&raw), self.location);
        let choice = select_station(&stations, station_id, &folder)?;
        let requested_id_missing = match &choice {
            StationChoice::NearestFallback { requested, .. } => Some(requested.clone()),
            _ => None,
        };
        let station = choice.into_station();

        let archives = archives_for_station(&listing, &station.id);
        if archives.is_empty() {
            return Err(WeatherDataError::NoArchives {
                station: station.id,
                folder,
            }
            .into());
        }
        let (archives, fell_back) = if vintage == Vintage::Historical {
            let filtered = filter_by_window(&archives, span, ARCHIVE_SEPARATOR);
            (filtered.files, filtered.fell_back)
        } else {
            (archives, false)
        };

        let mut frames = Vec::with_capacity(archives.len());
        for archive in &archives {
            let bytes = self.transport.fetch(&format!("{folder}{archive}"))?;
            frames.push(load_archive(archive, &bytes)?);
        }
        let frame = concat_frames(frames)?;

        Ok((
            frame,
            SourceStation {
                vintage,
                station,
                requested_id_missing,
                archives,
                archive_filter_fell_back: fell_back,
            },
        ))
    }
}
