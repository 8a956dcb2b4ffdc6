mod clients;
mod config;
mod dwd;
mod error;
mod stations;
mod transport;
mod tree;
mod types;
mod utils;
mod weather_data;

pub use config::*;
pub use dwd::*;
pub use error::DwdError;

pub use clients::observation_client::*;

pub use types::period::{last_days, last_hours, CalendarWeek, HalfYear, Month, Period, Quarter, Year};
pub use types::quantity::{Quantity, Resolution};
pub use types::series::{ObservationSeries, SourceStation};
pub use types::station::{LatLon, Station};
pub use types::time_point::TimePoint;
pub use types::time_span::TimeSpan;
pub use types::vintage::Vintage;

pub use stations::station_list::{
    distance_km, parse_station_list, select_station, StationChoice, EARTH_RADIUS_KM,
};
pub use transport::http::HttpTransport;
pub use transport::Transport;
pub use tree::{FolderEntry, FolderTree, TREE_FILE_NAME};
pub use weather_data::archive_filter::{
    archives_for_station, filter_by_window, ArchiveFile, FilteredArchives,
};
pub use weather_data::coverage::{classify, CoverageMatrix};
pub use weather_data::data_loader::{
    concat_frames, extract_product_text, load_archive, parse_product_table, EOR_COLUMN,
    STATION_COLUMN, TIMESTAMP_COLUMN,
};
pub use weather_data::height::{
    extrapolate_log_profile, extrapolate_power_law, log_profile, power_law,
};
pub use weather_data::merge::{merge, regular_grid};

pub use stations::error::StationError;
pub use transport::error::TransportError;
pub use tree::error::TreeError;
pub use types::error::TimeSpanError;
pub use weather_data::error::{HeightError, WeatherDataError};
