pub mod error;
pub mod period;
pub mod quantity;
pub mod series;
pub mod station;
pub mod time_point;
pub mod time_span;
pub mod vintage;
