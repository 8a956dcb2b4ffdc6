// demos/wind_near_location.rs
use dwd_opendata::{last_days, Dwd, DwdError, LatLon, Resolution};

fn main() -> Result<(), DwdError> {
    // Set RUST_LOG=info (or debug) to see listings, downloads and fallbacks
    env_logger::init();

    // Potsdam
    let location = LatLon(52.3813, 13.0622);
    let dwd = Dwd::new(location)?;

    let now = chrono::Utc::now().naive_utc();
    let span = last_days(now, 14);
    println!("Fetching 10 minute wind for {} near {:?}", span, location);

    let series = dwd
        .wind()
        .span(span)
        .resolution(Resolution::TenMinutes)
        .call()?;

    for source in &series.sources {
        println!(
            "{:>10}: station {} ({}) {:.1} km away, {} archive(s)",
            source.vintage,
            source.station.id,
            source.station.name,
            source.station.distance_km,
            source.archives.len()
        );
    }

    // Estimate hub height wind with the 1/7 power law
    let hub = series.with_power_law("FF_10", 10.0, 100.0, 1.0 / 7.0)?;
    println!("{}", hub.frame.tail(Some(5)));

    Ok(())
}
