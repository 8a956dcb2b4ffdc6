//! Wind speed height extrapolation.
//!
//! Stations measure wind at their mast height (often 10 m); these transforms estimate
//! the speed at another height, e.g. a turbine hub.

use crate::weather_data::error::HeightError;
use polars::prelude::*;

fn check_height(h: f64) -> Result<(), HeightError> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(HeightError::Height(h))
    }
}

fn power_law_factor(h1: f64, h2: f64, alpha: f64) -> Result<f64, HeightError> {
    check_height(h1)?;
    check_height(h2)?;
    if !alpha.is_finite() {
        return Err(HeightError::Exponent(alpha));
    }
    Ok((h2 / h1).powf(alpha))
}

fn log_profile_factor(h1: f64, h2: f64, z0: f64) -> Result<f64, HeightError> {
    check_height(h1)?;
    check_height(h2)?;
    if !(z0.is_finite() && z0 > 0.0 && h1 > z0 && h2 > z0) {
        return Err(HeightError::Roughness { z0, h1, h2 });
    }
    Ok((h2 / z0).ln() / (h1 / z0).ln())
}

/// Hellmann power law: `v2 = v1 * (h2 / h1)^alpha`.
///
/// ```
/// let v = dwd_opendata::power_law(5.0, 10.0, 100.0, 1.0 / 7.0).unwrap();
/// assert!((v - 6.947).abs() < 1e-3);
/// ```
pub fn power_law(v1: f64, h1: f64, h2: f64, alpha: f64) -> Result<f64, HeightError> {
    Ok(v1 * power_law_factor(h1, h2, alpha)?)
}

/// Logarithmic wind profile: `v2 = v1 * ln(h2 / z0) / ln(h1 / z0)`.
///
/// Both heights must lie above the roughness length `z0`.
pub fn log_profile(v1: f64, h1: f64, h2: f64, z0: f64) -> Result<f64, HeightError> {
    Ok(v1 * log_profile_factor(h1, h2, z0)?)
}

fn scaled_column(
    df: &DataFrame,
    column: &str,
    h2: f64,
    factor: f64,
) -> Result<DataFrame, HeightError> {
    if df.get_column_index(column).is_none() {
        return Err(HeightError::MissingColumn(column.to_string()));
    }
    let label = format!("{column}_{h2}m");
    let out = df
        .clone()
        .lazy()
        .with_column((col(column).cast(DataType::Float64) * lit(factor)).alias(label))
        .collect()?;
    Ok(out)
}

/// Adds `{column}_{h2}m` holding [`power_law`] applied to every value of `column`.
pub fn extrapolate_power_law(
    df: &DataFrame,
    column: &str,
    h1: f64,
    h2: f64,
    alpha: f64,
) -> Result<DataFrame, HeightError> {
    scaled_column(df, column, h2, power_law_factor(h1, h2, alpha)?)
}

/// Adds `{column}_{h2}m` holding [`log_profile`] applied to every value of `column`.
pub fn extrapolate_log_profile(
    df: &DataFrame,
    column: &str,
    h1: f64,
    h2: f64,
    z0: f64,
) -> Result<DataFrame, HeightError> {
    scaled_column(df, column, h2, log_profile_factor(h1, h2, z0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_height_is_identity() {
        assert_eq!(power_law(4.2, 10.0, 10.0, 0.3).unwrap(), 4.2);
        assert_eq!(log_profile(4.2, 10.0, 10.0, 0.1).unwrap(), 4.2);
    }

    #[test]
    fn log_profile_grows_with_height() {
        let v = log_profile(5.0, 10.0, 100.0, 0.03).unwrap();
        let expected = 5.0 * (100.0f64 / 0.03).ln() / (10.0f64 / 0.03).ln();
        assert!((v - expected).abs() < 1e-12);
        assert!(v > 5.0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            power_law(1.0, 0.0, 10.0, 0.2),
            Err(HeightError::Height(_))
        ));
        assert!(matches!(
            power_law(1.0, 10.0, 80.0, f64::NAN),
            Err(HeightError::Exponent(_))
        ));
        assert!(matches!(
            log_profile(1.0, 10.0, 80.0, 10.0),
            Err(HeightError::Roughness { .. })
        ));
        assert!(matches!(
            log_profile(1.0, 10.0, 80.0, -1.0),
            Err(HeightError::Roughness { .. })
        ));
    }

    #[test]
    fn frame_transforms_add_labelled_column() {
        let df = df!(
            "FF_10" => [Some(2.0), None, Some(4.0)],
        )
        .unwrap();
        let out = extrapolate_power_law(&df, "FF_10", 10.0, 80.0, 0.0).unwrap();
        let scaled: Vec<Option<f64>> = out
            .column("FF_10_80m")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(scaled, vec![Some(2.0), None, Some(4.0)]);

        let out = extrapolate_log_profile(&df, "FF_10", 10.0, 100.5, 0.1).unwrap();
        assert!(out.column("FF_10_100.5m").is_ok());

        assert!(matches!(
            extrapolate_power_law(&df, "DD_10", 10.0, 80.0, 0.2),
            Err(HeightError::MissingColumn(_))
        ));
    }
}
