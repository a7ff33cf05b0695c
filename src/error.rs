//! Configuration-error taxonomy.
//!
//! Every fatal error surfaces synchronously: from the terrain/forcing
//! constructors, from `Simulation::new`, or at the start of `simulate`.
//! Nothing inside the monthly loop returns an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Terrain layers or climate grids disagree in shape.
    #[error("{layer} shape {found:?} does not match expected shape {expected:?}")]
    ShapeMismatch {
        layer: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Cell size must be known and strictly positive to convert depths to volumes.
    #[error("cell size ({0}, {1}) is invalid; both dimensions must be strictly positive")]
    InvalidResolution(f64, f64),

    /// Precipitation and temperature series must cover the same months.
    #[error("precipitation series has {precip} months but temperature series has {temp}")]
    ForcingLengthMismatch { precip: usize, temp: usize },

    /// A simulation needs at least one month of forcing.
    #[error("climate forcing is empty")]
    EmptyForcing,

    /// The elevation grid contains no valid (non-no-data) cell.
    #[error("elevation grid contains no valid cells")]
    EmptyDomain,

    /// A calibration parameter is outside its admissible range.
    #[error("parameter {name} = {value} is invalid: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Auto-deriving the annual heat index needs whole calendar years.
    #[error(
        "forcing covers {n_months} months; deriving the annual heat index \
         requires a multiple of 12 (or supply the heat index explicitly)"
    )]
    PartialYear { n_months: usize },

    /// A supplied heat index would divide by zero (or produce non-finite
    /// values) in the mid-temperature evapotranspiration regime.
    #[error("heat index at cell ({row}, {col}) is {value}; it must be finite and strictly positive")]
    InvalidHeatIndex { row: usize, col: usize, value: f64 },

    /// A valid cell has no drainage path to any sink, e.g. because no-data
    /// holes disconnect part of the watershed.
    #[error("cell ({row}, {col}) has no drainage path to any sink")]
    DisconnectedCell { row: usize, col: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_the_layer() {
        let err = ConfigError::ShapeMismatch {
            layer: "crop factor",
            expected: (10, 20),
            found: (9, 20),
        };
        assert!(err.to_string().contains("crop factor"));
        assert!(err.to_string().contains("(9, 20)"));
    }

    #[test]
    fn partial_year_reports_month_count() {
        let err = ConfigError::PartialYear { n_months: 13 };
        assert!(err.to_string().contains("13"));
    }
}
