//! Climate forcing: monthly precipitation and temperature grid series.
//!
//! The two series must cover the same months and share one grid shape.
//! Shape agreement with the terrain bundle is verified at `Simulation::new`.

use ndarray::Array2;

use crate::error::ConfigError;

/// Monthly climate inputs, one grid per month per variable.
///
/// Precipitation is depth-equivalent [mm/month]; temperature is a single
/// representative monthly value per pixel [degC].
#[derive(Debug, Clone)]
pub struct ClimateForcing {
    pub precip: Vec<Array2<f64>>,
    pub temp: Vec<Array2<f64>>,
}

impl ClimateForcing {
    pub fn new(precip: Vec<Array2<f64>>, temp: Vec<Array2<f64>>) -> Result<Self, ConfigError> {
        if precip.len() != temp.len() {
            return Err(ConfigError::ForcingLengthMismatch {
                precip: precip.len(),
                temp: temp.len(),
            });
        }
        if precip.is_empty() {
            return Err(ConfigError::EmptyForcing);
        }

        let expected = precip[0].dim();
        for grid in &precip {
            if grid.dim() != expected {
                return Err(ConfigError::ShapeMismatch {
                    layer: "precipitation",
                    expected,
                    found: grid.dim(),
                });
            }
        }
        for grid in &temp {
            if grid.dim() != expected {
                return Err(ConfigError::ShapeMismatch {
                    layer: "temperature",
                    expected,
                    found: grid.dim(),
                });
            }
        }

        Ok(Self { precip, temp })
    }

    /// Number of simulated months.
    pub fn n_months(&self) -> usize {
        self.precip.len()
    }

    /// Grid shape shared by every month.
    pub fn shape(&self) -> (usize, usize) {
        self.precip[0].dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(n: usize, rows: usize, cols: usize) -> Vec<Array2<f64>> {
        (0..n).map(|_| Array2::zeros((rows, cols))).collect()
    }

    #[test]
    fn valid_forcing() {
        let f = ClimateForcing::new(grids(12, 3, 3), grids(12, 3, 3)).unwrap();
        assert_eq!(f.n_months(), 12);
        assert_eq!(f.shape(), (3, 3));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = ClimateForcing::new(grids(12, 3, 3), grids(11, 3, 3)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ForcingLengthMismatch { precip: 12, temp: 11 }
        ));
    }

    #[test]
    fn rejects_empty_series() {
        let err = ClimateForcing::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyForcing));
    }

    #[test]
    fn rejects_ragged_grids() {
        let mut precip = grids(3, 3, 3);
        precip[2] = Array2::zeros((3, 4));
        let err = ClimateForcing::new(precip, grids(3, 3, 3)).unwrap_err();
        assert!(matches!(err, ConfigError::ShapeMismatch { layer: "precipitation", .. }));

        let mut temp = grids(3, 3, 3);
        temp[1] = Array2::zeros((2, 3));
        let err = ClimateForcing::new(grids(3, 3, 3), temp).unwrap_err();
        assert!(matches!(err, ConfigError::ShapeMismatch { layer: "temperature", .. }));
    }
}
