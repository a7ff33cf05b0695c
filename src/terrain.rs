//! Static terrain bundle: elevation, crop factor, and water-holding capacity.
//!
//! All three layers share one grid shape, fixed for the lifetime of a
//! simulation. Cells marked no-data in the elevation grid are outside the
//! watershed; the validity mask derived here is honored by every downstream
//! module so that no-data never silently degrades to zero.

use ndarray::Array2;

use crate::error::ConfigError;

/// Default no-data sentinel for the elevation grid.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Replacement value for non-positive water-holding capacities. WHC appears
/// as a divisor in the soil drying branch, so it must stay strictly positive.
pub const DEFAULT_WHC_EPSILON: f64 = 0.01;

/// Immutable terrain and land layers for one watershed.
#[derive(Debug, Clone)]
pub struct Terrain {
    /// Elevation [m]; defines the drainage topology.
    pub elevation: Array2<f64>,
    /// Unitless crop coefficients.
    pub crop_factor: Array2<f64>,
    /// Water-holding capacity [mm]; strictly positive on valid cells.
    pub whc: Array2<f64>,
    /// Ground resolution (cell width, cell height) [m].
    pub cell_size: (f64, f64),
    /// Validity mask: `false` outside the watershed/DEM extent.
    pub mask: Array2<bool>,
}

impl Terrain {
    /// Build a terrain bundle with the default no-data sentinel and WHC epsilon.
    pub fn new(
        elevation: Array2<f64>,
        crop_factor: Array2<f64>,
        whc: Array2<f64>,
        cell_size: (f64, f64),
    ) -> Result<Self, ConfigError> {
        Self::with_nodata(
            elevation,
            crop_factor,
            whc,
            cell_size,
            DEFAULT_NODATA,
            DEFAULT_WHC_EPSILON,
        )
    }

    /// Build a terrain bundle with an explicit no-data sentinel and WHC epsilon.
    ///
    /// NaN elevation cells are treated as no-data regardless of the sentinel.
    pub fn with_nodata(
        elevation: Array2<f64>,
        crop_factor: Array2<f64>,
        mut whc: Array2<f64>,
        cell_size: (f64, f64),
        nodata: f64,
        whc_epsilon: f64,
    ) -> Result<Self, ConfigError> {
        let expected = elevation.dim();
        if crop_factor.dim() != expected {
            return Err(ConfigError::ShapeMismatch {
                layer: "crop factor",
                expected,
                found: crop_factor.dim(),
            });
        }
        if whc.dim() != expected {
            return Err(ConfigError::ShapeMismatch {
                layer: "water-holding capacity",
                expected,
                found: whc.dim(),
            });
        }
        if !(cell_size.0 > 0.0 && cell_size.1 > 0.0) {
            return Err(ConfigError::InvalidResolution(cell_size.0, cell_size.1));
        }

        let mask = elevation.mapv(|e| e.is_finite() && e != nodata);
        if !mask.iter().any(|&v| v) {
            return Err(ConfigError::EmptyDomain);
        }

        // WHC is a divisor in the soil drying branch; clamp at load time.
        whc.mapv_inplace(|w| if w <= 0.0 { whc_epsilon } else { w });

        Ok(Self {
            elevation,
            crop_factor,
            whc,
            cell_size,
            mask,
        })
    }

    pub fn rows(&self) -> usize {
        self.elevation.nrows()
    }

    pub fn cols(&self) -> usize {
        self.elevation.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.elevation.dim()
    }

    /// Area of one cell in the square of the cell-size linear unit.
    pub fn cell_area(&self) -> f64 {
        self.cell_size.0 * self.cell_size.1
    }

    #[inline]
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.mask[[row, col]]
    }
}
