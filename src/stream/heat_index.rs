/// Thornthwaite annual heat index and alpha exponent.
///
/// Derived once per 12-month block from that block's temperature grids and
/// held constant within the block. Both quantities are per-pixel grids.
use ndarray::{Array2, Zip};

use super::constants::{
    ALPHA_C0, ALPHA_C1, ALPHA_C2, ALPHA_C3, HEAT_INDEX_DIVISOR, HEAT_INDEX_EXPONENT,
};
use crate::error::ConfigError;

/// Contribution of one month to the annual heat index.
///
/// Months at or below freezing contribute nothing (the fractional power is
/// undefined for negative temperatures).
#[inline]
pub fn monthly_contribution(temp: f64) -> f64 {
    if temp > 0.0 {
        (temp / HEAT_INDEX_DIVISOR).powf(HEAT_INDEX_EXPONENT)
    } else {
        0.0
    }
}

/// Thornthwaite (1948) cubic for the exponent alpha.
#[inline]
pub fn alpha(heat_index: f64) -> f64 {
    ALPHA_C0
        + ALPHA_C1 * heat_index
        + ALPHA_C2 * heat_index * heat_index
        + ALPHA_C3 * heat_index * heat_index * heat_index
}

/// Per-pixel annual heat index from 12 monthly temperature grids, scaled by
/// `heat_coeff`. No-data cells stay NaN.
pub fn annual_heat_index(
    monthly_temps: &[Array2<f64>],
    heat_coeff: f64,
    mask: &Array2<bool>,
) -> Array2<f64> {
    debug_assert_eq!(monthly_temps.len(), 12, "a heat-index block is 12 months");

    let mut heat = mask.mapv(|valid| if valid { 0.0 } else { f64::NAN });
    for temp in monthly_temps {
        Zip::from(&mut heat).and(temp).and(mask).for_each(|h, &t, &valid| {
            if valid {
                *h += monthly_contribution(t);
            }
        });
    }
    heat.mapv_inplace(|h| h * heat_coeff);
    heat
}

/// Per-pixel alpha grid from a heat-index grid. No-data cells stay NaN.
pub fn alpha_grid(heat_index: &Array2<f64>, mask: &Array2<bool>) -> Array2<f64> {
    let mut out = Array2::from_elem(heat_index.raw_dim(), f64::NAN);
    Zip::from(&mut out)
        .and(heat_index)
        .and(mask)
        .for_each(|a, &h, &valid| {
            if valid {
                *a = alpha(h);
            }
        });
    out
}

/// Eagerly reject a supplied heat index that would divide by zero (or
/// produce non-finite values) in the mid-temperature PET regime.
pub fn validate(heat_index: &Array2<f64>, mask: &Array2<bool>) -> Result<(), ConfigError> {
    for ((row, col), &h) in heat_index.indexed_iter() {
        if mask[[row, col]] && !(h.is_finite() && h > 0.0) {
            return Err(ConfigError::InvalidHeatIndex { row, col, value: h });
        }
    }
    Ok(())
}
