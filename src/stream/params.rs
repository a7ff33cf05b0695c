/// STREAM calibration parameters.
///
/// Scalar, read-only for a run. All fields carry documented defaults and may
/// be overridden before constructing a `Simulation`, which validates them.
///
/// Snowfall partitioning and melt are gated by two separate thresholds
/// (`snow_fall_threshold`, `snow_melt_threshold`); the reference calibration
/// drives both from the mean monthly temperature and uses the subtractive
/// melt form `snow_melt_coeff * (T - snow_melt_threshold)`.
use super::constants::{
    DEFAULT_BASEFLOW_COEFF, DEFAULT_CROPF_COEFF, DEFAULT_HEAT_COEFF, DEFAULT_SNOW_FALL_THRESHOLD,
    DEFAULT_SNOW_MELT_COEFF, DEFAULT_SNOW_MELT_THRESHOLD, DEFAULT_TOGW, DEFAULT_WHC_COEFF,
};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    /// Temperature [degC] at or below which all precipitation is snow.
    pub snow_fall_threshold: f64,
    /// Temperature [degC] above which the snow pack melts.
    pub snow_melt_threshold: f64,
    /// Degree-month melt factor [mm/degC/month].
    pub snow_melt_coeff: f64,
    /// Multiplier on the crop-factor layer.
    pub cropf_coeff: f64,
    /// Multiplier on the water-holding-capacity layer.
    pub whc_coeff: f64,
    /// Fraction of soil excess recharging groundwater; the remaining
    /// `1 - togw` becomes direct runoff.
    pub togw: f64,
    /// Groundwater-to-baseflow release coefficient.
    pub c: f64,
    /// Multiplier on the auto-derived annual heat index.
    pub heat_coeff: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            snow_fall_threshold: DEFAULT_SNOW_FALL_THRESHOLD,
            snow_melt_threshold: DEFAULT_SNOW_MELT_THRESHOLD,
            snow_melt_coeff: DEFAULT_SNOW_MELT_COEFF,
            cropf_coeff: DEFAULT_CROPF_COEFF,
            whc_coeff: DEFAULT_WHC_COEFF,
            togw: DEFAULT_TOGW,
            c: DEFAULT_BASEFLOW_COEFF,
            heat_coeff: DEFAULT_HEAT_COEFF,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(
            name: &'static str,
            value: f64,
            ok: bool,
            reason: &'static str,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter { name, value, reason })
            }
        }

        check(
            "snow_fall_threshold",
            self.snow_fall_threshold,
            self.snow_fall_threshold.is_finite(),
            "must be finite",
        )?;
        check(
            "snow_melt_threshold",
            self.snow_melt_threshold,
            self.snow_melt_threshold.is_finite(),
            "must be finite",
        )?;
        check(
            "snow_melt_coeff",
            self.snow_melt_coeff,
            self.snow_melt_coeff.is_finite() && self.snow_melt_coeff >= 0.0,
            "must be non-negative",
        )?;
        check(
            "cropf_coeff",
            self.cropf_coeff,
            self.cropf_coeff.is_finite() && self.cropf_coeff >= 0.0,
            "must be non-negative",
        )?;
        check(
            "whc_coeff",
            self.whc_coeff,
            self.whc_coeff.is_finite() && self.whc_coeff > 0.0,
            "must be strictly positive",
        )?;
        check(
            "togw",
            self.togw,
            (0.0..=1.0).contains(&self.togw),
            "must be within [0, 1]",
        )?;
        check(
            "c",
            self.c,
            (0.0..=1.0).contains(&self.c),
            "must be within [0, 1]",
        )?;
        check(
            "heat_coeff",
            self.heat_coeff,
            self.heat_coeff.is_finite() && self.heat_coeff > 0.0,
            "must be strictly positive",
        )?;
        Ok(())
    }
}
