/// STREAM numerical constants and parameter defaults.
///
/// Centralises all fixed values of the model contract. The regime
/// boundaries, conversion factors, and polynomial coefficients must not be
/// altered: they define the reference semantics.

// -- Time and unit conversions --

/// Seconds per simulated month (30 * 24 * 3600); converts the monthly gauge
/// volume to volume per second.
pub const SECONDS_PER_MONTH: f64 = 2_592_000.0;

/// Divisor converting a depth-equivalent [mm] to [m] before multiplying by
/// the cell area, yielding a volume.
pub const DEPTH_TO_VOLUME_DIVISOR: f64 = 1000.0;

/// Neutral daylight duration [h]; a month of 12-hour days leaves the
/// Thornthwaite estimate unscaled.
pub const NEUTRAL_DAYLIGHT_HOURS: f64 = 12.0;

// -- Thornthwaite potential evapotranspiration --

/// Temperature [degC] above which the quadratic high-temperature formula
/// replaces the power-law formula.
pub const HIGH_TEMP_THRESHOLD: f64 = 26.5;

/// Coefficients of the high-temperature quadratic:
/// `PET = HIGH_TEMP_C0 + HIGH_TEMP_C1 * T + HIGH_TEMP_C2 * T^2`.
pub const HIGH_TEMP_C0: f64 = -415.85;
pub const HIGH_TEMP_C1: f64 = 32.24;
pub const HIGH_TEMP_C2: f64 = -0.43;

/// Scale of the mid-temperature power law: `PET = 16 * (10 T / I)^alpha`.
pub const MID_TEMP_SCALE: f64 = 16.0;
pub const MID_TEMP_FACTOR: f64 = 10.0;

/// Monthly heat-index contribution exponent: `(T / 5)^1.514`.
pub const HEAT_INDEX_DIVISOR: f64 = 5.0;
pub const HEAT_INDEX_EXPONENT: f64 = 1.514;

/// Thornthwaite (1948) cubic for the exponent alpha as a function of the
/// annual heat index I.
pub const ALPHA_C0: f64 = 0.49239;
pub const ALPHA_C1: f64 = 1.792e-2;
pub const ALPHA_C2: f64 = -7.717_71e-5;
pub const ALPHA_C3: f64 = 6.75e-7;

// -- Parameter defaults --

/// Temperature [degC] at or below which all precipitation falls as snow.
pub const DEFAULT_SNOW_FALL_THRESHOLD: f64 = 2.0;

/// Temperature [degC] above which the snow pack starts melting.
pub const DEFAULT_SNOW_MELT_THRESHOLD: f64 = 0.0;

/// Degree-month melt factor [mm/degC/month].
pub const DEFAULT_SNOW_MELT_COEFF: f64 = 15.0;

/// Multiplier applied to the crop-factor layer.
pub const DEFAULT_CROPF_COEFF: f64 = 1.5;

/// Multiplier applied to the water-holding-capacity layer.
pub const DEFAULT_WHC_COEFF: f64 = 1.5;

/// Fraction of soil excess routed to groundwater recharge ("TOGW").
pub const DEFAULT_TOGW: f64 = 0.5;

/// Groundwater-to-baseflow release coefficient ("C").
pub const DEFAULT_BASEFLOW_COEFF: f64 = 0.2;

/// Multiplier applied to the auto-derived annual heat index.
pub const DEFAULT_HEAT_COEFF: f64 = 1.0;
