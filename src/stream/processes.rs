/// STREAM core process functions.
///
/// Pure per-cell functions implementing the monthly water-balance equations.
/// All inputs and outputs are f64; grid iteration lives in `run`.
use super::constants::{
    HIGH_TEMP_C0, HIGH_TEMP_C1, HIGH_TEMP_C2, HIGH_TEMP_THRESHOLD, MID_TEMP_FACTOR,
    MID_TEMP_SCALE,
};

/// Precipitation falling as snow: all of it at or below the threshold,
/// none above.
pub fn snowfall(precip: f64, temp: f64, snow_fall_threshold: f64) -> f64 {
    if temp > snow_fall_threshold {
        0.0
    } else {
        precip
    }
}

/// Degree-month potential melt, zero below the melt threshold.
pub fn potential_melt(temp: f64, snow_melt_threshold: f64, snow_melt_coeff: f64) -> f64 {
    if temp < snow_melt_threshold {
        0.0
    } else {
        snow_melt_coeff * (temp - snow_melt_threshold)
    }
}

/// One snow-pack update: partition precipitation, accumulate, melt.
///
/// Melt is capped by the accumulated pack, so the pack can never go
/// negative. Returns (liquid_precip, snow_pack_next, melt):
/// - liquid_precip: rain plus melt water reaching the soil [mm/month]
/// - snow_pack_next: pack carried to the next month [mm]
/// - melt: water released from the pack [mm/month]
pub fn snow_balance(
    precip: f64,
    temp: f64,
    snow_pack: f64,
    snow_fall_threshold: f64,
    snow_melt_threshold: f64,
    snow_melt_coeff: f64,
) -> (f64, f64, f64) {
    let snowfall = snowfall(precip, temp, snow_fall_threshold);
    let accumulated = snow_pack + snowfall;
    let melt = potential_melt(temp, snow_melt_threshold, snow_melt_coeff).min(accumulated);
    let liquid_precip = precip - snowfall + melt;
    (liquid_precip, accumulated - melt, melt)
}

/// Thornthwaite potential evapotranspiration [mm/month], unscaled.
///
/// Three temperature regimes, half-open so every temperature falls in
/// exactly one:
/// - `T >= 26.5`: quadratic high-temperature formula
/// - `0 < T < 26.5`: power law `16 * (10 T / I)^alpha`
/// - `T <= 0`: zero
///
/// The caller scales the result by crop factor and daylight hours, and
/// guarantees `heat_index > 0` wherever the mid regime can apply.
pub fn thornthwaite_pet(temp: f64, heat_index: f64, alpha: f64) -> f64 {
    if temp >= HIGH_TEMP_THRESHOLD {
        HIGH_TEMP_C0 + HIGH_TEMP_C1 * temp + HIGH_TEMP_C2 * temp * temp
    } else if temp > 0.0 {
        MID_TEMP_SCALE * (MID_TEMP_FACTOR * temp / heat_index).powf(alpha)
    } else {
        0.0
    }
}

/// Thornthwaite-Mather soil-moisture accounting for one cell.
///
/// Returns (excess, available_water_next). The drying regime
/// (`effective_precip <= 0`) takes precedence over the wetting cases: the
/// soil then releases water as exponential decay rather than absorbing it
/// linearly, which keeps the store within `[0, whc]` under any deficit.
pub fn soil_balance(
    liquid_precip: f64,
    potential_et: f64,
    available_water: f64,
    whc: f64,
) -> (f64, f64) {
    let effective_precip = liquid_precip - potential_et;
    if effective_precip <= 0.0 {
        (0.0, available_water * (effective_precip / whc).exp())
    } else if available_water + effective_precip <= whc {
        (0.0, available_water + effective_precip)
    } else {
        (available_water + effective_precip - whc, whc)
    }
}

/// Split soil excess into direct runoff and groundwater recharge, release
/// base flow, and return the cell's total outflow depth.
///
/// Returns (outflow_depth, ground_water_next):
/// - outflow_depth: runoff + base flow [mm/month]
/// - ground_water_next: storage carried to the next month [mm]
pub fn flow_separation(excess: f64, ground_water: f64, togw: f64, c: f64) -> (f64, f64) {
    let runoff = (1.0 - togw) * excess;
    let recharge = excess - runoff;
    let storage = ground_water + recharge;
    let base_flow = storage * c;
    (runoff + base_flow, storage - base_flow)
}
