/// STREAM simulation driver.
///
/// Orchestrates the monthly loop: snow, potential evapotranspiration, soil
/// moisture, flow separation, then flow accumulation along the drainage
/// network, recording one gauge-flow value per month.
use log::{debug, info};
use ndarray::{Array2, Zip};

use super::constants::{
    DEPTH_TO_VOLUME_DIVISOR, NEUTRAL_DAYLIGHT_HOURS, SECONDS_PER_MONTH,
};
use super::heat_index;
use super::params::Parameters;
use super::processes;
use super::state::State;
use crate::error::ConfigError;
use crate::forcing::ClimateForcing;
use crate::network::DrainageNetwork;
use crate::terrain::Terrain;

/// A ready-to-run simulation: validated inputs, built drainage network,
/// fresh zeroed state.
///
/// `simulate` consumes the value, so a finished run can never be restarted
/// with stale state; construct a new `Simulation` for every run.
#[derive(Debug)]
pub struct Simulation {
    terrain: Terrain,
    forcing: ClimateForcing,
    params: Parameters,
    network: DrainageNetwork,
    state: State,
    daylight_hours: Vec<f64>,
}

/// Results of a completed run: the gauge-flow series [m^3/s] and the final
/// state grids for diagnostics.
#[derive(Debug)]
pub struct SimulationOutput {
    pub gauge_flow: Vec<f64>,
    pub state: State,
}

impl Simulation {
    /// Validate the input bundles, build the drainage network, and zero the
    /// state grids. Every configuration error surfaces here or at the start
    /// of `simulate`, never mid-run.
    pub fn new(
        terrain: Terrain,
        forcing: ClimateForcing,
        params: Parameters,
    ) -> Result<Self, ConfigError> {
        params.validate()?;

        if forcing.shape() != terrain.shape() {
            return Err(ConfigError::ShapeMismatch {
                layer: "climate forcing",
                expected: terrain.shape(),
                found: forcing.shape(),
            });
        }

        let network = DrainageNetwork::build(&terrain)?;
        let state = State::initialize(&terrain.mask);

        Ok(Self {
            terrain,
            forcing,
            params,
            network,
            state,
            daylight_hours: vec![NEUTRAL_DAYLIGHT_HOURS],
        })
    }

    /// Provide a monthly daylight-hours sequence. It is cycled if shorter
    /// than the run; an empty sequence falls back to 12 h for every month.
    pub fn with_daylight_hours(mut self, hours: Vec<f64>) -> Self {
        if !hours.is_empty() {
            self.daylight_hours = hours;
        }
        self
    }

    /// Run the monthly loop and return the gauge-flow series [m^3/s].
    ///
    /// With a supplied `heat_index` (and optional `alpha`, derived from the
    /// heat index when absent), the same pair is used for every month.
    /// Without one, a heat-index/alpha pair is derived per 12-month block
    /// from that block's temperatures, which requires the forcing length to
    /// be a multiple of 12. `alpha` is only honored together with
    /// `heat_index`.
    pub fn simulate(
        mut self,
        heat_index: Option<Array2<f64>>,
        alpha: Option<Array2<f64>>,
    ) -> Result<SimulationOutput, ConfigError> {
        let n_months = self.forcing.n_months();
        let shape = self.terrain.shape();
        info!(
            "simulating {} months over a {}x{} grid",
            n_months, shape.0, shape.1
        );

        // Effective WHC is constant for the whole run.
        let whc_eff = &self.terrain.whc * self.params.whc_coeff;

        let mut gauge_flow = Vec::with_capacity(n_months);
        match heat_index {
            Some(heat) => {
                if heat.dim() != shape {
                    return Err(ConfigError::ShapeMismatch {
                        layer: "heat index",
                        expected: shape,
                        found: heat.dim(),
                    });
                }
                heat_index::validate(&heat, &self.terrain.mask)?;

                let alpha = match alpha {
                    Some(a) => {
                        if a.dim() != shape {
                            return Err(ConfigError::ShapeMismatch {
                                layer: "alpha",
                                expected: shape,
                                found: a.dim(),
                            });
                        }
                        a
                    }
                    None => heat_index::alpha_grid(&heat, &self.terrain.mask),
                };

                for month in 0..n_months {
                    gauge_flow.push(self.step(month, &whc_eff, &heat, &alpha));
                }
            }
            None => {
                if n_months % 12 != 0 {
                    return Err(ConfigError::PartialYear { n_months });
                }

                for year in 0..n_months / 12 {
                    let block = year * 12..(year + 1) * 12;
                    let heat = heat_index::annual_heat_index(
                        &self.forcing.temp[block.clone()],
                        self.params.heat_coeff,
                        &self.terrain.mask,
                    );
                    let alpha = heat_index::alpha_grid(&heat, &self.terrain.mask);
                    debug!("year {year}: annual heat index and alpha derived");

                    for month in block {
                        gauge_flow.push(self.step(month, &whc_eff, &heat, &alpha));
                    }
                }
            }
        }

        // Monthly volumes to volume per second.
        for flow in &mut gauge_flow {
            *flow /= SECONDS_PER_MONTH;
        }

        info!("simulation complete: {} gauge values", gauge_flow.len());
        Ok(SimulationOutput {
            gauge_flow,
            state: self.state,
        })
    }

    /// One monthly state transition; returns the gauge volume [m^3/month].
    ///
    /// Module order is fixed: snow -> PET -> soil -> flow separation ->
    /// accumulation. Each state grid is read and rewritten exactly once.
    fn step(
        &mut self,
        month: usize,
        whc_eff: &Array2<f64>,
        heat: &Array2<f64>,
        alpha: &Array2<f64>,
    ) -> f64 {
        let precip = &self.forcing.precip[month];
        let temp = &self.forcing.temp[month];
        let mask = &self.terrain.mask;
        let params = &self.params;
        let shape = self.terrain.shape();
        let daylight = self.daylight_hours[month % self.daylight_hours.len()];

        // Snow accumulation and melt.
        let mut liquid = Array2::from_elem(shape, f64::NAN);
        Zip::from(&mut liquid)
            .and(&mut self.state.snow_pack)
            .and(precip)
            .and(temp)
            .and(mask)
            .for_each(|liq, pack, &p, &t, &valid| {
                if !valid {
                    return;
                }
                let (l, next_pack, _melt) = processes::snow_balance(
                    p,
                    t,
                    *pack,
                    params.snow_fall_threshold,
                    params.snow_melt_threshold,
                    params.snow_melt_coeff,
                );
                *liq = l;
                *pack = next_pack;
            });

        // Potential evapotranspiration. Pure elementwise work with no
        // cross-cell dependency, so this pass runs in parallel.
        let daylight_scale = daylight / NEUTRAL_DAYLIGHT_HOURS;
        let cropf_coeff = params.cropf_coeff;
        let mut pet = Array2::from_elem(shape, f64::NAN);
        Zip::from(&mut pet)
            .and(temp)
            .and(&self.terrain.crop_factor)
            .and(heat)
            .and(alpha)
            .and(mask)
            .par_for_each(|pe, &t, &cropf, &h, &a, &valid| {
                if !valid {
                    return;
                }
                *pe = processes::thornthwaite_pet(t, h, a) * daylight_scale * cropf * cropf_coeff;
            });

        // Soil-moisture accounting.
        let mut excess = Array2::from_elem(shape, f64::NAN);
        Zip::from(&mut excess)
            .and(&mut self.state.available_water)
            .and(&liquid)
            .and(&pet)
            .and(whc_eff)
            .and(mask)
            .for_each(|ex, aw, &liq, &pe, &whc, &valid| {
                if !valid {
                    return;
                }
                let (e, next_aw) = processes::soil_balance(liq, pe, *aw, whc);
                *ex = e;
                *aw = next_aw;
            });

        // Flow separation and depth-to-volume conversion.
        let cell_area = self.terrain.cell_area();
        let mut discharge = Array2::from_elem(shape, f64::NAN);
        Zip::from(&mut discharge)
            .and(&mut self.state.ground_water)
            .and(&excess)
            .and(mask)
            .for_each(|d, gw, &ex, &valid| {
                if !valid {
                    return;
                }
                let (outflow, next_gw) = processes::flow_separation(ex, *gw, params.togw, params.c);
                *gw = next_gw;
                *d = outflow / DEPTH_TO_VOLUME_DIVISOR * cell_area;
            });

        // Accumulate along the drainage network; the outlet is the cell of
        // maximum accumulated flow.
        let accumulated = self.network.accumulate(&discharge);
        self.network.gauge_flow(&accumulated)
    }
}
