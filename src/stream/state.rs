/// STREAM persistent state grids.
///
/// The hydrological memory of the model: one grid each for snow pack, soil
/// available water, and groundwater storage. All three start at zero, which
/// is why simulated output needs a warm-up period before it is meaningful.
/// Cells outside the watershed are NaN from the start so that no-data can
/// never be mistaken for an empty store.
use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct State {
    /// Accumulated snow mass equivalent [mm]; non-negative.
    pub snow_pack: Array2<f64>,
    /// Soil available water [mm]; bounded by the effective WHC per cell.
    pub available_water: Array2<f64>,
    /// Groundwater storage [mm]; non-negative.
    pub ground_water: Array2<f64>,
}

impl State {
    /// Fresh zeroed state over the valid cells of `mask`, NaN elsewhere.
    pub fn initialize(mask: &Array2<bool>) -> Self {
        let zeroed = mask.mapv(|valid| if valid { 0.0 } else { f64::NAN });
        Self {
            snow_pack: zeroed.clone(),
            available_water: zeroed.clone(),
            ground_water: zeroed,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.snow_pack.dim()
    }
}
