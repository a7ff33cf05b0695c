/// rustream — STREAM hydrological model in Rust.
///
/// A spatially distributed, monthly-timestep rainfall-runoff model:
/// gridded snow, evapotranspiration, and soil-moisture accounting coupled
/// to D8 flow accumulation over a terrain-derived drainage network,
/// producing a streamflow series at the watershed outlet.
pub mod error;
pub mod forcing;
pub mod metrics;
pub mod network;
pub mod stream;
pub mod terrain;

pub use error::ConfigError;
pub use forcing::ClimateForcing;
pub use network::DrainageNetwork;
pub use stream::params::Parameters;
pub use stream::run::{Simulation, SimulationOutput};
pub use stream::state::State;
pub use terrain::Terrain;
