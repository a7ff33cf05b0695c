/// STREAM — spatially distributed monthly rainfall-runoff model.
///
/// An "abc"-family conceptual model: per-pixel snow, Thornthwaite potential
/// evapotranspiration, Thornthwaite-Mather soil-moisture accounting, and
/// runoff/baseflow separation, coupled to D8 flow accumulation over the
/// drainage network.
pub mod constants;
pub mod heat_index;
pub mod params;
pub mod processes;
pub mod run;
pub mod state;
