// Domain layer: core models, reference data and ports (interfaces).

pub mod dataset;
pub mod model;
pub mod ports;
