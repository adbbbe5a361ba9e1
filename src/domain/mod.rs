// Domain layer: card, draw and reading models plus the ports the core depends on.

pub mod model;
pub mod ports;
