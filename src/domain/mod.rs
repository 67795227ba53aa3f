// Domain layer: records, derived values and the ports the ranking core reads through.

pub mod model;
pub mod ports;
