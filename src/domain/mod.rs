// Domain layer: fixture and operation models plus the ports the runner depends on.

pub mod model;
pub mod ports;
