// Domain layer: core models and ports (interfaces). No storage concerns beyond the traits.

pub mod model;
pub mod ports;
