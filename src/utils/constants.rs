use crate::models::Color;
use crate::utils;

/// Gravitational constant used by the default configuration.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67e-11;

pub const DEFAULT_SIMULATION_CONFIG: utils::SimulationConfig = utils::SimulationConfig {
    theta: 0.5,
    gravitational_constant: GRAVITATIONAL_CONSTANT,
    softening: 3.0e4,
    dt_scale: 0.8,
    tick_scale: 0.8,
    dt_ceiling: 0.2,
    arena_side: 1.0,
    root_scale: 2.0,
    default_color: Color::BLACK,
};
