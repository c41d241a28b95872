mod step_control;
mod nbody_system;

pub use step_control::*;
pub use nbody_system::*;

#[cfg(test)]
mod nbody_system_tests;
