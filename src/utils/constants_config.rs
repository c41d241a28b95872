// src/utils/constants_config.rs
use crate::models::Color;
use crate::tree::Quadrant;
use crate::utils::{
    DEFAULT_SIMULATION_CONFIG,
    errors::PhysicsError
};

/// Tunable constants of a simulation run.
///
/// `dt_scale` (C1) bounds how far a body may travel within one macro step relative to
/// its own radius, and `tick_scale` (C2) sets the tick period as a fraction of the step.
/// Walls sit at `0` and `arena_side` on both axes; the Barnes-Hut root quadrant is
/// centered on the arena with side `arena_side * root_scale`.
///
/// # Examples
///
/// ```
/// use rs_nbody::utils::SimulationConfig;
///
/// let config = SimulationConfig::new(Some(0.3), None, None, None, None, None, Some(10.0), None, None);
/// assert_eq!(config.theta, 0.3);
/// assert_eq!(config.arena_side, 10.0);
/// assert!(config.validate().is_ok());
///
/// let root = config.root_quadrant().unwrap();
/// assert_eq!(root.side, 20.0);
/// assert!(root.contains(5.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub theta: f64,
    pub gravitational_constant: f64,
    pub softening: f64,
    pub dt_scale: f64,
    pub tick_scale: f64,
    pub dt_ceiling: f64,
    pub arena_side: f64,
    pub root_scale: f64,
    pub default_color: Color,
}


impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

/// Softened Newtonian gravity, `F = G·m₁·m₂ / (r² + ε²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    pub g: f64,
    pub softening: f64,
}

impl ForceLaw {
    pub fn new(g: f64, softening: f64) -> Self {
        Self { g, softening }
    }

    /// Force on a mass `m1` at `(x1, y1)` exerted by a mass `m2` at `(x2, y2)`.
    ///
    /// Coincident points have no defined direction and contribute nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::utils::ForceLaw;
    ///
    /// let law = ForceLaw::new(1.0, 0.0);
    /// let (fx, fy) = law.pull(0.0, 0.0, 2.0, 2.0, 0.0, 3.0);
    /// assert!((fx - 1.5).abs() < 1e-12);
    /// assert_eq!(fy, 0.0);
    ///
    /// assert_eq!(law.pull(1.0, 1.0, 1.0, 1.0, 1.0, 1.0), (0.0, 0.0));
    /// ```
    #[inline]
    pub fn pull(&self, x1: f64, y1: f64, m1: f64, x2: f64, y2: f64, m2: f64) -> (f64, f64) {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq == 0.0 {
            return (0.0, 0.0);
        }
        let dist = dist_sq.sqrt();
        let force = self.g * m1 * m2 / (dist_sq + self.softening * self.softening);
        (force * dx / dist, force * dy / dist)
    }
}

impl SimulationConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theta: Option<f64>,
        gravitational_constant: Option<f64>,
        softening: Option<f64>,
        dt_scale: Option<f64>,
        tick_scale: Option<f64>,
        dt_ceiling: Option<f64>,
        arena_side: Option<f64>,
        root_scale: Option<f64>,
        default_color: Option<Color>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONFIG;
        Self {
            theta: theta.unwrap_or(default.theta),
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            softening: softening.unwrap_or(default.softening),
            dt_scale: dt_scale.unwrap_or(default.dt_scale),
            tick_scale: tick_scale.unwrap_or(default.tick_scale),
            dt_ceiling: dt_ceiling.unwrap_or(default.dt_ceiling),
            arena_side: arena_side.unwrap_or(default.arena_side),
            root_scale: root_scale.unwrap_or(default.root_scale),
            default_color: default_color.unwrap_or(default.default_color),
        }
    }

    /// Checks every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.theta.is_finite() || self.theta < 0.0 { return Err(PhysicsError::InvalidTheta); }
        if !self.arena_side.is_finite() || self.arena_side <= 0.0 { return Err(PhysicsError::InvalidArena); }
        if !self.gravitational_constant.is_finite() || self.gravitational_constant < 0.0 {
            return Err(PhysicsError::InvalidConfiguration("gravitational constant must be finite and non-negative".to_string()));
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(PhysicsError::InvalidConfiguration("softening must be finite and non-negative".to_string()));
        }
        if !self.dt_scale.is_finite() || self.dt_scale <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("dt scale (C1) must be finite and positive".to_string()));
        }
        if !self.tick_scale.is_finite() || self.tick_scale <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("tick scale (C2) must be finite and positive".to_string()));
        }
        if !self.dt_ceiling.is_finite() || self.dt_ceiling <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration("dt ceiling must be finite and positive".to_string()));
        }
        if !self.root_scale.is_finite() || self.root_scale < 1.0 {
            return Err(PhysicsError::InvalidConfiguration("root scale must be at least 1 so the tree covers the arena".to_string()));
        }
        Ok(())
    }

    pub fn force_law(&self) -> ForceLaw {
        ForceLaw::new(self.gravitational_constant, self.softening)
    }

    /// Wall coordinates `(min, max)`, shared by both axes.
    pub fn walls(&self) -> (f64, f64) {
        (0.0, self.arena_side)
    }

    pub fn root_quadrant(&self) -> Result<Quadrant, PhysicsError> {
        let center = 0.5 * self.arena_side;
        Quadrant::new(center, center, self.arena_side * self.root_scale)
    }
}
