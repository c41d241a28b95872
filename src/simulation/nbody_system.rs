//! The macro stepping loop.
//!
//! Each step builds a fresh Barnes–Hut tree over the current positions, kicks every
//! velocity by the tree's force, and then lets the collision engine carry the bodies
//! through the step along straight lines. Step length and tick rate are re-derived
//! from the new velocities at the end of each step.
//!
//! # Example
//!
//! ```
//! use rs_nbody::apis::LogSink;
//! use rs_nbody::models::{Body, Color};
//! use rs_nbody::simulation::NBodySystem;
//! use rs_nbody::utils::SimulationConfig;
//!
//! let config = SimulationConfig { gravitational_constant: 1e-4, softening: 1e-3, ..Default::default() };
//! let bodies = vec![
//!     Body::new(0.25, 0.5, 0.0, 0.01, 1.0, 0.02, Color::BLACK).unwrap(),
//!     Body::new(0.75, 0.5, 0.0, -0.01, 1.0, 0.02, Color::BLACK).unwrap(),
//! ];
//!
//! let mut system = NBodySystem::new(bodies, config).unwrap();
//! let mut sink = LogSink::new();
//! system.run(10, &mut sink).unwrap();
//!
//! assert_eq!(system.steps(), 10);
//! // Mutual attraction: the left body now drifts right.
//! assert!(system.bodies()[0].vx > 0.0);
//! ```

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::apis::{bodies_from_records, BodyRecord, OffsetSink, RenderSink};
use crate::interactions::{CollisionSystem, EngineStats};
use crate::models::Body;
use crate::simulation::{dynamic_dt, dynamic_hz, effective_tick_scale};
use crate::tree::{BarnesHutTree, Quadrant};
use crate::utils::{ForceLaw, PhysicsError, SimulationConfig};

/// What happened during one macro step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Length of the step just taken.
    pub dt: f64,
    /// Simulation time at the end of the step.
    pub time: f64,
    /// Bodies that were inside the root quadrant and contributed to gravity.
    pub tree_bodies: usize,
    pub engine: EngineStats,
}

/// Gravitating, colliding bodies in a square arena.
pub struct NBodySystem {
    bodies: Vec<Body>,
    config: SimulationConfig,
    law: ForceLaw,
    root: Quadrant,
    engine: CollisionSystem,
    time: f64,
    dt: f64,
    hz: f64,
    steps: u64,
}

impl NBodySystem {
    /// Creates a system from already-constructed bodies.
    ///
    /// # Errors
    ///
    /// Returns the first invariant `config` violates. A tick scale of 1 or more is
    /// clamped once here rather than rejected.
    pub fn new(bodies: Vec<Body>, mut config: SimulationConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        config.tick_scale = effective_tick_scale(config.tick_scale);
        let root = config.root_quadrant()?;
        let mut engine = CollisionSystem::from_config(&config)?;

        let (min, max) = config.walls();
        let outside = bodies
            .iter()
            .filter(|b| b.rx < min || b.rx > max || b.ry < min || b.ry > max)
            .count();
        if outside > 0 {
            warn!("{} bodies start outside the arena [{}, {}]", outside, min, max);
        }

        let dt = dynamic_dt(&bodies, config.dt_scale, config.dt_ceiling);
        let hz = dynamic_hz(dt, config.tick_scale);
        engine.set_redraw_hz(hz)?;
        info!("N-body system with {} bodies: dt = {:.7}, hz = {:.7}", bodies.len(), dt, hz);

        Ok(Self {
            bodies,
            config,
            law: config.force_law(),
            root,
            engine,
            time: 0.0,
            dt,
            hz,
            steps: 0,
        })
    }

    /// Creates a system from ingested records, coloring unset records with the
    /// configured default.
    pub fn from_records<I>(records: I, config: SimulationConfig) -> Result<Self, PhysicsError>
    where
        I: IntoIterator<Item = BodyRecord>,
    {
        let bodies = bodies_from_records(records, &config)?;
        Self::new(bodies, config)
    }

    /// Advances the simulation by one macro step of length [`dt`](Self::dt).
    ///
    /// A body whose state overflows to NaN or infinity keeps drifting but is left out
    /// of collisions and of the step-length estimate; the step itself always finishes.
    pub fn step<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<StepReport, PhysicsError> {
        let dt = self.dt;
        let tree_bodies = self.accumulate_forces();
        for body in self.bodies.iter_mut() {
            body.update_velocity(dt);
        }
        let diverged = self.bodies.iter().filter(|b| !b.is_finite()).count();
        if diverged > 0 {
            warn!("{} bodies have non-finite state after the force kick; they take part in no collisions", diverged);
        }

        let mut shifted = OffsetSink { inner: sink, offset: self.time };
        let engine = self.engine.increment(&mut self.bodies, dt, &mut shifted)?;
        self.time += dt;
        self.steps += 1;

        self.dt = dynamic_dt(&self.bodies, self.config.dt_scale, self.config.dt_ceiling);
        self.hz = dynamic_hz(self.dt, self.config.tick_scale);
        self.engine.set_redraw_hz(self.hz)?;
        debug!("step {} done at t = {:.6}; next dt = {:.6}, hz = {:.3}", self.steps, self.time, self.dt, self.hz);

        Ok(StepReport { dt, time: self.time, tree_bodies, engine })
    }

    /// Runs `steps` macro steps.
    pub fn run<S: RenderSink + ?Sized>(&mut self, steps: usize, sink: &mut S) -> Result<(), PhysicsError> {
        for _ in 0..steps {
            self.step(sink)?;
        }
        Ok(())
    }

    /// Rebuilds the tree and replaces every body's force with the tree's estimate.
    /// Returns how many bodies were in the tree.
    fn accumulate_forces(&mut self) -> usize {
        let tree = BarnesHutTree::build(&self.bodies, self.root, self.config.theta);
        let law = self.law;

        #[cfg(feature = "parallel")]
        {
            let forces: Vec<(f64, f64)> = self
                .bodies
                .par_iter()
                .enumerate()
                .map(|(i, body)| tree.compute_force(i, body, &law))
                .collect();
            for (body, (fx, fy)) in self.bodies.iter_mut().zip(forces) {
                body.reset_force();
                body.fx += fx;
                body.fy += fy;
            }
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (i, body) in self.bodies.iter_mut().enumerate() {
                body.reset_force();
                tree.update_force(i, body, &law);
            }
        }

        tree.len()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn root_quadrant(&self) -> Quadrant {
        self.root
    }

    /// Simulation time elapsed over all completed steps.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Length of the next step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Tick frequency of the next step.
    pub fn hz(&self) -> f64 {
        self.hz
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn total_momentum(&self) -> (f64, f64) {
        self.bodies.iter().fold((0.0, 0.0), |(px, py), b| {
            let (mx, my) = b.momentum();
            (px + mx, py + my)
        })
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}
