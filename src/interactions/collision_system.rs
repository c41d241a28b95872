//! Event-driven collision engine.
//!
//! Within one macro step every body moves in a straight line, so the time of each
//! body-body or body-wall contact can be solved for exactly. The engine predicts all of
//! them up front, processes them in time order, and after every bounce predicts again
//! for the bodies whose paths changed. Predictions made obsolete by an earlier bounce
//! are not removed from the queue; they are recognised by their collision-count
//! snapshot when popped and dropped then.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{debug, trace, warn};

use crate::apis::RenderSink;
use crate::interactions::{Event, EventKind};
use crate::models::Body;
use crate::utils::{PhysicsError, SimulationConfig};

/// Tick frequency used until one is set.
pub const DEFAULT_REDRAW_HZ: f64 = 0.5;

/// Counters for one engine run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Events popped from the queue, stale ones included.
    pub events: usize,
    /// Events dropped because a participant collided after they were predicted.
    pub stale: usize,
    pub pair_collisions: usize,
    pub wall_collisions: usize,
    pub ticks: usize,
}

/// Runs bodies forward in time within a rectangular box, resolving elastic collisions
/// exactly.
///
/// # Examples
///
/// ```
/// use rs_nbody::apis::FrameRecorder;
/// use rs_nbody::interactions::CollisionSystem;
/// use rs_nbody::models::{Body, Color};
///
/// let mut bodies = vec![
///     Body::new(0.3, 0.5, 0.1, 0.0, 1.0, 0.05, Color::BLACK).unwrap(),
///     Body::new(0.7, 0.5, -0.1, 0.0, 1.0, 0.05, Color::BLACK).unwrap(),
/// ];
/// let mut system = CollisionSystem::new(0.0, 1.0, 0.0, 1.0).unwrap();
/// system.set_redraw_hz(1.0).unwrap();
///
/// let mut frames = FrameRecorder::new();
/// let stats = system.increment(&mut bodies, 2.0, &mut frames).unwrap();
///
/// // The pair meets at t = 1.5 and swaps velocities.
/// assert_eq!(stats.pair_collisions, 1);
/// assert!((bodies[0].vx + 0.1).abs() < 1e-12);
/// assert_eq!(frames.times(), vec![0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    pq: BinaryHeap<Reverse<Event>>,
    clock: f64,
    hz: f64,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    stats: EngineStats,
}

impl CollisionSystem {
    /// Creates an engine for the box `[xmin, xmax] × [ymin, ymax]`.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, PhysicsError> {
        let valid = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && hi > lo;
        if !valid(xmin, xmax) || !valid(ymin, ymax) {
            return Err(PhysicsError::InvalidArena);
        }
        Ok(Self {
            pq: BinaryHeap::new(),
            clock: 0.0,
            hz: DEFAULT_REDRAW_HZ,
            xmin,
            xmax,
            ymin,
            ymax,
            stats: EngineStats::default(),
        })
    }

    /// Creates an engine whose walls are the arena of `config`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, PhysicsError> {
        let (min, max) = config.walls();
        Self::new(min, max, min, max)
    }

    /// Sets how many ticks are delivered per unit of simulation time.
    pub fn set_redraw_hz(&mut self, hz: f64) -> Result<(), PhysicsError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!("redraw frequency must be finite and positive, got {}", hz)));
        }
        self.hz = hz;
        Ok(())
    }

    pub fn redraw_hz(&self) -> f64 {
        self.hz
    }

    /// Time elapsed since the start of the current run.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Counters of the current (or last) run.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Number of events waiting in the queue, stale ones included.
    pub fn pending(&self) -> usize {
        self.pq.len()
    }

    /// Clears the queue, the clock and the counters.
    pub fn reset(&mut self) {
        self.pq.clear();
        self.clock = 0.0;
        self.stats = EngineStats::default();
    }

    /// Adds an event to the queue.
    pub fn schedule(&mut self, event: Event) {
        self.pq.push(Reverse(event));
    }

    /// Moves `bodies` forward by `limit`, resolving every collision on the way and
    /// calling `sink` at each tick.
    ///
    /// The clock restarts at zero on every call; only contacts predicted to happen by
    /// `limit` are scheduled.
    pub fn increment<S: RenderSink + ?Sized>(
        &mut self,
        bodies: &mut [Body],
        limit: f64,
        sink: &mut S,
    ) -> Result<EngineStats, PhysicsError> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(PhysicsError::InvalidTime);
        }
        self.reset();
        for i in 0..bodies.len() {
            self.predict(bodies, i, limit);
        }
        self.schedule(Event::tick(0.0));
        trace!("primed {} events for a run of length {}", self.pq.len(), limit);

        self.run(bodies, limit, sink);

        debug!(
            "increment of {:.6}: {} events, {} stale, {} pair and {} wall collisions, {} ticks",
            limit,
            self.stats.events,
            self.stats.stale,
            self.stats.pair_collisions,
            self.stats.wall_collisions,
            self.stats.ticks
        );
        Ok(self.stats)
    }

    /// Processes queued events in time order until the queue is empty.
    ///
    /// Does not reset anything; [`increment`](Self::increment) is the usual entry point.
    pub fn run<S: RenderSink + ?Sized>(&mut self, bodies: &mut [Body], limit: f64, sink: &mut S) {
        while let Some(Reverse(event)) = self.pq.pop() {
            self.stats.events += 1;
            if !event.is_valid(bodies) {
                self.stats.stale += 1;
                continue;
            }

            let elapsed = event.time() - self.clock;
            for body in bodies.iter_mut() {
                body.advance(elapsed);
            }
            self.clock = event.time();

            match event.kind() {
                EventKind::Collision { a, b } => {
                    if let Some((first, second)) = pair_mut(bodies, a, b) {
                        trace!("t = {:.6}: body {} hits body {}", self.clock, a, b);
                        first.bounce_off(second);
                        self.stats.pair_collisions += 1;
                    }
                    self.predict(bodies, a, limit);
                    self.predict(bodies, b, limit);
                }
                EventKind::HorizontalWall(i) => {
                    trace!("t = {:.6}: body {} hits a horizontal wall", self.clock, i);
                    bodies[i].bounce_off_horizontal_wall();
                    self.stats.wall_collisions += 1;
                    self.predict(bodies, i, limit);
                }
                EventKind::VerticalWall(i) => {
                    trace!("t = {:.6}: body {} hits a vertical wall", self.clock, i);
                    bodies[i].bounce_off_vertical_wall();
                    self.stats.wall_collisions += 1;
                    self.predict(bodies, i, limit);
                }
                EventKind::Tick => {
                    sink.on_tick(self.clock, bodies);
                    self.stats.ticks += 1;
                    if self.clock < limit {
                        self.schedule(Event::tick(self.next_tick(limit)));
                    }
                }
            }
        }
    }

    // The last tick lands exactly on `limit`, so a run always covers the whole interval.
    fn next_tick(&self, limit: f64) -> f64 {
        let next = (self.clock + 1.0 / self.hz).min(limit);
        if next > self.clock { next } else { limit }
    }

    /// Queues every contact of body `i` that happens by `limit`.
    ///
    /// Bodies whose position or velocity is no longer finite take part in no contacts.
    fn predict(&mut self, bodies: &[Body], i: usize, limit: f64) {
        let body = &bodies[i];
        if !body.is_finite() {
            warn!("body {} has non-finite state {}; left out of collision prediction", i, body);
            return;
        }
        for (j, other) in bodies.iter().enumerate() {
            if j == i || !other.is_finite() {
                continue;
            }
            if let Some(at) = self.due_by(body.time_to_hit(other), limit) {
                self.schedule(Event::collision(at, i, j, bodies));
            }
        }

        if let Some(at) = self.due_by(body.time_to_hit_vertical_wall(self.xmin, self.xmax), limit) {
            self.schedule(Event::vertical_wall(at, i, bodies));
        }
        if let Some(at) = self.due_by(body.time_to_hit_horizontal_wall(self.ymin, self.ymax), limit) {
            self.schedule(Event::horizontal_wall(at, i, bodies));
        }
    }

    // Absolute time of a contact `dt` from now, if it is finite and falls within the run.
    // A positive `dt` too small to move the clock would repeat at the same instant forever.
    fn due_by(&self, dt: f64, limit: f64) -> Option<f64> {
        let at = self.clock + dt;
        let progresses = dt == 0.0 || at > self.clock;
        (dt.is_finite() && dt >= 0.0 && progresses && at <= limit).then_some(at)
    }
}

/// Two distinct mutable elements of `bodies`, in the order asked for.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (left, right) = bodies.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = bodies.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}
