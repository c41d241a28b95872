use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Body, Color};
use crate::utils::{PhysicsError, SimulationConfig};

/// Radius of a generated body, as a fraction of the arena side.
pub const RANDOM_RADIUS: f64 = 0.02;
/// Largest speed component of a generated body, as a fraction of the arena side.
pub const RANDOM_SPEED: f64 = 0.005;
pub const RANDOM_MASS: f64 = 0.5;

const PLACEMENT_ATTEMPTS: usize = 1000;

/// Plain initial state for one body, as read from an external source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRecord {
    pub position: (f64, f64),
    pub velocity: (f64, f64),
    pub radius: f64,
    pub mass: f64,
    /// Falls back to the configured default color when unset.
    pub color: Option<Color>,
}

impl BodyRecord {
    pub fn into_body(self, default_color: Color) -> Result<Body, PhysicsError> {
        let (rx, ry) = self.position;
        let (vx, vy) = self.velocity;
        Body::new(rx, ry, vx, vy, self.mass, self.radius, self.color.unwrap_or(default_color))
    }
}

/// Converts records into bodies, failing on the first invalid one.
pub fn bodies_from_records<I>(records: I, config: &SimulationConfig) -> Result<Vec<Body>, PhysicsError>
where
    I: IntoIterator<Item = BodyRecord>,
{
    records
        .into_iter()
        .map(|record| record.into_body(config.default_color))
        .collect()
}

/// Generates `n` non-overlapping bodies spread uniformly over the arena.
///
/// The same `seed` always yields the same bodies.
///
/// # Errors
///
/// Returns `InvalidConfiguration` when a body cannot be placed without overlapping
/// the ones already placed.
///
/// # Examples
///
/// ```
/// use rs_nbody::apis::random_bodies;
/// use rs_nbody::utils::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// let bodies = random_bodies(20, &config, 42).unwrap();
/// assert_eq!(bodies.len(), 20);
/// assert_eq!(bodies, random_bodies(20, &config, 42).unwrap());
/// ```
pub fn random_bodies(n: usize, config: &SimulationConfig, seed: u64) -> Result<Vec<Body>, PhysicsError> {
    config.validate()?;
    let side = config.arena_side;
    let radius = RANDOM_RADIUS * side;
    let speed = RANDOM_SPEED * side;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bodies: Vec<Body> = Vec::with_capacity(n);

    for i in 0..n {
        let mut placed = None;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let rx = rng.random_range(radius..side - radius);
            let ry = rng.random_range(radius..side - radius);
            let clear = bodies.iter().all(|b| {
                let (dx, dy) = (b.rx - rx, b.ry - ry);
                (dx * dx + dy * dy).sqrt() >= b.radius() + radius
            });
            if clear {
                placed = Some((rx, ry));
                break;
            }
        }
        let Some((rx, ry)) = placed else {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "no room for body {} of {} after {} attempts",
                i, n, PLACEMENT_ATTEMPTS
            )));
        };
        let vx = rng.random_range(-speed..speed);
        let vy = rng.random_range(-speed..speed);
        bodies.push(Body::new(rx, ry, vx, vy, RANDOM_MASS, radius, config.default_color)?);
    }

    debug!("generated {} random bodies with seed {}", n, seed);
    Ok(bodies)
}
