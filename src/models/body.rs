use std::fmt;
use log::warn;

use crate::tree::Quadrant;
use crate::utils::{ForceLaw, PhysicsError};

/// An RGB color token carried by each body.
///
/// The simulation never inspects it; it is handed back to render sinks untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// A mass concentrated at a point, used by the Barnes-Hut tree to stand in for a cluster.
///
/// Pseudo-bodies have no velocity or radius and never take part in collisions.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::PseudoBody;
///
/// let a = PseudoBody { x: 0.0, y: 0.0, mass: 1.0 };
/// let b = PseudoBody { x: 3.0, y: 0.0, mass: 2.0 };
/// let c = a.plus(&b);
/// assert_eq!(c.mass, 3.0);
/// assert_eq!(c.x, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoBody {
    pub x: f64,
    pub y: f64,
    pub mass: f64,
}

impl PseudoBody {
    /// Combined mass at the mass-weighted centroid of `self` and `other`.
    pub fn plus(&self, other: &PseudoBody) -> PseudoBody {
        let mass = self.mass + other.mass;
        PseudoBody {
            x: (self.x * self.mass + other.x * other.mass) / mass,
            y: (self.y * self.mass + other.y * other.mass) / mass,
            mass,
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<&Body> for PseudoBody {
    fn from(body: &Body) -> Self {
        PseudoBody { x: body.rx, y: body.ry, mass: body.mass }
    }
}

/// A collidable point mass with a finite radius.
///
/// Position and velocity are public and mutated in place by the simulation. Mass and
/// radius are fixed at construction, and the collision counter only ever grows: every
/// velocity discontinuity (body or wall bounce) bumps it by one, which is what the event
/// engine uses to recognise predictions that no longer hold.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::{Body, Color};
///
/// let mut body = Body::new(0.5, 0.5, 0.1, 0.0, 1.0, 0.05, Color::BLACK).unwrap();
/// // Right wall at x = 1.0: contact when the rim reaches it.
/// let t = body.time_to_hit_vertical_wall(0.0, 1.0);
/// assert!((t - 4.5).abs() < 1e-12);
///
/// body.advance(t);
/// body.bounce_off_vertical_wall();
/// assert_eq!(body.vx, -0.1);
/// assert_eq!(body.count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub rx: f64,
    pub ry: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: f64,
    pub fy: f64,
    mass: f64,
    radius: f64,
    color: Color,
    count: u64,
}

impl Body {
    /// Creates a new body at rest force-wise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMass` for a non-positive or non-finite mass, `InvalidRadius`
    /// for a negative or non-finite radius, and `InvalidPosition` or `InvalidVelocity`
    /// when a coordinate or velocity component is not finite.
    pub fn new(
        rx: f64,
        ry: f64,
        vx: f64,
        vy: f64,
        mass: f64,
        radius: f64,
        color: Color,
    ) -> Result<Self, PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass);
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(PhysicsError::InvalidRadius);
        }
        if !rx.is_finite() || !ry.is_finite() {
            return Err(PhysicsError::InvalidPosition);
        }
        if !vx.is_finite() || !vy.is_finite() {
            return Err(PhysicsError::InvalidVelocity);
        }
        Ok(Body {
            rx,
            ry,
            vx,
            vy,
            fx: 0.0,
            fy: 0.0,
            mass,
            radius,
            color,
            count: 0,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of collisions (with bodies or walls) this body has been part of.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn position(&self) -> (f64, f64) {
        (self.rx, self.ry)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    pub fn force(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }

    pub fn momentum(&self) -> (f64, f64) {
        (self.mass * self.vx, self.mass * self.vy)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        let dx = self.rx - other.rx;
        let dy = self.ry - other.ry;
        (dx * dx + dy * dy).sqrt()
    }

    /// False once a position or velocity component has become NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.rx.is_finite() && self.ry.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }

    pub fn is_in(&self, quadrant: &Quadrant) -> bool {
        quadrant.contains(self.rx, self.ry)
    }

    pub fn reset_force(&mut self) {
        self.fx = 0.0;
        self.fy = 0.0;
    }

    /// Adds the softened gravitational pull of `source` to the force accumulator.
    pub fn add_force(&mut self, source: &PseudoBody, law: &ForceLaw) {
        let (fx, fy) = law.pull(self.rx, self.ry, self.mass, source.x, source.y, source.mass);
        self.fx += fx;
        self.fy += fy;
    }

    /// Kicks the velocity by the accumulated force. Position is left alone; the event
    /// engine owns straight-line motion between collisions.
    pub fn update_velocity(&mut self, dt: f64) {
        self.vx += dt * self.fx / self.mass;
        self.vy += dt * self.fy / self.mass;
    }

    /// Straight-line drift for `dt`.
    pub fn advance(&mut self, dt: f64) {
        self.rx += dt * self.vx;
        self.ry += dt * self.vy;
    }

    /// Time until the rims of `self` and `other` touch, or `f64::INFINITY` if they never will.
    ///
    /// Overlapping bodies are reported as an anomaly and treated as non-colliding.
    pub fn time_to_hit(&self, other: &Body) -> f64 {
        if std::ptr::eq(self, other) {
            return f64::INFINITY;
        }
        let dx = other.rx - self.rx;
        let dy = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dvdr = dx * dvx + dy * dvy;
        if dvdr >= 0.0 {
            return f64::INFINITY;
        }
        let dvdv = dvx * dvx + dvy * dvy;
        if dvdv == 0.0 {
            return f64::INFINITY;
        }
        let drdr = dx * dx + dy * dy;
        let sigma = self.radius + other.radius;
        if drdr < sigma * sigma {
            warn!(
                "Bodies at ({:.6}, {:.6}) and ({:.6}, {:.6}) already overlap; skipping collision prediction",
                self.rx, self.ry, other.rx, other.ry
            );
            return f64::INFINITY;
        }
        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            return f64::INFINITY;
        }
        -(dvdr + d.sqrt()) / dvdv
    }

    /// Time until the body touches the wall at `x = min` or `x = max`.
    pub fn time_to_hit_vertical_wall(&self, min: f64, max: f64) -> f64 {
        time_to_wall(self.rx, self.vx, self.radius, min, max)
    }

    /// Time until the body touches the wall at `y = min` or `y = max`.
    pub fn time_to_hit_horizontal_wall(&self, min: f64, max: f64) -> f64 {
        time_to_wall(self.ry, self.vy, self.radius, min, max)
    }

    /// Elastic collision with `other` along the line of centers, conserving momentum and
    /// kinetic energy. Both collision counters are incremented.
    pub fn bounce_off(&mut self, other: &mut Body) {
        let dx = other.rx - self.rx;
        let dy = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dvdr = dx * dvx + dy * dvy;

        let sigma = self.radius + other.radius;
        let dist = if sigma > 0.0 { sigma } else { (dx * dx + dy * dy).sqrt() };

        if dist > 0.0 {
            let magnitude = 2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * dist);
            let jx = magnitude * dx / dist;
            let jy = magnitude * dy / dist;

            self.vx += jx / self.mass;
            self.vy += jy / self.mass;
            other.vx -= jx / other.mass;
            other.vy -= jy / other.mass;
        } else {
            warn!("Coincident point bodies at ({:.6}, {:.6}) have no line of centers; velocities kept", self.rx, self.ry);
        }

        self.count += 1;
        other.count += 1;
    }

    pub fn bounce_off_vertical_wall(&mut self) {
        self.vx = -self.vx;
        self.count += 1;
    }

    pub fn bounce_off_horizontal_wall(&mut self) {
        self.vy = -self.vy;
        self.count += 1;
    }

    /// Combined mass of `self` and `other` at their center of mass.
    pub fn plus(&self, other: &Body) -> PseudoBody {
        PseudoBody::from(self).plus(&PseudoBody::from(other))
    }
}

// A body already past its contact plane is due immediately. Non-finite motion never
// reaches a wall.
fn time_to_wall(position: f64, velocity: f64, radius: f64, min: f64, max: f64) -> f64 {
    if !position.is_finite() || !velocity.is_finite() {
        return f64::INFINITY;
    }
    let t = if velocity > 0.0 {
        (max - radius - position) / velocity
    } else if velocity < 0.0 {
        (min + radius - position) / velocity
    } else {
        return f64::INFINITY;
    };
    if t.is_finite() { t.max(0.0) } else { f64::INFINITY }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:>10.3e} {:>10.3e} {:>10.3e} {:>10.3e} {:>10.3e}",
            self.rx, self.ry, self.vx, self.vy, self.mass
        )
    }
}
