use crate::utils::PhysicsError;

/// Represents a square region in 2D space.
///
/// A `Quadrant` has a center position (cx, cy) and a side length. Containment is
/// half-open: inclusive on the lower bounds and exclusive on the upper bounds, so a
/// point on a shared edge belongs to exactly one of two neighbouring quadrants.
///
/// # Examples
///
/// ```
/// use rs_nbody::tree::Quadrant;
///
/// // Square centered at the origin with side length 2.0
/// let quadrant = Quadrant::new(0.0, 0.0, 2.0).unwrap();
///
/// assert!(quadrant.contains(0.5, 0.5));
/// assert!(quadrant.contains(-1.0, -1.0)); // lower edges are inside
/// assert!(!quadrant.contains(1.0, 0.0));  // upper edges are not
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrant {
    pub cx: f64,   // center x-coordinate
    pub cy: f64,   // center y-coordinate
    pub side: f64, // length of one side
}

/// Child slot of a quadrant after subdivision.
pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;

impl Quadrant {
    /// Creates a quadrant, rejecting a side length that is not finite and positive.
    pub fn new(cx: f64, cy: f64, side: f64) -> Result<Self, PhysicsError> {
        if !side.is_finite() || side <= 0.0 {
            return Err(PhysicsError::InvalidArena);
        }
        Ok(Quadrant { cx, cy, side })
    }

    pub fn half_size(&self) -> f64 {
        self.side / 2.0
    }

    /// Returns true if the point (x, y) is inside this quadrant.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let hs = self.half_size();
        x >= self.cx - hs &&
            x <  self.cx + hs &&
            y >= self.cy - hs &&
            y <  self.cy + hs
    }

    /// Subdivides the quadrant into four smaller ones (NW, NE, SW, SE), north being +y.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::tree::Quadrant;
    ///
    /// let quadrant = Quadrant::new(0.0, 0.0, 2.0).unwrap();
    /// let (nw, ne, sw, se) = quadrant.subdivide();
    ///
    /// assert_eq!((nw.cx, nw.cy, nw.side), (-0.5, 0.5, 1.0));
    /// assert_eq!((ne.cx, ne.cy), (0.5, 0.5));
    /// assert!(sw.contains(-0.25, -0.25));
    /// assert!(se.contains(0.25, -0.25));
    /// ```
    pub fn subdivide(&self) -> (Quadrant, Quadrant, Quadrant, Quadrant) {
        let q = self.side / 4.0;
        let side = self.side / 2.0;
        (
            Quadrant { cx: self.cx - q, cy: self.cy + q, side }, // NW
            Quadrant { cx: self.cx + q, cy: self.cy + q, side }, // NE
            Quadrant { cx: self.cx - q, cy: self.cy - q, side }, // SW
            Quadrant { cx: self.cx + q, cy: self.cy - q, side }, // SE
        )
    }

    /// Subdivision as an array indexed by [`NW`], [`NE`], [`SW`] and [`SE`].
    pub fn children(&self) -> [Quadrant; 4] {
        let (nw, ne, sw, se) = self.subdivide();
        [nw, ne, sw, se]
    }

    /// Which child a point falls into, decided against the center so that boundary
    /// points always resolve the same way the half-open rule does.
    pub fn child_index(&self, x: f64, y: f64) -> usize {
        match (x < self.cx, y >= self.cy) {
            (true, true) => NW,
            (false, true) => NE,
            (true, false) => SW,
            (false, false) => SE,
        }
    }
}
