//! Barnes–Hut quadtree over the bodies of one macro step.
//!
//! Nodes live in a flat `Vec` and point at their children by [`NodeId`], so a tree is
//! one allocation-friendly arena that is thrown away and rebuilt every step. Leaves
//! refer to bodies by their index in the caller's slice; that index is how a body
//! recognises (and skips) itself while its force is being computed.

use log::{debug, warn};

use crate::models::{Body, PseudoBody};
use crate::tree::Quadrant;
use crate::utils::ForceLaw;

/// Depth at which a leaf stops splitting and merges further bodies into itself.
///
/// Only coincident (or nearly coincident) bodies ever get this deep; merging them
/// keeps insertion finite.
pub const MAX_DEPTH: usize = 48;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A body recorded in a leaf: its index in the caller's slice and its mass at insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    pub index: usize,
    pub body: PseudoBody,
}

/// Barnes–Hut tree node.
///
/// - `Empty`: a region with no bodies
/// - `Leaf`: a region holding one body (several only once [`MAX_DEPTH`] is reached),
///   with their combined mass as `aggregate`
/// - `Internal`: a subdivided region with the mass and center of mass of everything
///   beneath it, and four children in NW, NE, SW, SE order
#[derive(Debug, Clone)]
pub enum Node {
    Empty(Quadrant),
    Leaf {
        quadrant: Quadrant,
        occupants: Vec<Occupant>,
        aggregate: PseudoBody,
    },
    Internal {
        quadrant: Quadrant,
        aggregate: PseudoBody,
        children: [NodeId; 4],
    },
}

impl Node {
    pub fn quadrant(&self) -> Quadrant {
        match self {
            Node::Empty(q) => *q,
            Node::Leaf { quadrant, .. } => *quadrant,
            Node::Internal { quadrant, .. } => *quadrant,
        }
    }

    pub fn aggregate(&self) -> Option<PseudoBody> {
        match self {
            Node::Empty(_) => None,
            Node::Leaf { aggregate, .. } => Some(*aggregate),
            Node::Internal { aggregate, .. } => Some(*aggregate),
        }
    }
}

/// Arena-backed Barnes–Hut tree.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::{Body, Color};
/// use rs_nbody::tree::{BarnesHutTree, Quadrant, direct_force};
/// use rs_nbody::utils::ForceLaw;
///
/// let bodies = vec![
///     Body::new(0.2, 0.2, 0.0, 0.0, 1.0, 0.01, Color::BLACK).unwrap(),
///     Body::new(0.8, 0.2, 0.0, 0.0, 2.0, 0.01, Color::BLACK).unwrap(),
///     Body::new(0.5, 0.9, 0.0, 0.0, 3.0, 0.01, Color::BLACK).unwrap(),
/// ];
/// let root = Quadrant::new(0.5, 0.5, 1.0).unwrap();
/// let law = ForceLaw::new(1.0, 0.0);
///
/// // With theta = 0 every interaction is resolved body by body.
/// let tree = BarnesHutTree::build(&bodies, root, 0.0);
/// assert_eq!(tree.len(), 3);
///
/// let (fx, fy) = tree.compute_force(0, &bodies[0], &law);
/// let (ex, ey) = direct_force(&bodies, 0, &law);
/// assert!((fx - ex).abs() < 1e-12 && (fy - ey).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BarnesHutTree {
    nodes: Vec<Node>,
    root: NodeId,
    theta: f64,
    len: usize,
}

impl BarnesHutTree {
    /// Creates an empty tree covering `quadrant`, opening nodes whose
    /// side-to-distance ratio is at least `theta`.
    pub fn new(quadrant: Quadrant, theta: f64) -> Self {
        Self {
            nodes: vec![Node::Empty(quadrant)],
            root: NodeId::new(0),
            theta,
            len: 0,
        }
    }

    /// Builds a tree from every body of `bodies` that lies inside `quadrant`.
    ///
    /// Bodies outside the root region are left out of the force computation.
    pub fn build(bodies: &[Body], quadrant: Quadrant, theta: f64) -> Self {
        let mut tree = Self::new(quadrant, theta);
        tree.nodes.reserve(bodies.len() * 2);
        for (index, body) in bodies.iter().enumerate() {
            if body.is_in(&quadrant) {
                tree.insert(index, body);
            }
        }
        if tree.len < bodies.len() {
            debug!("{} of {} bodies lie outside the root quadrant and exert no force", bodies.len() - tree.len, bodies.len());
        }
        tree
    }

    /// Inserts the body stored at `index` of the caller's slice.
    pub fn insert(&mut self, index: usize, body: &Body) {
        let root_quadrant = self.root_quadrant();
        if !body.is_in(&root_quadrant) {
            warn!(
                "Inserting body {} at ({:.6}, {:.6}) outside the root quadrant; placement is approximate",
                index, body.rx, body.ry
            );
        }
        self.insert_at(self.root, index, PseudoBody::from(body));
        self.len += 1;
    }

    fn insert_at(&mut self, mut id: NodeId, index: usize, point: PseudoBody) {
        let mut depth = 0;
        loop {
            match &mut self.nodes[id.index()] {
                Node::Empty(quadrant) => {
                    let quadrant = *quadrant;
                    self.nodes[id.index()] = Node::Leaf {
                        quadrant,
                        occupants: vec![Occupant { index, body: point }],
                        aggregate: point,
                    };
                    return;
                }
                Node::Leaf { occupants, aggregate, .. } if depth >= MAX_DEPTH => {
                    occupants.push(Occupant { index, body: point });
                    *aggregate = aggregate.plus(&point);
                    return;
                }
                Node::Leaf { quadrant, occupants, .. } => {
                    debug_assert_eq!(occupants.len(), 1, "only leaves at MAX_DEPTH hold several bodies");
                    let quadrant = *quadrant;
                    let existing = occupants[0];

                    let children = self.push_children(quadrant);
                    self.nodes[id.index()] = Node::Internal {
                        quadrant,
                        aggregate: existing.body.plus(&point),
                        children,
                    };

                    let slot = children[quadrant.child_index(existing.body.x, existing.body.y)];
                    let slot_quadrant = self.nodes[slot.index()].quadrant();
                    self.nodes[slot.index()] = Node::Leaf {
                        quadrant: slot_quadrant,
                        occupants: vec![existing],
                        aggregate: existing.body,
                    };

                    id = children[quadrant.child_index(point.x, point.y)];
                    depth += 1;
                }
                Node::Internal { quadrant, aggregate, children } => {
                    *aggregate = aggregate.plus(&point);
                    id = children[quadrant.child_index(point.x, point.y)];
                    depth += 1;
                }
            }
        }
    }

    fn push_children(&mut self, quadrant: Quadrant) -> [NodeId; 4] {
        let first = self.nodes.len();
        self.nodes.extend(quadrant.children().into_iter().map(Node::Empty));
        [
            NodeId::new(first),
            NodeId::new(first + 1),
            NodeId::new(first + 2),
            NodeId::new(first + 3),
        ]
    }

    /// Approximate net gravitational force on `body`, the element at `index` of the
    /// slice the tree was built from.
    pub fn compute_force(&self, index: usize, body: &Body, law: &ForceLaw) -> (f64, f64) {
        let target = PseudoBody::from(body);
        let mut force = (0.0, 0.0);
        self.accumulate(self.root, index, &target, law, &mut force);
        force
    }

    /// Adds the tree's force on `body` to its accumulator.
    pub fn update_force(&self, index: usize, body: &mut Body, law: &ForceLaw) {
        let (fx, fy) = self.compute_force(index, body, law);
        body.fx += fx;
        body.fy += fy;
    }

    fn accumulate(&self, id: NodeId, index: usize, target: &PseudoBody, law: &ForceLaw, force: &mut (f64, f64)) {
        match &self.nodes[id.index()] {
            Node::Empty(_) => {}
            Node::Leaf { occupants, aggregate, .. } => {
                if occupants.iter().any(|o| o.index == index) {
                    for other in occupants.iter().filter(|o| o.index != index) {
                        add_pull(target, &other.body, law, force);
                    }
                } else {
                    add_pull(target, aggregate, law, force);
                }
            }
            Node::Internal { quadrant, aggregate, children } => {
                // A node holding the target must be opened, or the target would pull on itself.
                let distance = aggregate.distance_to(target.x, target.y);
                if !quadrant.contains(target.x, target.y) && quadrant.side / distance < self.theta {
                    add_pull(target, aggregate, law, force);
                } else {
                    for &child in children {
                        self.accumulate(child, index, target, law, force);
                    }
                }
            }
        }
    }

    /// Number of bodies inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root.index()]
    }

    pub fn root_quadrant(&self) -> Quadrant {
        self.root().quadrant()
    }

    /// Total mass and center of mass of everything in the tree.
    pub fn aggregate(&self) -> Option<PseudoBody> {
        self.root().aggregate()
    }
}

#[inline]
fn add_pull(target: &PseudoBody, source: &PseudoBody, law: &ForceLaw, force: &mut (f64, f64)) {
    let (fx, fy) = law.pull(target.x, target.y, target.mass, source.x, source.y, source.mass);
    force.0 += fx;
    force.1 += fy;
}

/// Exact pairwise force on `bodies[index]` from every other body.
pub fn direct_force(bodies: &[Body], index: usize, law: &ForceLaw) -> (f64, f64) {
    let target = &bodies[index];
    bodies
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .fold((0.0, 0.0), |(fx, fy), (_, other)| {
            let (dx, dy) = law.pull(target.rx, target.ry, target.mass(), other.rx, other.ry, other.mass());
            (fx + dx, fy + dy)
        })
}
