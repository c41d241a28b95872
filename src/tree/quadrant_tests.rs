use crate::tree::{Quadrant, NE, NW, SE, SW};
use crate::utils::PhysicsError;

#[test]
fn test_quadrant_contains() {
    let quadrant = Quadrant::new(0.5, 0.5, 1.0).unwrap();
    assert!(quadrant.contains(0.0, 0.0));
    assert!(quadrant.contains(0.5, 0.5));
    assert!(!quadrant.contains(1.0, 0.5)); // upper bound is half-open
    assert!(!quadrant.contains(0.5, 1.0));
    assert!(!quadrant.contains(-0.01, 0.5));
}

#[test]
fn test_quadrant_rejects_bad_side() {
    assert_eq!(Quadrant::new(0.0, 0.0, 0.0), Err(PhysicsError::InvalidArena));
    assert_eq!(Quadrant::new(0.0, 0.0, -1.0), Err(PhysicsError::InvalidArena));
    assert_eq!(Quadrant::new(0.0, 0.0, f64::INFINITY), Err(PhysicsError::InvalidArena));
}

#[test]
fn test_quadrant_subdivide() {
    let quadrant = Quadrant::new(0.0, 0.0, 4.0).unwrap();
    let (nw, ne, sw, se) = quadrant.subdivide();
    assert_eq!((nw.cx, nw.cy), (-1.0, 1.0));
    assert_eq!((ne.cx, ne.cy), (1.0, 1.0));
    assert_eq!((sw.cx, sw.cy), (-1.0, -1.0));
    assert_eq!((se.cx, se.cy), (1.0, -1.0));
    for child in [nw, ne, sw, se] {
        assert_eq!(child.side, 2.0);
    }
}

#[test]
fn test_child_index_agrees_with_containment() {
    let quadrant = Quadrant::new(0.0, 0.0, 2.0).unwrap();
    let children = quadrant.children();
    let points = [
        (-0.5, 0.5), (0.5, 0.5), (-0.5, -0.5), (0.5, -0.5),
        // On the dividing lines.
        (0.0, 0.0), (0.0, 0.5), (-0.5, 0.0), (0.0, -0.5), (0.5, 0.0),
        (-1.0, -1.0),
    ];
    for (x, y) in points {
        let index = quadrant.child_index(x, y);
        assert!(children[index].contains(x, y), "({}, {}) not inside child {}", x, y, index);
        let owners = children.iter().filter(|c| c.contains(x, y)).count();
        assert_eq!(owners, 1, "({}, {}) owned by {} children", x, y, owners);
    }
    assert_eq!(quadrant.child_index(0.0, 0.0), NE);
    assert_eq!(quadrant.child_index(-0.1, 0.0), NW);
    assert_eq!(quadrant.child_index(-0.1, -0.1), SW);
    assert_eq!(quadrant.child_index(0.0, -0.1), SE);
}
