use std::cmp::Ordering;

use crate::models::Body;

/// A body taking part in an event, with its collision count when the event was predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub index: usize,
    pub count: u64,
}

impl Participant {
    fn snapshot(bodies: &[Body], index: usize) -> Self {
        Participant { index, count: bodies[index].count() }
    }

    fn is_current(&self, bodies: &[Body]) -> bool {
        bodies.get(self.index).is_some_and(|b| b.count() == self.count)
    }
}

/// What an event does when it comes due, decoded from which participants are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Both participants present: a body-body collision.
    Collision { a: usize, b: usize },
    /// Only `a` present: the body reaches the wall at `y = min` or `y = max`.
    HorizontalWall(usize),
    /// Only `b` present: the body reaches the wall at `x = min` or `x = max`.
    VerticalWall(usize),
    /// Neither present: a periodic render tick.
    Tick,
}

/// A predicted future occurrence in the collision engine.
///
/// Events never change after creation. Each one remembers the collision counts of its
/// participants; if either body has collided since, the prediction is stale and the
/// engine throws it away when it is popped.
///
/// Ordering compares times only, so a `BinaryHeap<Reverse<Event>>` yields the
/// earliest event first.
///
/// # Examples
///
/// ```
/// use rs_nbody::interactions::{Event, EventKind};
/// use rs_nbody::models::{Body, Color};
///
/// let mut bodies = vec![
///     Body::new(0.3, 0.5, 0.1, 0.0, 1.0, 0.02, Color::BLACK).unwrap(),
///     Body::new(0.7, 0.5, -0.1, 0.0, 1.0, 0.02, Color::BLACK).unwrap(),
/// ];
/// let event = Event::collision(1.8, 0, 1, &bodies);
/// assert_eq!(event.kind(), EventKind::Collision { a: 0, b: 1 });
/// assert!(event.is_valid(&bodies));
///
/// bodies[1].bounce_off_vertical_wall();
/// assert!(!event.is_valid(&bodies));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Event {
    time: f64,
    a: Option<Participant>,
    b: Option<Participant>,
}

impl Event {
    /// Creates an event, capturing the current collision count of each participant.
    pub fn new(time: f64, a: Option<usize>, b: Option<usize>, bodies: &[Body]) -> Self {
        Event {
            time,
            a: a.map(|i| Participant::snapshot(bodies, i)),
            b: b.map(|i| Participant::snapshot(bodies, i)),
        }
    }

    pub fn collision(time: f64, a: usize, b: usize, bodies: &[Body]) -> Self {
        Self::new(time, Some(a), Some(b), bodies)
    }

    pub fn vertical_wall(time: f64, body: usize, bodies: &[Body]) -> Self {
        Self::new(time, None, Some(body), bodies)
    }

    pub fn horizontal_wall(time: f64, body: usize, bodies: &[Body]) -> Self {
        Self::new(time, Some(body), None, bodies)
    }

    pub fn tick(time: f64) -> Self {
        Event { time, a: None, b: None }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn a(&self) -> Option<Participant> {
        self.a
    }

    pub fn b(&self) -> Option<Participant> {
        self.b
    }

    pub fn kind(&self) -> EventKind {
        match (self.a, self.b) {
            (Some(a), Some(b)) => EventKind::Collision { a: a.index, b: b.index },
            (Some(a), None) => EventKind::HorizontalWall(a.index),
            (None, Some(b)) => EventKind::VerticalWall(b.index),
            (None, None) => EventKind::Tick,
        }
    }

    /// True if no participant has collided with anything since this event was created.
    pub fn is_valid(&self, bodies: &[Body]) -> bool {
        self.a.map_or(true, |p| p.is_current(bodies)) && self.b.map_or(true, |p| p.is_current(bodies))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.total_cmp(&other.time)
    }
}
