use log::{debug, trace};

use crate::models::Body;

/// Receives the body array at every scheduled tick of the simulation.
///
/// Ticks arrive in non-decreasing time order. Pacing them against a wall clock, if
/// wanted, is up to the sink. Any `FnMut(f64, &[Body])` closure is a sink.
///
/// Through [`NBodySystem`](crate::simulation::NBodySystem), each macro step opens with
/// a tick at its start time and closes with one at its end time. The closing tick of
/// one step and the opening tick of the next share a time, so a sink sees two frames
/// with equal `time` at every step boundary; the second one reflects the velocity kick
/// of the new step.
///
/// # Examples
///
/// ```
/// use rs_nbody::apis::RenderSink;
/// use rs_nbody::models::Body;
///
/// let mut seen = Vec::new();
/// let mut sink = |time: f64, bodies: &[Body]| seen.push((time, bodies.len()));
/// sink.on_tick(0.0, &[]);
/// assert_eq!(seen, vec![(0.0, 0)]);
/// ```
pub trait RenderSink {
    fn on_tick(&mut self, time: f64, bodies: &[Body]);
}

impl<F: FnMut(f64, &[Body])> RenderSink for F {
    fn on_tick(&mut self, time: f64, bodies: &[Body]) {
        self(time, bodies)
    }
}

/// Discards every tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn on_tick(&mut self, _time: f64, _bodies: &[Body]) {}
}

/// Writes each frame to the log: a summary line at `debug`, one line per body at `trace`.
#[derive(Debug, Default, Clone)]
pub struct LogSink {
    frames: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl RenderSink for LogSink {
    fn on_tick(&mut self, time: f64, bodies: &[Body]) {
        self.frames += 1;
        debug!("frame {} at t = {:.6}: {} bodies", self.frames, time, bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            trace!("  body {:>4}: {}", i, body);
        }
    }
}

/// One captured tick.
#[derive(Debug, Clone)]
pub struct Frame {
    pub time: f64,
    pub bodies: Vec<Body>,
}

/// Keeps a copy of every frame it is shown.
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl RenderSink for FrameRecorder {
    fn on_tick(&mut self, time: f64, bodies: &[Body]) {
        self.frames.push(Frame { time, bodies: bodies.to_vec() });
    }
}

/// Shifts step-relative tick times onto the absolute simulation clock.
pub(crate) struct OffsetSink<'a, S: RenderSink + ?Sized> {
    pub(crate) inner: &'a mut S,
    pub(crate) offset: f64,
}

impl<S: RenderSink + ?Sized> RenderSink for OffsetSink<'_, S> {
    fn on_tick(&mut self, time: f64, bodies: &[Body]) {
        self.inner.on_tick(self.offset + time, bodies);
    }
}
