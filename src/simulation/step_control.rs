use log::warn;

use crate::models::Body;

/// Largest tick scale accepted; anything at or above 1 would put the tick period past `dt`.
pub const MAX_TICK_SCALE: f64 = 0.9;

/// Macro step length: `dt_scale` times the smallest radius-to-speed ratio of any body,
/// capped at `ceiling`.
///
/// Speed here is the larger velocity component. Bodies at rest, with zero radius, or
/// with a non-finite velocity do not constrain the step.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::{Body, Color};
/// use rs_nbody::simulation::dynamic_dt;
///
/// let bodies = vec![
///     Body::new(0.2, 0.2, 0.5, -1.0, 1.0, 0.1, Color::BLACK).unwrap(),
///     Body::new(0.8, 0.8, 0.0, 0.0, 1.0, 0.1, Color::BLACK).unwrap(),
/// ];
/// // min ratio = 0.1 / 1.0
/// assert!((dynamic_dt(&bodies, 0.8, 0.2) - 0.08).abs() < 1e-12);
/// // Nothing moving: the ceiling applies.
/// assert!((dynamic_dt(&bodies[1..], 0.8, 0.2) - 0.16).abs() < 1e-12);
/// ```
pub fn dynamic_dt(bodies: &[Body], dt_scale: f64, ceiling: f64) -> f64 {
    let min_ratio = bodies
        .iter()
        .filter(|b| b.radius() > 0.0)
        .filter_map(|b| {
            let vmax = b.vx.abs().max(b.vy.abs());
            (vmax > 0.0 && vmax.is_finite()).then(|| b.radius() / vmax)
        })
        .fold(ceiling, f64::min);
    dt_scale * min_ratio
}

/// Tick frequency for a macro step of length `dt`: `1 / (tick_scale * dt)`.
///
/// A `tick_scale` of 1 or more is replaced by [`MAX_TICK_SCALE`] so at least one tick
/// falls strictly inside every step.
pub fn dynamic_hz(dt: f64, tick_scale: f64) -> f64 {
    1.0 / (effective_tick_scale(tick_scale) * dt)
}

/// `tick_scale` clamped below 1, with a warning when clamping was needed.
pub fn effective_tick_scale(tick_scale: f64) -> f64 {
    if tick_scale >= 1.0 {
        warn!("Tick scale {} would make the tick period exceed dt; using {}", tick_scale, MAX_TICK_SCALE);
        MAX_TICK_SCALE
    } else {
        tick_scale
    }
}
