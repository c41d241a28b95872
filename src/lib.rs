//! Two-dimensional N-body simulation that couples Barnes–Hut gravity with exact,
//! event-driven elastic collisions.
//!
//! Start with [`simulation::NBodySystem`]; the tree and the collision engine are
//! usable on their own through [`tree`] and [`interactions`].
pub mod utils;
pub mod models;
pub mod tree;
pub mod interactions;
pub mod apis;
pub mod simulation;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
