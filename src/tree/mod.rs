mod quadrant;
mod barnes_hut;

pub use quadrant::*;
pub use barnes_hut::*;

#[cfg(test)]
mod quadrant_tests;
