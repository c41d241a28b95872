mod body;

pub use body::*;
