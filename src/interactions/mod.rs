mod event;
mod collision_system;

pub use event::*;
pub use collision_system::*;
