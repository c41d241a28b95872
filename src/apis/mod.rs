mod render;
mod ingest;

pub use render::*;
pub use ingest::*;
