pub(crate) mod util;

pub mod archive;
pub mod config;
pub mod detector;
pub mod engine;
pub mod geom;
pub mod gesture;
pub mod roster;
pub mod scheduler;

mod session;
pub use session::*;


pub use util::Rgba;
