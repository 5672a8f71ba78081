mod stroke;
pub use stroke::*;

mod surface;
pub use surface::*;

mod snapshot;
pub use snapshot::*;

pub mod raster;
