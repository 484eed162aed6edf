mod context;
mod geom;
mod path;
mod pixmap;
mod raster;
mod source;
mod stroke;

pub use context::*;
pub use geom::*;
pub use path::*;
pub use pixmap::*;
pub use raster::*;
pub use source::*;
pub use stroke::*;
