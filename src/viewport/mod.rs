mod bounds;
mod fitter;
mod surface;

pub use bounds::BoundingBox;
pub use fitter::{ViewportAction, ViewportFitter, FIT_PADDING_PX, STREET_ZOOM};
pub use surface::{JsonLinesSurface, MapSurface};
