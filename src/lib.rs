//! Live route tracking: a session controller that turns a stream of position
//! fixes into a route, and a viewport fitter that keeps the route framed on a
//! map surface.

pub mod config;
pub mod positioning;
pub mod script;
pub mod tracker;
pub mod viewport;
