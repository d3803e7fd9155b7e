pub mod parser;
pub mod runner;

pub use parser::{Action, Script};
pub use runner::Runner;
