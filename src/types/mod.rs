//! Core value types shared by the selection engine, history, and grid.

mod coord;
mod region;
mod selection;

pub use coord::*;
pub use region::*;
pub use selection::*;
