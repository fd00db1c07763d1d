//! Command implementations for tagscout CLI

mod misc;
mod scan;
mod suggest;

pub use misc::*;
pub use scan::*;
pub use suggest::*;
