//! Launches and tears down a whole ensemble inside the test process.
mod builder;
mod ensemble;
mod launch;

pub use builder::*;
pub use ensemble::*;
pub use launch::*;
