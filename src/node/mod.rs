mod engine;
mod node_config;
mod runtime;

pub use engine::*;
pub use node_config::*;
pub use runtime::*;
