mod instance_spec;
pub use instance_spec::*;
