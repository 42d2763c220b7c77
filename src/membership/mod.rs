mod membership_view;
mod quorum;
pub use membership_view::*;
pub use quorum::*;
