//! In-process multi-node harness for quorum coordination services.
//!
//! An [`Ensemble`] runs N nodes of a [`CoordinationEngine`] inside the test
//! process, each on its own tokio task with its own ports and data directory.
//! Tests connect through [`Ensemble::connect_string`], kill single nodes to
//! simulate crashes and tear everything down with [`Ensemble::close`].
//!
//! FOR TESTING PURPOSES ONLY.

mod client;
mod config;
mod ensemble;
mod errors;
mod instance;
mod membership;
mod node;
pub mod utils;

pub mod constants;

pub use client::*;
pub use config::*;
pub use ensemble::*;
pub use errors::*;
pub use instance::*;
pub use membership::*;
pub use node::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
