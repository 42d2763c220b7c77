//! Client-side helpers of the ensemble.
//!
//! - [`ConnectedClient`] - which ensemble member is a live client talking to
//! - [`format_connect_string`] - bootstrap string in `host:port[,host:port]*` form

mod introspect;
pub use introspect::*;


use crate::constants::CONNECT_STRING_SEPARATOR;
use crate::constants::LOOPBACK_HOST;

/// Joins `localhost:<port>` segments in the given order. Empty for no ports.
pub fn format_connect_string(ports: impl IntoIterator<Item = u16>) -> String {
    ports
        .into_iter()
        .map(|port| format!("{LOOPBACK_HOST}:{port}"))
        .collect::<Vec<_>>()
        .join(CONNECT_STRING_SEPARATOR)
}
