//! Umbrella crate for Railside.
//!
//! This crate is intentionally small: it re-exports the protocol, view and
//! client crates so downstream code can depend on a single crate name
//! (`railside`).

pub use railside_client as client;
pub use railside_protocol as protocol;
pub use railside_view as view;
