//! nmdc: environment-aware search front end for the NMDC data portal.
//!
//! The binary wires the two library crates together:
//!
//! ```text
//! request ──► server ──► TermNormalizer (nmdc-core) ──► SearchClient (nmdc-client) ──► portal
//! ```
//!
//! Modules are public so integration tests can drive the router and the
//! command functions in-process.

pub mod commands;
pub mod server;
