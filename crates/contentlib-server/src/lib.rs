//! Content proxy HTTP server.
//!
//! Forwards content listing, item lookup, lead/contact submission and
//! privacy-policy requests from the browser to the upstream content API,
//! adding cross-origin headers and normalizing every failure into the
//! `{status: false, message, error}` envelope.

pub mod config;
pub mod cors;
pub mod endpoints;
pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;
