//! Core library for `contentlib`.
//!
//! Holds everything the proxy server and the terminal client share: the
//! content model and response envelope, category/search filtering, the
//! reusable fetch-state utility, the lead and contact forms, the privacy
//! policy model, and URL helpers. The [`source::ContentSource`] trait is the
//! seam between the screens and whatever transport reaches the proxy.

pub mod envelope;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod form;
pub mod model;
pub mod privacy;
pub mod source;
pub mod urls;

#[cfg(test)]
mod testing;
