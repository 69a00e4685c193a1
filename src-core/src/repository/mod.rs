//! Repository Layer
//!
//! Access to the remote feature service.

mod traits;
mod wire;
mod feature_service;

#[cfg(test)]
pub(crate) mod memory;

#[cfg(test)]
mod tests;

pub use traits::{quote_literal, FeatureService, Query, Token};
pub use feature_service::RestFeatureService;
