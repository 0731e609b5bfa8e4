//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Weights and houses of answers are never exposed to quiz takers.

pub mod auth;
pub mod credentials;
pub mod sorting;
