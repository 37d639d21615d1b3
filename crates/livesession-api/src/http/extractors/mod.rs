//! Request extractors: caller identity, inputs, and query parameters.

pub mod auth;
pub mod input;
pub mod query;
