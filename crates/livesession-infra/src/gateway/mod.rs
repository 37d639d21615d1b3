//! Upstream model API clients.

pub mod gemini;
