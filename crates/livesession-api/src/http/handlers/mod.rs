//! REST API handlers, one module per resource.

pub mod gemini;
pub mod health;
pub mod session;
pub mod transcript;
