//! Shared domain types for livesession.
//!
//! This crate contains the domain types used across the workspace:
//! live sessions, transcript entries, gateway model descriptors,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
