//! Business logic and repository trait definitions for livesession.
//!
//! This crate defines the "ports" (repository and gateway traits) that the
//! infrastructure layer implements. It depends only on `livesession-types` --
//! never on `livesession-infra` or any database/HTTP crate.

pub mod context;
pub mod gateway;
pub mod session;
