//! Live session and transcript persistence abstractions.
//!
//! `repository` defines the storage port; `service` layers ownership rules,
//! validation, and id/clock generation on top of it.

pub mod repository;
pub mod service;
