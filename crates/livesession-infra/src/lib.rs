//! Infrastructure layer for livesession.
//!
//! Contains implementations of the ports defined in `livesession-core`:
//! SQLite storage for sessions, transcripts, and API keys, the `config.toml`
//! loader, and the Gemini REST gateway.

pub mod config;
pub mod gateway;
pub mod sqlite;
