//! Observability setup for livesession.
//!
//! Installs the global tracing subscriber used by the CLI and the REST API,
//! optionally bridging spans to OpenTelemetry.

pub mod tracing_setup;

pub use tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
