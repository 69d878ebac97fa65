//! Observability setup for claimchat: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
