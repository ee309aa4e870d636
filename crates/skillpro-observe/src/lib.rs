//! Observability setup for skillpro: structured logging through `tracing`
//! with optional OpenTelemetry span export.

pub mod tracing_setup;
